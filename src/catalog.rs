//! Static table of maintenance tools and the options that gate them.
//!
//! Declaration order is dispatch order. Adding a tool is a data change here;
//! the dispatcher has no per-tool logic.

use crate::options::OptionKey;

/// How a command line is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Run the command as-is.
    None,
    /// Run inside an elevated `cmd.exe /c` via `Start-Process -Verb RunAs`, waiting for it.
    RunAsShell,
    /// Start the executable itself elevated, waiting for it.
    RunAsProgram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub command: &'static str,
    pub display_name: &'static str,
    pub elevation: Elevation,
}

impl Invocation {
    const fn elevated(command: &'static str, display_name: &'static str) -> Self {
        Invocation {
            command,
            display_name,
            elevation: Elevation::RunAsShell,
        }
    }

    const fn plain(command: &'static str, display_name: &'static str) -> Self {
        Invocation {
            command,
            display_name,
            elevation: Elevation::None,
        }
    }

    /// The full command line handed to the process runner.
    pub fn command_line(&self) -> String {
        match self.elevation {
            Elevation::None => self.command.to_string(),
            Elevation::RunAsShell => format!(
                "powershell -Command \"& {{ Start-Process cmd.exe -Verb RunAs -ArgumentList '/c', '{}' -Wait }}\"",
                self.command
            ),
            Elevation::RunAsProgram => format!(
                "powershell -Command \"Start-Process '{}' -Verb RunAs -Wait\"",
                self.command
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub option: OptionKey,
    pub invocations: &'static [Invocation],
}

pub static TOOL_CATALOG: &[ToolSpec] = &[
    ToolSpec {
        option: OptionKey::ClearWindowsUpdate,
        invocations: &[Invocation::elevated(
            "dism /online /cleanup-image /startcomponentcleanup",
            "Windows Update",
        )],
    },
    ToolSpec {
        option: OptionKey::OpenCdf,
        invocations: &[Invocation::elevated("chkdsk /f", "Check Disk")],
    },
    ToolSpec {
        option: OptionKey::OpenCdr,
        invocations: &[Invocation::elevated("chkdsk /r", "Check Disk")],
    },
    ToolSpec {
        option: OptionKey::OpenCdx,
        invocations: &[Invocation::elevated("chkdsk /x", "Check Disk")],
    },
    ToolSpec {
        option: OptionKey::OpenDismAddPackages,
        invocations: &[Invocation::elevated(
            "dism /online /add-package /packagepath:C:\\path\\to\\update.cab",
            "DISM Add Packages",
        )],
    },
    ToolSpec {
        option: OptionKey::OpenDismCheckHealth,
        invocations: &[Invocation::elevated(
            "dism /online /cleanup-image /checkhealth",
            "DISM Check Health",
        )],
    },
    ToolSpec {
        option: OptionKey::OpenDismGetPackages,
        invocations: &[Invocation::elevated("dism /online /get-packages", "DISM Get Packages")],
    },
    ToolSpec {
        option: OptionKey::OpenDismRepair,
        invocations: &[
            Invocation::elevated(
                "dism /online /cleanup-image /restorehealth /source:C:\\path\\to\\source /limitaccess",
                "DISM Repair",
            ),
            Invocation::elevated(
                "dism /online /cleanup-image /restorehealth /source:C:\\path\\to\\repairsource\\install.wim",
                "DISM Repair 2",
            ),
        ],
    },
    ToolSpec {
        option: OptionKey::OpenDismRestoreHealth,
        invocations: &[Invocation::elevated(
            "dism /online /cleanup-image /restorehealth",
            "DISM Restore Health",
        )],
    },
    ToolSpec {
        option: OptionKey::OpenDiskCleaner,
        invocations: &[Invocation::plain("cleanmgr.exe", "Disk Cleaner")],
    },
    ToolSpec {
        option: OptionKey::OpenDiskCleanerSageRun,
        invocations: &[Invocation::elevated("cleanmgr /sagerun:1", "Disk Cleaner Sagerun")],
    },
    ToolSpec {
        option: OptionKey::OpenMdt,
        invocations: &[Invocation {
            command: "mdsched.exe",
            display_name: "MDT",
            elevation: Elevation::RunAsProgram,
        }],
    },
    ToolSpec {
        option: OptionKey::OpenMrt,
        invocations: &[Invocation::plain("mrt.exe", "MRT")],
    },
    ToolSpec {
        option: OptionKey::OpenSfc,
        invocations: &[Invocation::elevated("sfc /scannow", "Scan")],
    },
    ToolSpec {
        option: OptionKey::OpenWf,
        invocations: &[Invocation::elevated("winsat formal", "winsat formal")],
    },
    ToolSpec {
        option: OptionKey::OpenWingetUpgrade,
        invocations: &[Invocation::elevated("winget upgrade -all", "Upgrade winget")],
    },
    ToolSpec {
        option: OptionKey::UpdateCheckWindowsUpdate,
        invocations: &[Invocation::elevated("wuauclt.exe /detectnow", "Check Win Update")],
    },
];

/// The catalogue entry gated by `option`, if any.
pub fn tool_for(option: OptionKey) -> Option<&'static ToolSpec> {
    TOOL_CATALOG.iter().find(|spec| spec.option == option)
}
