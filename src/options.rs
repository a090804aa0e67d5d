// src/options.rs

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::error::ConfigError;

/// Upper bound on the number of keys a caller may supply for one run.
pub const MAX_OPTIONS: usize = 21;

/// Every switch the sweeper understands, in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    ClearSpotifyData,
    ClearWindows10Upgrade,
    ClearWindowsOld,
    ClearWindowsUpdate,
    OpenCdf,
    OpenCdr,
    OpenCdx,
    OpenDiskCleaner,
    OpenDiskCleanerSageRun,
    OpenDismAddPackages,
    OpenDismCheckHealth,
    OpenDismGetPackages,
    OpenDismRepair,
    OpenDismRestoreHealth,
    OpenMdt,
    OpenMrt,
    OpenSfc,
    OpenWf,
    OpenWingetUpgrade,
    UpdateCheckWindowsUpdate,
}

impl OptionKey {
    pub const ALL: [OptionKey; 20] = [
        OptionKey::ClearSpotifyData,
        OptionKey::ClearWindows10Upgrade,
        OptionKey::ClearWindowsOld,
        OptionKey::ClearWindowsUpdate,
        OptionKey::OpenCdf,
        OptionKey::OpenCdr,
        OptionKey::OpenCdx,
        OptionKey::OpenDiskCleaner,
        OptionKey::OpenDiskCleanerSageRun,
        OptionKey::OpenDismAddPackages,
        OptionKey::OpenDismCheckHealth,
        OptionKey::OpenDismGetPackages,
        OptionKey::OpenDismRepair,
        OptionKey::OpenDismRestoreHealth,
        OptionKey::OpenMdt,
        OptionKey::OpenMrt,
        OptionKey::OpenSfc,
        OptionKey::OpenWf,
        OptionKey::OpenWingetUpgrade,
        OptionKey::UpdateCheckWindowsUpdate,
    ];

    /// Wire name used in options files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::ClearSpotifyData => "clearSpotifyData",
            OptionKey::ClearWindows10Upgrade => "clearWindows10Upgrade",
            OptionKey::ClearWindowsOld => "clearWindowsOld",
            OptionKey::ClearWindowsUpdate => "clearWindowsUpdate",
            OptionKey::OpenCdf => "openCDF",
            OptionKey::OpenCdr => "openCDR",
            OptionKey::OpenCdx => "openCDX",
            OptionKey::OpenDiskCleaner => "openDiskCleaner",
            OptionKey::OpenDiskCleanerSageRun => "openDiskCleanerSageRun",
            OptionKey::OpenDismAddPackages => "openDismAddPackages",
            OptionKey::OpenDismCheckHealth => "openDismCheckHealth",
            OptionKey::OpenDismGetPackages => "openDismGetPackages",
            OptionKey::OpenDismRepair => "openDismRepair",
            OptionKey::OpenDismRestoreHealth => "openDismRestoreHealth",
            OptionKey::OpenMdt => "openMDT",
            OptionKey::OpenMrt => "openMRT",
            OptionKey::OpenSfc => "openSFC",
            OptionKey::OpenWf => "openWF",
            OptionKey::OpenWingetUpgrade => "openWingetUpgrade",
            OptionKey::UpdateCheckWindowsUpdate => "updateCheckWindowsUpdate",
        }
    }

    pub fn from_key(key: &str) -> Option<OptionKey> {
        OptionKey::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

/// Raw `"key": bool` entries of a JSON options file, unknown keys included.
/// The key count is not checked here.
pub fn read_option_pairs(path: &Path) -> Result<BTreeMap<String, bool>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

lazy_static! {
    /// Allowlist of recognized keys; anything else is ignored.
    pub static ref RECOGNIZED_OPTIONS: HashSet<&'static str> =
        OptionKey::ALL.iter().map(|k| k.as_str()).collect();
}

/// The switches for one run. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSet {
    pub clear_spotify_data: bool,
    pub clear_windows10_upgrade: bool,
    pub clear_windows_old: bool,
    pub clear_windows_update: bool,
    #[serde(rename = "openCDF")]
    pub open_cdf: bool,
    #[serde(rename = "openCDR")]
    pub open_cdr: bool,
    #[serde(rename = "openCDX")]
    pub open_cdx: bool,
    pub open_disk_cleaner: bool,
    pub open_disk_cleaner_sage_run: bool,
    pub open_dism_add_packages: bool,
    pub open_dism_check_health: bool,
    pub open_dism_get_packages: bool,
    pub open_dism_repair: bool,
    pub open_dism_restore_health: bool,
    #[serde(rename = "openMDT")]
    pub open_mdt: bool,
    #[serde(rename = "openMRT")]
    pub open_mrt: bool,
    #[serde(rename = "openSFC")]
    pub open_sfc: bool,
    #[serde(rename = "openWF")]
    pub open_wf: bool,
    pub open_winget_upgrade: bool,
    pub update_check_windows_update: bool,
}

impl OptionSet {
    /// Build from raw key/value pairs. Rejects more than [`MAX_OPTIONS`] keys,
    /// ignores keys outside [`RECOGNIZED_OPTIONS`].
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let pairs: Vec<(K, bool)> = pairs.into_iter().collect();
        if pairs.len() > MAX_OPTIONS {
            return Err(ConfigError::TooManyOptions {
                count: pairs.len(),
                max: MAX_OPTIONS,
            });
        }

        let mut set = OptionSet::default();
        for (key, value) in &pairs {
            match OptionKey::from_key(key.as_ref()) {
                Some(option) => set.set(option, *value),
                None => log::debug!("Ignoring unrecognized option `{}`", key.as_ref()),
            }
        }
        Ok(set)
    }

    /// Read a JSON object of `"key": bool` entries.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_pairs(read_option_pairs(path)?)
    }

    /// Every recognized option switched on.
    pub fn all_enabled() -> Self {
        let mut set = OptionSet::default();
        for key in OptionKey::ALL {
            set.set(key, true);
        }
        set
    }

    pub fn is_enabled(&self, key: OptionKey) -> bool {
        match key {
            OptionKey::ClearSpotifyData => self.clear_spotify_data,
            OptionKey::ClearWindows10Upgrade => self.clear_windows10_upgrade,
            OptionKey::ClearWindowsOld => self.clear_windows_old,
            OptionKey::ClearWindowsUpdate => self.clear_windows_update,
            OptionKey::OpenCdf => self.open_cdf,
            OptionKey::OpenCdr => self.open_cdr,
            OptionKey::OpenCdx => self.open_cdx,
            OptionKey::OpenDiskCleaner => self.open_disk_cleaner,
            OptionKey::OpenDiskCleanerSageRun => self.open_disk_cleaner_sage_run,
            OptionKey::OpenDismAddPackages => self.open_dism_add_packages,
            OptionKey::OpenDismCheckHealth => self.open_dism_check_health,
            OptionKey::OpenDismGetPackages => self.open_dism_get_packages,
            OptionKey::OpenDismRepair => self.open_dism_repair,
            OptionKey::OpenDismRestoreHealth => self.open_dism_restore_health,
            OptionKey::OpenMdt => self.open_mdt,
            OptionKey::OpenMrt => self.open_mrt,
            OptionKey::OpenSfc => self.open_sfc,
            OptionKey::OpenWf => self.open_wf,
            OptionKey::OpenWingetUpgrade => self.open_winget_upgrade,
            OptionKey::UpdateCheckWindowsUpdate => self.update_check_windows_update,
        }
    }

    pub fn set(&mut self, key: OptionKey, value: bool) {
        let slot = match key {
            OptionKey::ClearSpotifyData => &mut self.clear_spotify_data,
            OptionKey::ClearWindows10Upgrade => &mut self.clear_windows10_upgrade,
            OptionKey::ClearWindowsOld => &mut self.clear_windows_old,
            OptionKey::ClearWindowsUpdate => &mut self.clear_windows_update,
            OptionKey::OpenCdf => &mut self.open_cdf,
            OptionKey::OpenCdr => &mut self.open_cdr,
            OptionKey::OpenCdx => &mut self.open_cdx,
            OptionKey::OpenDiskCleaner => &mut self.open_disk_cleaner,
            OptionKey::OpenDiskCleanerSageRun => &mut self.open_disk_cleaner_sage_run,
            OptionKey::OpenDismAddPackages => &mut self.open_dism_add_packages,
            OptionKey::OpenDismCheckHealth => &mut self.open_dism_check_health,
            OptionKey::OpenDismGetPackages => &mut self.open_dism_get_packages,
            OptionKey::OpenDismRepair => &mut self.open_dism_repair,
            OptionKey::OpenDismRestoreHealth => &mut self.open_dism_restore_health,
            OptionKey::OpenMdt => &mut self.open_mdt,
            OptionKey::OpenMrt => &mut self.open_mrt,
            OptionKey::OpenSfc => &mut self.open_sfc,
            OptionKey::OpenWf => &mut self.open_wf,
            OptionKey::OpenWingetUpgrade => &mut self.open_winget_upgrade,
            OptionKey::UpdateCheckWindowsUpdate => &mut self.update_check_windows_update,
        };
        *slot = value;
    }

    pub fn enabled(&self) -> Vec<OptionKey> {
        OptionKey::ALL
            .iter()
            .copied()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }
}
