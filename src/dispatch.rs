// src/dispatch.rs

use std::sync::Arc;

use crate::catalog::{ToolSpec, TOOL_CATALOG};
use crate::error_log::ErrorSink;
use crate::messages::Messages;
use crate::options::OptionSet;
use crate::runner::CommandRunner;

/// Runs the enabled tools one invocation at a time, in catalogue order.
pub struct ToolDispatcher {
    runner: Arc<dyn CommandRunner>,
    error_log: Arc<dyn ErrorSink>,
    messages: Messages,
    catalog: &'static [ToolSpec],
}

impl ToolDispatcher {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        error_log: Arc<dyn ErrorSink>,
        messages: Messages,
    ) -> Self {
        Self::with_catalog(runner, error_log, messages, TOOL_CATALOG)
    }

    pub fn with_catalog(
        runner: Arc<dyn CommandRunner>,
        error_log: Arc<dyn ErrorSink>,
        messages: Messages,
        catalog: &'static [ToolSpec],
    ) -> Self {
        ToolDispatcher {
            runner,
            error_log,
            messages,
            catalog,
        }
    }

    /// Attempt every invocation of every enabled tool exactly once. A failed
    /// invocation is recorded and skipped over; nothing is retried.
    ///
    /// Returns the number of invocations attempted.
    pub async fn dispatch(&self, options: &OptionSet) -> usize {
        let mut attempted = 0usize;

        for spec in self.catalog.iter().filter(|s| options.is_enabled(s.option)) {
            log::debug!(
                "Dispatching {} ({} step(s))",
                spec.option.as_str(),
                spec.invocations.len()
            );
            for invocation in spec.invocations {
                let command = invocation.command_line();
                attempted += 1;
                match self.runner.run(&command).await {
                    Ok(_) => {
                        log::info!(
                            "{}",
                            self.messages
                                .format("tool.opened", &[("tool", invocation.display_name)])
                        );
                    }
                    Err(err) => {
                        let message = self
                            .messages
                            .format("tool.failed", &[("tool", invocation.display_name)]);
                        self.error_log.record(&message, Some(&err));
                    }
                }
            }
        }

        attempted
    }
}
