//! Host-optional, idempotent tool installation.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info};

use crate::registry::ModelContext;
use crate::tools::storefront_tools;
use crate::SharedStorefront;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub enabled: bool,
    /// Names registered by this call; empty when nothing new was registered.
    pub tools: Vec<String>,
}

/// Remembers whether its tools were already handed to a host.
#[derive(Debug, Default)]
pub struct ToolInstaller {
    installed: Mutex<bool>,
}

static PROCESS_INSTALLER: ToolInstaller = ToolInstaller::new();

impl ToolInstaller {
    pub const fn new() -> Self {
        Self { installed: Mutex::new(false) }
    }

    pub fn is_installed(&self) -> bool {
        match self.installed.lock() {
            Ok(installed) => *installed,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Registers every storefront tool with `host` the first time it is called with one.
    ///
    /// Without a host nothing happens and `enabled` is false. Once installed, later calls
    /// report `enabled` with no tools and leave the host untouched.
    pub fn install(&self, host: Option<&dyn ModelContext>, state: SharedStorefront) -> InitReport {
        let Some(host) = self.claim(host) else {
            return if self.is_installed() {
                InitReport { enabled: true, tools: Vec::new() }
            } else {
                InitReport::default()
            };
        };

        // Lock released; a host re-entering from `register_tool` sees the installed flag.
        let mut tools = Vec::new();
        for tool in storefront_tools(state) {
            tools.push(tool.name().to_string());
            host.register_tool(tool);
        }

        info!(
            event_name = "forno.tools.registered",
            count = tools.len(),
            tools = %tools.join(", "),
            "agent tools registered"
        );
        InitReport { enabled: true, tools }
    }

    /// Marks the installer as installed when a host is present and this call is the first.
    fn claim<'a>(&self, host: Option<&'a dyn ModelContext>) -> Option<&'a dyn ModelContext> {
        let mut installed = match self.installed.lock() {
            Ok(installed) => installed,
            Err(poisoned) => poisoned.into_inner(),
        };

        if *installed {
            debug!(event_name = "forno.tools.already_registered", "tools already registered");
            return None;
        }
        let Some(host) = host else {
            debug!(event_name = "forno.tools.no_host", "no tool host available");
            return None;
        };

        *installed = true;
        Some(host)
    }
}

/// Installs the storefront tools through the process-wide installer.
pub fn init_tools(host: Option<&dyn ModelContext>, state: SharedStorefront) -> InitReport {
    PROCESS_INSTALLER.install(host, state)
}
