use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::{Clock, MonthKey, Session},
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: Session,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub clock: Box<dyn Clock>,
    /// Month the listing, summary, and export commands operate on.
    pub month: MonthKey,
    pub running: bool,
}

impl ShellContext {
    pub fn prompt(&self) -> String {
        let gate = if self.session.is_admin() { " admin" } else { "" };
        format!("splitbite [{}{}]> ", self.month.key(), gate)
    }

    pub fn currency(&self) -> &str {
        &self.config.currency_label
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }
}
