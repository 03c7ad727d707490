//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::PathBuf};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::ConfigManager,
    core::{
        services::{ServiceError, ValidationError},
        Clock, MonthKey, Session, SystemClock,
    },
    domain::{MemberId, DATE_FORMAT},
    errors::SplitError,
    storage::{JsonFileStore, SplitStore},
    utils::paths::{app_data_dir, store_dir_in},
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base(mode, app_data_dir(), Box::new(SystemClock))
    }

    /// Opens the data store and configuration rooted at `base`.
    pub fn with_base(mode: CliMode, base: PathBuf, clock: Box<dyn Clock>) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let loaded = config_manager.load()?;
        let config = loaded.config;
        let store = JsonFileStore::new(store_dir_in(&base))?;
        let session = Session::open(SplitStore::new(store))?;
        let month = config
            .last_month_key()
            .unwrap_or_else(|| MonthKey::current(clock.as_ref()));

        let app = ShellContext {
            mode,
            registry,
            session,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            clock,
            month,
            running: true,
        };
        app.report_load(loaded.warning.as_deref());
        Ok(app)
    }

    fn report_load(&self, config_warning: Option<&str>) {
        for note in self.session.migrations() {
            cli_io::print_info(format!("Migration: {}", note));
        }
        let warnings = config_warning
            .into_iter()
            .chain(self.session.load_warnings().iter().map(String::as_str));
        for warning in warnings {
            cli_io::print_warning(warning);
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        if entry.admin_only && !self.session.is_admin() {
            return Err(CommandError::AdminRequired);
        }
        let handler = entry.handler;
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    /// Splits one input line into words and runs it. Blank lines and
    /// unbalanced quotes are not errors; `exit` stops the shell.
    pub(crate) fn run_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&format!("Could not read that line: {err}."));
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        Ok(self.confirm("Exit shell?")?)
    }

    /// Asks a yes/no question; script mode always answers yes.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Validation(reason) => {
                self.print_warning(&format!("Not saved: {reason}."));
                Ok(())
            }
            CommandError::AdminRequired => {
                self.print_error(&CommandError::AdminRequired.to_string());
                self.print_hint("Log in with `login <password>`.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Switches the working month and remembers it for the next start.
    pub(crate) fn set_month(&mut self, month: MonthKey) -> CommandResult {
        self.month = month;
        self.config.last_month = Some(month.key());
        self.persist_config()
    }

    /// Resolves a 1-based roster position given on the command line.
    pub(crate) fn member_at(&self, arg: &str) -> Result<MemberId, CommandError> {
        let position = arg.parse::<usize>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{}` is not a member number", arg))
        })?;
        self.session
            .roster()
            .at(position)
            .map(|member| member.id)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "no member #{} (there are {})",
                    position,
                    self.session.members().len()
                ))
            })
    }
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    input
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", usage))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Admin login required for this command.")]
    AdminRequired,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] SplitError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(err) => CommandError::Core(err),
            ServiceError::Validation(reason) => CommandError::Validation(reason),
            ServiceError::Invalid(message) => CommandError::Message(message),
        }
    }
}

/// User-facing CLI error wrapper.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SplitError),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Core(SplitError::Io(err))
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    use crate::core::FixedClock;

    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default());
    let mut app = ShellContext::with_base(CliMode::Script, base, Box::new(clock))?;
    let input = lines.join("\n");
    super::shell::run_script(&mut app, io::Cursor::new(input))?;
    Ok(app)
}
