//! Line front ends for the shell: a line editor with completion, usage hints
//! and persistent history, or a plain reader for scripted runs.

use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    hint::Hinter,
    history::DefaultHistory,
    Context as ReadlineContext, Editor, Helper, Highlighter, Validator,
};

use crate::cli::core::{CliError, CliMode, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;
use crate::config::CONFIG_KEYS;
use crate::utils::paths::history_file_in;

const SCRIPT_ENV: &str = "SPLITBITE_CLI_SCRIPT";

/// Runs the shell until `exit`, end of input, or a confirmed interrupt.
///
/// With `SPLITBITE_CLI_SCRIPT` set, commands are read line by line from stdin
/// and every confirmation is accepted.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_registry(&context.registry)));

    let history = history_file_in(context.config_manager.base_dir());
    if editor.load_history(&history).is_err() {
        tracing::debug!(path = %history.display(), "no shell history yet");
    }

    output_info(format!(
        "Viewing {}. Type `help` for commands.",
        context.month.label()
    ));

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();
                step(context, line)?;
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = editor.save_history(&history) {
        tracing::warn!(path = %history.display(), "could not save shell history: {err}");
    }
    Ok(())
}

/// Feeds every line of `input` to the shell until it ends or `exit` runs.
pub(crate) fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        if !context.running {
            break;
        }
        step(context, &line?)?;
    }
    Ok(())
}

fn step(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    if let Err(err) = context.run_line(line) {
        context.report_error(err)?;
    }
    Ok(())
}

#[derive(Helper, Highlighter, Validator)]
struct CommandHelper {
    /// `(name, usage)` sorted by name.
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandHelper {
    fn from_registry(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<_> = registry
            .list()
            .into_iter()
            .map(|entry| (entry.name, entry.usage))
            .collect();
        commands.sort_by_key(|(name, _)| *name);
        Self { commands }
    }

    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|(name, _)| *name)
    }

    /// Start of the word under the cursor and the words that could finish it.
    fn completions(&self, head: &str) -> (usize, Vec<&'static str>) {
        let start = head.rfind(' ').map_or(0, |idx| idx + 1);
        let before: Vec<String> = head[..start]
            .split_whitespace()
            .map(str::to_ascii_lowercase)
            .collect();
        let before: Vec<&str> = before.iter().map(String::as_str).collect();

        let options: Vec<&'static str> = match before.as_slice() {
            [] | ["help"] => self.names().collect(),
            ["month"] => vec!["next", "prev"],
            ["config"] => vec!["set", "show"],
            ["config", "set"] => CONFIG_KEYS.to_vec(),
            _ => Vec::new(),
        };

        let partial = head[start..].to_ascii_lowercase();
        let matches = options
            .into_iter()
            .filter(|option| option.starts_with(&partial))
            .collect();
        (start, matches)
    }

    /// Remaining usage text once a full command name and a space are typed.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let name = line.trim_start().strip_suffix(' ')?;
        if name.is_empty() || name.contains(' ') {
            return None;
        }
        let name = name.to_ascii_lowercase();
        let (_, usage) = self.commands.iter().find(|(known, _)| *known == name)?;
        let rest = usage.strip_prefix(name.as_str())?.trim_start();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.completions(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use crate::cli::core::process_script;

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        CommandHelper::from_registry(&registry)
    }

    #[test]
    fn first_word_completes_command_names() {
        let (start, matches) = helper().completions("exp");
        assert_eq!(start, 0);
        assert_eq!(
            matches,
            ["expense-add", "expense-delete", "expense-edit", "expenses", "export-csv", "export-pdf"]
        );
    }

    #[test]
    fn arguments_complete_from_known_values() {
        let helper = helper();
        assert_eq!(helper.completions("month n"), (6, vec!["next"]));
        assert_eq!(
            helper.completions("config set cur"),
            (11, vec!["currency_label"])
        );
        assert_eq!(helper.completions("help summ"), (5, vec!["summary"]));
        assert!(helper.completions("expense-add 2024").1.is_empty());
    }

    #[test]
    fn usage_is_hinted_after_a_full_command() {
        let helper = helper();
        assert_eq!(
            helper.usage_hint("member-rename ").as_deref(),
            Some("<pos> <name...>")
        );
        assert_eq!(helper.usage_hint("members "), None);
        assert_eq!(helper.usage_hint("member-rename"), None);
        assert_eq!(helper.usage_hint("month next "), None);
    }

    #[test]
    fn script_stops_at_exit() {
        let temp = tempfile::tempdir().unwrap();
        let app = process_script(
            temp.path().to_path_buf(),
            &["login Khana", "member-add", "exit", "member-add"],
        )
        .unwrap();
        assert!(!app.running);
        assert_eq!(app.session.members().len(), 5);
    }
}
