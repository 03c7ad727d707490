use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;

const USAGE: &str = "config [show|set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change settings",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            }
            if !context.session.is_admin() {
                return Err(CommandError::AdminRequired);
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context.config.set(&key, &value)?;
            if key == "last_month" {
                if let Some(month) = context.config.last_month_key() {
                    context.month = month;
                }
            }
            context.persist_config()?;
            io::print_success(format!("Updated `{}`.", key));
            Ok(())
        }
        _ => Err(usage_error(USAGE)),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {:<16} {}", key, value));
    }
    io::print_info(format!(
        "  {:<16} {}",
        "exports go to",
        context.config_manager.export_dir(&context.config).display()
    ));
    io::print_info(format!("  {:<16} {}", "file", context.config_manager.path().display()));
    Ok(())
}
