use crate::cli::core::{usage_error, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::MonthKey;

const USAGE: &str = "month [prev|next|YYYY-MM]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "month",
        "Show or change the working month",
        USAGE,
        cmd_month,
    )]
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = match args {
        [] => {
            io::print_info(format!("Working month: {}", context.month.label()));
            let months = context.session.months_present();
            if !months.is_empty() {
                let keys: Vec<String> = months.iter().map(MonthKey::key).collect();
                io::print_info(format!("Months with expenses: {}", keys.join(", ")));
            }
            return Ok(());
        }
        [direction] if direction.eq_ignore_ascii_case("prev") => context.month.prev(),
        [direction] if direction.eq_ignore_ascii_case("next") => context.month.next(),
        [key] => key.parse::<MonthKey>().map_err(CommandError::InvalidArguments)?,
        _ => return Err(usage_error(USAGE)),
    };

    context.set_month(target)?;
    io::print_success(format!("Viewing {}.", target.label()));
    Ok(())
}
