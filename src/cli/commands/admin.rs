use crate::cli::core::{usage_error, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Unlock the commands that change data",
            "login <password>",
            cmd_login,
        ),
        CommandEntry::new("logout", "Lock data changes again", "logout", cmd_logout),
        CommandEntry::new(
            "reset",
            "Delete every expense and restore the default members",
            "reset",
            cmd_reset,
        )
        .admin(),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [password] = args else {
        return Err(usage_error("login <password>"));
    };
    if context.session.is_admin() {
        io::print_info("Already logged in.");
        return Ok(());
    }
    let expected = context.config.admin_password.clone();
    if context.session.login(password, &expected)? {
        io::print_success("Logged in as admin.");
    } else {
        io::print_error("Invalid password");
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.logout()?;
    io::print_success("Logged out.");
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Delete all expenses and members? This cannot be undone.")? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.session.reset()?;
    io::print_success("All data has been reset.");
    Ok(())
}
