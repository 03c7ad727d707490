use crate::cli::core::{usage_error, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("members", "List the members", "members", cmd_members),
        CommandEntry::new(
            "member-add",
            "Add a member with a placeholder name",
            "member-add",
            cmd_member_add,
        )
        .admin(),
        CommandEntry::new(
            "member-rename",
            "Rename the member at a position",
            "member-rename <pos> <name...>",
            cmd_member_rename,
        )
        .admin(),
        CommandEntry::new(
            "member-remove",
            "Remove a member who has not paid for anything",
            "member-remove <pos>",
            cmd_member_remove,
        )
        .admin(),
    ]
}

fn cmd_members(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Name"),
        TableColumn::right("Expenses paid"),
    ]);
    for (index, member) in context.session.members().iter().enumerate() {
        let paid = context
            .session
            .expenses()
            .iter()
            .filter(|expense| expense.paid_by == member.id)
            .count();
        table.push(vec![
            (index + 1).to_string(),
            member.name.clone(),
            paid.to_string(),
        ]);
    }
    output::section("Members");
    output::plain(table.render());
    Ok(())
}

fn cmd_member_add(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let member = context.session.add_member()?;
    io::print_success(format!("Added {}.", member.name));
    Ok(())
}

fn cmd_member_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [position, name @ ..] = args else {
        return Err(usage_error("member-rename <pos> <name...>"));
    };
    if name.is_empty() {
        return Err(usage_error("member-rename <pos> <name...>"));
    }
    let id = context.member_at(position)?;
    let old = context.session.roster().name_of(id).to_string();
    context.session.rename_member(id, &name.join(" "))?;
    io::print_success(format!(
        "Renamed {} to {}.",
        old,
        context.session.roster().name_of(id)
    ));
    Ok(())
}

fn cmd_member_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [position] = args else {
        return Err(usage_error("member-remove <pos>"));
    };
    let id = context.member_at(position)?;
    let name = context.session.roster().name_of(id).to_string();
    if !context.confirm(&format!("Remove {}?", name))? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    if context.session.remove_member(id)? {
        io::print_success(format!("Removed {}.", name));
    }
    Ok(())
}
