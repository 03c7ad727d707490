use crate::cli::core::{
    parse_amount, parse_date, usage_error, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::domain::{Expense, ExpenseDraft};
use crate::report::format_amount;

const ADD_USAGE: &str = "expense-add <date> <amount> <payer-pos> <description...>";
const EDIT_USAGE: &str = "expense-edit <id-prefix> <date> <amount> <payer-pos> <description...>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "expenses",
            "List the working month's expenses, newest first",
            "expenses",
            cmd_expenses,
        ),
        CommandEntry::new("expense-add", "Record an expense", ADD_USAGE, cmd_expense_add).admin(),
        CommandEntry::new(
            "expense-edit",
            "Replace the details of an expense",
            EDIT_USAGE,
            cmd_expense_edit,
        )
        .admin(),
        CommandEntry::new(
            "expense-delete",
            "Delete an expense",
            "expense-delete <id-prefix>",
            cmd_expense_delete,
        )
        .admin(),
    ]
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.session.month_view(context.month);
    output::section(format!("Expenses for {}", view.month.label()));
    if view.expenses.is_empty() {
        io::print_info("No expenses recorded for this month.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Description").max_width(40),
        TableColumn::right("Amount"),
        TableColumn::left("Paid by"),
    ]);
    for expense in &view.expenses {
        table.push(vec![
            expense.id.short(),
            expense.date.clone(),
            expense.description.clone(),
            format_amount(context.currency(), expense.amount),
            context.session.roster().name_of(expense.paid_by).to_string(),
        ]);
    }
    output::plain(table.render());
    io::print_info(format!(
        "Total: {}",
        format_amount(context.currency(), view.settlement.total)
    ));
    Ok(())
}

/// Parses `<date> <amount> <payer-pos> <description...>`.
fn parse_draft(context: &ShellContext, args: &[&str], usage: &str) -> Result<ExpenseDraft, CommandError> {
    let [date, amount, payer, description @ ..] = args else {
        return Err(usage_error(usage));
    };
    if description.is_empty() {
        return Err(usage_error(usage));
    }
    Ok(ExpenseDraft::new(
        parse_date(date)?,
        description.join(" "),
        parse_amount(amount)?,
        context.member_at(payer)?,
    ))
}

fn find_expense(context: &ShellContext, prefix: &str) -> Result<Expense, CommandError> {
    context.session.find_expense(prefix).cloned().ok_or_else(|| {
        CommandError::Message(format!(
            "No single expense matches `{}`. Use the ID shown by `expenses`.",
            prefix
        ))
    })
}

fn cmd_expense_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = parse_draft(context, args, ADD_USAGE)?;
    let expense = context.session.add_expense(draft)?;
    io::print_success(format!(
        "Recorded {} on {} paid by {} ({}).",
        format_amount(context.currency(), expense.amount),
        expense.date,
        context.session.roster().name_of(expense.paid_by),
        expense.id.short()
    ));
    if !context.month.contains(&expense.date) {
        io::print_info(format!(
            "The expense is outside {}; use `month` to view it.",
            context.month.label()
        ));
    }
    Ok(())
}

fn cmd_expense_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix, rest @ ..] = args else {
        return Err(usage_error(EDIT_USAGE));
    };
    let existing = find_expense(context, prefix)?;
    let draft = parse_draft(context, rest, EDIT_USAGE)?;
    let updated = Expense {
        id: existing.id,
        date: draft.date,
        description: draft.description,
        amount: draft.amount,
        paid_by: draft.paid_by,
    };
    if context.session.edit_expense(updated)? {
        io::print_success(format!("Updated expense {}.", existing.id.short()));
    } else {
        io::print_warning("The expense no longer exists; nothing changed.");
    }
    Ok(())
}

fn cmd_expense_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [prefix] = args else {
        return Err(usage_error("expense-delete <id-prefix>"));
    };
    let expense = find_expense(context, prefix)?;
    let prompt = format!("Delete `{}` from {}?", expense.description, expense.date);
    if !context.confirm(&prompt)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    if context.session.delete_expense(expense.id)? {
        io::print_success(format!("Deleted expense {}.", expense.id.short()));
    }
    Ok(())
}
