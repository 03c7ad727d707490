use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::report::{
    csv_file_name, format_amount, pdf_file_name, render_summary_pdf, summary_csv, write_export,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show who paid what and who owes whom this month",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "export-csv",
            "Write the month's settlement as CSV",
            "export-csv",
            cmd_export_csv,
        ),
        CommandEntry::new(
            "export-pdf",
            "Write the month's statement as PDF",
            "export-pdf",
            cmd_export_pdf,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.session.month_view(context.month);
    let currency = context.currency();

    output::section(format!("Summary for {}", view.month.label()));
    io::print_info(format!(
        "Total expense: {}",
        format_amount(currency, view.settlement.total)
    ));
    io::print_info(format!(
        "Share per member: {}",
        format_amount(currency, view.settlement.share)
    ));

    let mut table = Table::new(vec![
        TableColumn::left("Member"),
        TableColumn::right("Total Paid"),
        TableColumn::right("Share"),
        TableColumn::right("Will Pay"),
        TableColumn::right("Will Receive"),
    ]);
    for summary in &view.settlement.summaries {
        table.push(vec![
            summary.name.clone(),
            format_amount(currency, summary.total_paid),
            format_amount(currency, summary.share),
            format_amount(currency, summary.will_pay),
            format_amount(currency, summary.will_receive),
        ]);
    }
    output::plain(table.render());
    Ok(())
}

fn cmd_export_csv(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dir = context.config_manager.export_dir(&context.config);
    let file_name = csv_file_name(context.clock.today());
    let prompt = format!(
        "Export the {} settlement to {}?",
        context.month.label(),
        dir.join(&file_name).display()
    );
    if !context.confirm(&prompt)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let view = context.session.month_view(context.month);
    let csv = summary_csv(&view.settlement)?;
    let path = write_export(&dir, &file_name, csv.as_bytes())?;
    io::print_success(format!("CSV written to {}.", path.display()));
    Ok(())
}

fn cmd_export_pdf(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dir = context.config_manager.export_dir(&context.config);
    let file_name = pdf_file_name(&context.month);
    let prompt = format!(
        "Export the {} statement to {}?",
        context.month.label(),
        dir.join(&file_name).display()
    );
    if !context.confirm(&prompt)? {
        io::print_info("Operation cancelled.");
        return Ok(());
    }

    let view = context.session.month_view(context.month);
    let pdf = render_summary_pdf(&view, context.session.roster(), context.currency());
    let path = write_export(&dir, &file_name, &pdf)?;
    io::print_success(format!("PDF written to {}.", path.display()));
    Ok(())
}
