use chrono::NaiveDate;
use csv::{Terminator, WriterBuilder};

use crate::core::Settlement;
use crate::errors::SplitError;

const HEADER: [&str; 5] = ["Member", "Total Paid", "Share Amount", "Will Pay", "Will Receive"];

/// Renders the settlement as CSV: a header, one row per member, then a
/// `Total` row. Lines are separated by `\n` with no trailing newline.
pub fn summary_csv(settlement: &Settlement) -> Result<String, SplitError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for summary in &settlement.summaries {
        writer.write_record([
            summary.name.clone(),
            fixed(summary.total_paid),
            fixed(summary.share),
            fixed(summary.will_pay),
            fixed(summary.will_receive),
        ])?;
    }
    let total = fixed(settlement.total);
    writer.write_record(["Total", total.as_str(), "", "", ""])?;

    let bytes = writer
        .into_inner()
        .map_err(|err| SplitError::Io(err.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|err| SplitError::Storage(format!("CSV output is not UTF-8: {err}")))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// `expense-report-<YYYY-MM-DD>.csv`, dated on the day of export.
pub fn csv_file_name(today: NaiveDate) -> String {
    format!("expense-report-{}.csv", today.format("%Y-%m-%d"))
}

fn fixed(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settle;
    use crate::domain::{Expense, ExpenseId, Member};

    #[test]
    fn csv_matches_expected_layout() {
        let members = vec![Member::new("A"), Member::new("B")];
        let expenses = vec![
            Expense {
                id: ExpenseId::new(),
                date: "2024-03-01".into(),
                description: "Rent".into(),
                amount: 100.0,
                paid_by: members[0].id,
            },
            Expense {
                id: ExpenseId::new(),
                date: "2024-03-02".into(),
                description: "Food".into(),
                amount: 50.0,
                paid_by: members[1].id,
            },
        ];
        let csv = summary_csv(&settle(&members, &expenses)).unwrap();
        insta::assert_snapshot!(csv, @r###"
        Member,Total Paid,Share Amount,Will Pay,Will Receive
        A,100.00,75.00,0.00,25.00
        B,50.00,75.00,25.00,0.00
        Total,150.00,,,
        "###);
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let members = vec![Member::new("Doe, Jane")];
        let csv = summary_csv(&settle(&members, std::iter::empty::<&Expense>())).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"Doe, Jane\","));
    }

    #[test]
    fn file_name_uses_iso_date() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(csv_file_name(day), "expense-report-2024-03-09.csv");
    }
}
