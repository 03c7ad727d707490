/// Two decimals, with a trailing `.00` dropped: `100` but `12.50`.
pub fn trim_amount(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    match fixed.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

/// Amount prefixed with the currency label, e.g. `Rs. 12.50`.
pub fn format_amount(label: &str, amount: f64) -> String {
    format!("{label} {}", trim_amount(amount))
}
