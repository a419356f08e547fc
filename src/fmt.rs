/// Format an amount with thousands separators, prefixed by its currency code: IDR 1,234.56
pub fn money(val: f64, currency: &str) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{with_commas}.{dec_part}")
    } else {
        format!("{sign}{currency} {with_commas}.{dec_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56, "IDR"), "IDR 1,234.56");
        assert_eq!(money(-500.00, "USD"), "-USD 500.00");
        assert_eq!(money(0.0, "IDR"), "IDR 0.00");
        assert_eq!(money(1000000.99, "EUR"), "EUR 1,000,000.99");
        assert_eq!(money(42.1, ""), "42.10");
    }
}
