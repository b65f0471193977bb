use thiserror::Error;

/// Monetary amounts are plain floating-point values. Prices are entered in the
/// source currency, profits are reported in the target currency, and nothing is
/// rounded until it is displayed.
pub type Amount = f64;

/// Converted cost of one unit: `(buying + shipping) * rate`.
///
/// Inputs are not validated here; callers are expected to pass finite,
/// non-negative prices and a positive rate (see [`crate::domain::Pricing::new`]).
pub fn compute_base_cost(buying_price: Amount, shipping_price: Amount, rate: f64) -> Amount {
    (buying_price + shipping_price) * rate
}

/// Selling price of one unit: base cost marked up by `margin_percent`.
pub fn compute_selling_price(
    buying_price: Amount,
    shipping_price: Amount,
    rate: f64,
    margin_percent: f64,
) -> Amount {
    compute_base_cost(buying_price, shipping_price, rate) * (1.0 + margin_percent / 100.0)
}

/// Profit earned on one unit at the given pricing.
/// Algebraically equal to `base_cost * margin_percent / 100`.
pub fn compute_unit_profit(
    buying_price: Amount,
    shipping_price: Amount,
    rate: f64,
    margin_percent: f64,
) -> Amount {
    compute_selling_price(buying_price, shipping_price, rate, margin_percent)
        - compute_base_cost(buying_price, shipping_price, rate)
}

/// Format an amount with two decimals and thousands separators.
/// Example: 13440.0 -> "13,440.00", -1234.5 -> "-1,234.50"
pub fn format_amount(amount: Amount) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let rounds_to_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };
    let (units, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}.{}", sign, grouped, decimals)
}

/// Parse a user-supplied decimal string into a non-negative amount.
/// Example: "100" -> 100.0, "19.99" -> 19.99
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))?;

    if !value.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    if value < 0.0 {
        return Err(ParseAmountError::Negative);
    }
    Ok(value)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("invalid amount format: '{0}'")]
    InvalidFormat(String),

    #[error("amount must be a finite number")]
    NotFinite,

    #[error("amount must not be negative")]
    Negative,
}
