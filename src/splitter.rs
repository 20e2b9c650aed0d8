//! Composite statistic values arrive as a single string joining two numbers
//! with ':' (possession time), '-' (penalties-yards) or '/' (made-attempted).

/// Splits a composite stat value into its numeric components.
///
/// Without a ':' or '-' the value itself must be a bare non-negative integer
/// to yield anything. With a delimiter (':' wins over '-'), each part is kept
/// only when it is a non-negative integer literal, so a non-numeric side
/// shortens the result and downstream exact-length checks reject the field.
pub fn split_stat(value: &str) -> Vec<f64> {
    if !value.contains(':') && !value.contains('-') {
        if is_integer_literal(value) {
            return value.parse().map(|v| vec![v]).unwrap_or_default();
        }
        return Vec::new();
    }

    let delimiter = if value.contains(':') { ':' } else { '-' };
    value
        .split(delimiter)
        .filter(|part| is_integer_literal(part))
        .filter_map(|part| part.parse().ok())
        .collect()
}

/// Non-empty and every char an ascii digit. Signs and decimal points
/// disqualify, matching the source data's integer-only composites.
pub fn is_integer_literal(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// `value` as f64 when it is a non-negative integer literal, else 0.0.
pub fn numeric_or_zero(value: &str) -> f64 {
    if is_integer_literal(value) {
        value.parse().unwrap_or(0.0)
    } else {
        0.0
    }
}
