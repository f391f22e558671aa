//! Parsing of user-typed values and positions.

use stepviz_structures::Value;

use crate::error::{InputError, Result};

/// Parse a comma-separated list of numbers, e.g. `"5, 3, 8, 1"` or `"0.5, 0.25"`.
pub fn parse_values(input: &str) -> Result<Vec<Value>> {
    if input.trim().is_empty() {
        return Err(InputError::Empty);
    }
    input.split(',').map(parse_value).collect()
}

/// Parse a single value or search target. Integers and decimals are
/// accepted; `nan` and infinities are not.
pub fn parse_value(input: &str) -> Result<Value> {
    let token = input.trim();
    match token.parse::<Value>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::InvalidNumber(token.to_string())),
    }
}

/// Parse a zero-based position.
pub fn parse_position(input: &str) -> Result<usize> {
    let token = input.trim();
    token
        .parse()
        .map_err(|_| InputError::InvalidNumber(token.to_string()))
}
