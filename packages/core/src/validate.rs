use crate::MarketError;

/// Trim a required text field, rejecting blank input.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, MarketError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MarketError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Reject zero, negative and non-finite amounts.
pub(crate) fn positive_amount(field: &str, value: f64) -> Result<f64, MarketError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MarketError::Validation(format!(
            "{field} must be a positive amount, got {value}"
        )));
    }
    Ok(value)
}
