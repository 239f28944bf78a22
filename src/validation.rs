// Validation utilities module
// Custom validator functions shared by the request DTOs

use rust_decimal::Decimal;
use validator::ValidationError;

/// Characters accepted as the "special" class of a password
const SPECIAL_CHARACTERS: &str = "@$!%*?&#^()-_=+[]{};:'\",.<>/\\|`~";

/// Password must mix lowercase, uppercase, a digit and a special character
/// (length is checked separately with `length(min = 8)`)
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

    if has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        let mut error = ValidationError::new("weak_password");
        error.message = Some(
            "Password must contain a lowercase letter, an uppercase letter, a digit and a special character"
                .into(),
        );
        Err(error)
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Validates that a price is zero or positive
pub fn validate_non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        Err(ValidationError::new("price_must_not_be_negative"))
    } else {
        Ok(())
    }
}
