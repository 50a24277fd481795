//! Request field validation.
//!
//! Checks run in the controller layer when DTOs are converted into service
//! parameters; failures surface as `400 Bad Request`.

use crate::server::error::AppError;

const MAX_EMAIL_LEN: usize = 254;
const MAX_NAME_LEN: usize = 100;
const MAX_BARCODE_LEN: usize = 32;
const MAX_CODE_LEN: usize = 32;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Trims and lower-cases an email address, then checks its shape.
///
/// # Returns
/// - `Ok(String)` - Normalized email
/// - `Err(AppError::BadRequest)` - Empty, too long or not `local@domain.tld`
pub fn normalize_email(value: &str) -> Result<String, AppError> {
    let email = value.trim().to_lowercase();

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    };

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    Ok(email)
}

/// Checks that a verification code is present and reasonably sized.
pub fn require_code(value: &str) -> Result<(), AppError> {
    let code = value.trim();
    if code.is_empty() || code.len() > MAX_CODE_LEN {
        return Err(AppError::BadRequest(
            "Verification code is required".to_string(),
        ));
    }
    Ok(())
}

/// Trims a required free-text field and enforces its maximum length.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates a person name.
pub fn require_name(field: &str, value: &str) -> Result<String, AppError> {
    require_text(field, value, MAX_NAME_LEN)
}

/// Validates a student barcode: alphanumeric, upper-cased.
pub fn normalize_barcode(value: &str) -> Result<String, AppError> {
    let barcode = require_text("Barcode", value, MAX_BARCODE_LEN)?.to_ascii_uppercase();
    if !barcode.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::BadRequest(
            "Barcode must contain only letters and digits".to_string(),
        ));
    }
    Ok(barcode)
}

/// Validates password length bounds.
pub fn require_password(value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at most {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
