use uuid::Uuid;

use crate::server::error::{internal::InternalError, AppError};

/// Parses a UUID from a stored String
///
/// # Arguments
/// - `value` - The String to attempt to parse into `Uuid`
///
/// # Returns
/// - `Ok(Uuid)` - Successfully parsed String to `Uuid`
/// - `Err(AppError::InternalErr(ParseUuid))` - The stored value is not a UUID
pub fn parse_uuid_from_string(value: String) -> Result<Uuid, AppError> {
    let result = Uuid::parse_str(&value).map_err(|e| InternalError::ParseUuid {
        value: value.clone(),
        source: e,
    })?;

    Ok(result)
}
