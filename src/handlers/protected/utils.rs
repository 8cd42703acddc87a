use std::collections::HashMap;

use uuid::Uuid;

use crate::access::Role;
use crate::error::ApiError;

const MAX_NAME_LEN: usize = 255;

/// Names must be non-blank and fit the column.
pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::field_error(field, "must not be empty"));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::field_error(field, format!("must be at most {} characters", MAX_NAME_LEN)));
    }
    Ok(())
}

pub fn validate_optional_name(field: &str, value: Option<&String>) -> Result<(), ApiError> {
    value.map_or(Ok(()), |v| validate_name(field, v))
}

pub fn parse_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>().map_err(|e| ApiError::field_error("role", e.to_string()))
}

/// Value must be one of a fixed, lowercase vocabulary.
pub fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), ApiError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ApiError::field_error(field, format!("must be one of: {}", allowed.join(", "))))
}

/// Secondary id from the route path. The gate has already parsed the
/// resource id, this covers the trailing `:attribute_id`-style segment.
pub fn path_id(params: &HashMap<String, String>, key: &str) -> Result<Uuid, ApiError> {
    let raw = params
        .get(key)
        .ok_or_else(|| ApiError::bad_request(format!("Missing path parameter '{}'", key)))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {} '{}': expected a UUID", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_name("name", "Orders").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(256)).is_err());
        assert!(validate_optional_name("name", None).is_ok());
        assert!(validate_optional_name("name", Some(&String::new())).is_err());
    }

    #[test]
    fn roles() {
        assert_eq!(parse_role("editor").unwrap(), Role::Editor);
        let err = parse_role("owner").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["field_errors"]["role"].as_str().map(|s| s.contains("owner")), Some(true));
    }

    #[test]
    fn path_ids() {
        let id = Uuid::new_v4();
        let params: HashMap<String, String> = [("user_id".to_string(), id.to_string())].into_iter().collect();
        assert_eq!(path_id(&params, "user_id").unwrap(), id);

        let err = path_id(&params, "attribute_id").unwrap_err();
        assert_eq!(err.status_code(), 400);

        let params: HashMap<String, String> = [("user_id".to_string(), "bob".to_string())].into_iter().collect();
        let err = path_id(&params, "user_id").unwrap_err();
        assert_eq!(err.error_code(), "BAD_REQUEST");
        assert!(err.message().contains("bob"));
    }

    #[test]
    fn choices() {
        let allowed = ["cascade", "no action"];
        assert!(validate_choice("on_delete", "no action", &allowed).is_ok());

        let err = validate_choice("on_delete", "CASCADE", &allowed).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.to_json()["field_errors"]["on_delete"], "must be one of: cascade, no action");
    }
}
