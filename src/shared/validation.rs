//! Form field validation
//!
//! Checks run before a request is built. Failures become
//! `SharedError::ValidationError` and are shown inline by the caller.

use reqwest::Url;

use crate::shared::error::SharedError;

/// Minimum password length accepted by registration and reset flows
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn require(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, format!("{} is required", field)));
    }
    Ok(())
}

/// Loose shape check: one `@`, non-empty local part, dotted domain
pub fn email(field: &str, value: &str) -> Result<(), SharedError> {
    require(field, value)?;
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(SharedError::validation(field, "Please enter a valid email address"));
    }
    Ok(())
}

/// http(s) URL with a dotted host
pub fn url(field: &str, value: &str) -> Result<(), SharedError> {
    let valid = match Url::parse(value.trim()) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed
                    .host_str()
                    .is_some_and(|host| host.contains('.') && !host.starts_with('.'))
        }
        Err(_) => false,
    };
    if !valid {
        return Err(SharedError::validation(field, "Please enter a valid URL (http:// or https://)"));
    }
    Ok(())
}

/// Validate only when the optional field is filled in
pub fn optional_url(field: &str, value: Option<&str>) -> Result<(), SharedError> {
    match value {
        Some(value) if !value.trim().is_empty() => url(field, value),
        _ => Ok(()),
    }
}

pub fn password(field: &str, value: &str) -> Result<(), SharedError> {
    require(field, value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            field,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}
