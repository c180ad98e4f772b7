//! Input validation module

use crate::models::{CreateIssue, LoginRequest, RegisterRequest};
use thiserror::Error;

pub const TITLE_MAX_LEN: usize = 200;
pub const DESCRIPTION_MIN_LEN: usize = 20;
pub const DESCRIPTION_MAX_LEN: usize = 5000;
pub const COMMENT_MAX_LEN: usize = 2000;
pub const NAME_MIN_LEN: usize = 2;
pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' is too long (max {max} characters)")]
    TooLong { field: String, max: usize },

    #[error("Field '{field}' is too short (min {min} characters)")]
    TooShort { field: String, min: usize },

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Location is outside valid coordinates")]
    InvalidLocation,
}

/// Validate a report before it reaches the issue store
pub fn validate_create_issue(input: &CreateIssue) -> Result<(), ValidationError> {
    require("title", &input.title)?;
    max_len("title", &input.title, TITLE_MAX_LEN)?;

    require("description", &input.description)?;
    min_len("description", &input.description, DESCRIPTION_MIN_LEN)?;
    max_len("description", &input.description, DESCRIPTION_MAX_LEN)?;

    let loc = &input.location;
    if !(-90.0..=90.0).contains(&loc.lat) || !(-180.0..=180.0).contains(&loc.lng) {
        return Err(ValidationError::InvalidLocation);
    }

    Ok(())
}

/// Validate comment content; whitespace-only text counts as empty
pub fn validate_comment(content: &str) -> Result<(), ValidationError> {
    require("content", content)?;
    max_len("content", content, COMMENT_MAX_LEN)
}

pub fn validate_login(input: &LoginRequest) -> Result<(), ValidationError> {
    email(&input.email)?;
    require("password", &input.password)?;
    min_len("password", &input.password, PASSWORD_MIN_LEN)
}

pub fn validate_registration(input: &RegisterRequest) -> Result<(), ValidationError> {
    require("name", &input.name)?;
    min_len("name", &input.name, NAME_MIN_LEN)?;

    email(&input.email)?;

    require("password", &input.password)?;
    min_len("password", &input.password, PASSWORD_MIN_LEN)?;

    if input.password != input.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    require("email", value)?;
    if !validator::validate_email(value.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn min_len(field: &str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}
