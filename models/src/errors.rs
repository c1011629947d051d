// models/src/errors.rs

pub use thiserror::Error;

/// Errors raised when a request-shaped record fails its range checks.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("pain_rating must be between 0 and 10, got {0}")]
    InvalidPainRating(i32),
    #[error("age must not be negative, got {0}")]
    InvalidAge(i32),
    #[error("latitude must be between -90 and 90, got {0}")]
    InvalidLatitude(f64),
    #[error("longitude must be between -180 and 180, got {0}")]
    InvalidLongitude(f64),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn should_render_field_in_message() {
        assert_eq!(
            ValidationError::InvalidPainRating(11).to_string(),
            "pain_rating must be between 0 and 10, got 11"
        );
        assert_eq!(ValidationError::EmptyField("password").to_string(), "password must not be empty");
    }
}
