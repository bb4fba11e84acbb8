use std::sync::LazyLock;

use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MIN_CART_QUANTITY: u32 = 1;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Client side rejects, none of them ever reach the network
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Username cannot be empty.")]
    EmptyUsername,

    #[error("Please enter a valid email.")]
    InvalidEmail,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("Please select a rating.")]
    MissingRating,

    #[error("Rating must be between 1 and 5.")]
    RatingOutOfRange(u8),

    #[error("Comment cannot be empty.")]
    EmptyComment,

    #[error("Quantity cannot go below 1.")]
    QuantityBelowMinimum,

    #[error("Quantity cannot go any higher.")]
    QuantityAboveMaximum,

    #[error("Please fill in all fields before placing the order")]
    IncompleteAddress,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please select a delivery option")]
    NoDeliveryType,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn require_filled(fields: &[&str]) -> Result<(), ValidationError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

/// Checks of the credentials form. An empty password means "keep the current one".
pub fn validate_credentials(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// A rating of 0 means nothing was selected yet
pub fn validate_review(rating: u8, comment: &str) -> Result<(), ValidationError> {
    if rating == 0 {
        return Err(ValidationError::MissingRating);
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    if comment.trim().is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(())
}

pub fn validate_quantity(quantity: u32) -> Result<(), ValidationError> {
    if quantity < MIN_CART_QUANTITY {
        return Err(ValidationError::QuantityBelowMinimum);
    }
    Ok(())
}

#[cfg(test)]
mod tests_validation {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("john.doe@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn credentials() {
        assert_eq!(validate_credentials("alice", "a@b.com", ""), Ok(()));
        assert_eq!(validate_credentials("alice", "a@b.com", "secret"), Ok(()));
        assert_eq!(
            validate_credentials("   ", "a@b.com", ""),
            Err(ValidationError::EmptyUsername)
        );
        assert_eq!(
            validate_credentials("alice", "alice", ""),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_credentials("alice", "a@b.com", "12345"),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn reviews() {
        assert_eq!(validate_review(4, "Great"), Ok(()));
        assert_eq!(validate_review(0, "Great"), Err(ValidationError::MissingRating));
        assert_eq!(
            validate_review(6, "Great"),
            Err(ValidationError::RatingOutOfRange(6))
        );
        assert_eq!(validate_review(3, "  "), Err(ValidationError::EmptyComment));
    }

    #[test]
    fn quantity_and_fields() {
        assert_eq!(validate_quantity(1), Ok(()));
        assert_eq!(validate_quantity(0), Err(ValidationError::QuantityBelowMinimum));
        assert_eq!(require_filled(&["a", "b"]), Ok(()));
        assert_eq!(require_filled(&["a", " "]), Err(ValidationError::MissingFields));
    }
}
