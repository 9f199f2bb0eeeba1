//! Input validation for API requests.
//!
//! This module provides validation functions for API request data,
//! ensuring all inputs meet the required format and constraints.
//!
//! For collecting multiple validation errors and returning them as an ApiError,
//! use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating email addresses. Intentionally permissive:
    /// one @, no whitespace, and a dotted domain.
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^@\s]+@[^@\s]+\.[^@\s]+$"
    ).unwrap();

    /// Regex for validating card numbers (12-19 digits)
    static ref CARD_NUMBER_REGEX: Regex = Regex::new(
        r"^[0-9]{12,19}$"
    ).unwrap();
}

/// Validate an account name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 characters)".to_string());
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 255 {
        return Err("Email is too long (max 255 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }

    Ok(())
}

/// Valid account roles
const VALID_ROLES: [&str; 2] = ["user", "admin"];

/// Validate a role value
pub fn validate_role(role: &str) -> Result<(), String> {
    if role.is_empty() {
        return Err("Role is required".to_string());
    }

    let role_lower = role.to_lowercase();
    if !VALID_ROLES.contains(&role_lower.as_str()) {
        return Err(format!(
            "Invalid role. Must be one of: {}",
            VALID_ROLES.join(", ")
        ));
    }
    Ok(())
}

/// Validate a book title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.len() > 255 {
        return Err("Title is too long (max 255 characters)".to_string());
    }

    Ok(())
}

/// Validate a photo reference supplied as a string
pub fn validate_photo(photo: &str) -> Result<(), String> {
    if photo.trim().is_empty() {
        return Err("Photo is required".to_string());
    }

    Ok(())
}

/// Validate a book price
pub fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() {
        return Err("Price must be a valid number".to_string());
    }

    if price < 0.0 {
        return Err("Price cannot be negative".to_string());
    }

    Ok(())
}

/// Validate a book description
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }

    Ok(())
}

/// Validate a card number (digits only, 12-19 characters)
pub fn validate_card_number(card_number: &str) -> Result<(), String> {
    if card_number.is_empty() {
        return Err("Card number is required".to_string());
    }

    if !CARD_NUMBER_REGEX.is_match(card_number) {
        return Err("Card number must be 12 to 19 digits".to_string());
    }

    Ok(())
}
