/// Validation utilities for registration input.
///
/// Rules and messages mirror the user service's bean validation so local
/// failures read exactly like server-side ones (`field: message`).

pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> ValidationResult {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() {
        return ValidationResult::err("Email must be valid");
    }

    let domain = parts[1];
    if domain.is_empty()
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return ValidationResult::err("Email must be valid");
    }

    ValidationResult::ok()
}

/// Validate username
pub fn validate_username(username: &str) -> ValidationResult {
    if username.trim().is_empty() {
        return ValidationResult::err("Username cannot be blank");
    }

    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return ValidationResult::err("Username must be between 3 and 50 characters");
    }

    ValidationResult::ok()
}

/// Validate password
pub fn validate_password(password: &str) -> ValidationResult {
    if password.trim().is_empty() {
        return ValidationResult::err("Password cannot be blank");
    }

    if password.chars().count() < 6 {
        return ValidationResult::err("Password must be at least 6 characters long");
    }

    ValidationResult::ok()
}

/// Validate a full registration form; every failing field is reported.
pub fn validate_registration(username: &str, password: &str, email: Option<&str>) -> ValidationResult {
    let mut errors = Vec::new();

    if let Some(error) = validate_username(username).error {
        errors.push(format!("username: {}", error));
    }
    if let Some(error) = validate_password(password).error {
        errors.push(format!("password: {}", error));
    }
    if let Some(error) = email
        .filter(|email| !email.is_empty())
        .and_then(|email| validate_email(email).error)
    {
        errors.push(format!("email: {}", error));
    }

    if errors.is_empty() {
        ValidationResult::ok()
    } else {
        ValidationResult::err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("test@example.com").is_valid);
        assert!(validate_email("user@localhost").is_valid);
        assert!(!validate_email("invalid").is_valid);
        assert!(!validate_email("@example.com").is_valid);
        assert!(!validate_email("test@").is_valid);
        assert!(!validate_email("a b@example.com").is_valid);
    }

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice").is_valid);
        assert!(validate_username("用户名").is_valid);
        assert!(!validate_username("ab").is_valid);
        assert!(!validate_username("   ").is_valid);
        assert!(!validate_username(&"x".repeat(51)).is_valid);
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("secret").is_valid);
        assert!(!validate_password("short").is_valid);
        assert!(!validate_password("").is_valid);
    }

    #[test]
    fn test_registration_reports_every_field() {
        let result = validate_registration("ab", "123", Some("nope"));
        assert_eq!(
            result.error.as_deref(),
            Some(
                "username: Username must be between 3 and 50 characters; \
                 password: Password must be at least 6 characters long; \
                 email: Email must be valid"
            )
        );
        assert!(validate_registration("alice", "secret1", None).is_valid);
        assert!(validate_registration("alice", "secret1", Some("")).is_valid);
    }
}
