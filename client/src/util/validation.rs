//! Client-side form checks run before any request is sent.
//!
//! Each form collects every field error at once so the page can show them
//! next to their inputs.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const NAME_TOO_SHORT: &str = "Full name must be at least 2 characters";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

/// Loose shape check: one `@`, a non-empty local part, and a dotted domain
/// with no empty labels. Whitespace anywhere fails.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.contains('@') && domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// Per-field messages; `None` means the field is fine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub full_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.email.is_none() && self.password.is_none() && self.confirm_password.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            email: (!is_valid_email(self.email.trim())).then_some(INVALID_EMAIL),
            password: self.password.is_empty().then_some(PASSWORD_REQUIRED),
            ..FieldErrors::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            full_name: (self.full_name.trim().chars().count() < MIN_NAME_CHARS).then_some(NAME_TOO_SHORT),
            email: (!is_valid_email(self.email.trim())).then_some(INVALID_EMAIL),
            password: (self.password.chars().count() < MIN_PASSWORD_CHARS).then_some(PASSWORD_TOO_SHORT),
            confirm_password: (self.password != self.confirm_password).then_some(PASSWORDS_DIFFER),
        }
    }
}
