//! Credential form validation.
//!
//! Each field reports at most one message: the required check runs first,
//! then the format or length check.

use std::sync::LazyLock;

use regex::Regex;

pub const EMAIL_REQUIRED: &str = "E-mail é obrigatório";
pub const EMAIL_INVALID: &str = "E-mail inválido";
pub const PASSWORD_REQUIRED: &str = "Senha é obrigatória";
pub const PASSWORD_TOO_SHORT: &str = "Mínimo 6 caracteres";
pub const NAME_REQUIRED: &str = "Nome é obrigatório";

/// Minimum password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;

// HTML living standard "valid e-mail address".
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("invalid email pattern")
});

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

pub fn validate_email(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !EMAIL_RE.is_match(email) {
        Some(EMAIL_INVALID)
    } else {
        None
    }
}

pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if password.chars().count() < PASSWORD_MIN_CHARS {
        Some(PASSWORD_TOO_SHORT)
    } else {
        None
    }
}

pub fn validate_name(name: &str) -> Option<&'static str> {
    name.is_empty().then_some(NAME_REQUIRED)
}

/// Validates the login form.
///
/// # Errors
/// Returns the per-field messages if any field is invalid.
pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let errors = FieldErrors {
        name: None,
        email: validate_email(email),
        password: validate_password(password),
    };
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validates the registration form.
///
/// # Errors
/// Returns the per-field messages if any field is invalid.
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), FieldErrors> {
    let errors = FieldErrors {
        name: validate_name(name),
        email: validate_email(email),
        password: validate_password(password),
    };
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
