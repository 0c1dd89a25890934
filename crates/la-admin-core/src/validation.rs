//! Client-side form validation.
//!
//! Forms are checked before anything is sent to the backend. Each field
//! reports at most one message, in the order required → format.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::models::{LocalAuthority, LocalAuthorityPayload, User, UserRole, UserUpdatePayload};

pub const REQUIRED: &str = "required";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const INVALID_PHONE: &str = "Phone number is not valid";
pub const INVALID_ROLE: &str = "Invalid role";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((\+[1-9]{1,4}[ -]?)|(\([0-9]{2,3}\)[ -]?)|([0-9]{2,4})[ -]?)*?[0-9]{3,4}[ -]?[0-9]{3,4}$",
    )
    .expect("phone pattern is valid")
});

/// A single field violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All violations found in one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Trims `value` and records `required` if nothing is left.
fn required(errors: &mut ValidationErrors, field: &'static str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        None
    } else {
        Some(value.to_string())
    }
}

fn check_email(errors: &mut ValidationErrors, value: &str) -> String {
    match required(errors, "email", value) {
        Some(email) if !EMAIL_PATTERN.is_match(&email) => {
            errors.add("email", INVALID_EMAIL);
            email
        }
        other => other.unwrap_or_default(),
    }
}

/// Create/edit form for a local authority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalAuthorityForm {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub phone: String,
    pub area: String,
    pub state: String,
}

impl From<&LocalAuthority> for LocalAuthorityForm {
    fn from(authority: &LocalAuthority) -> Self {
        Self {
            name: authority.name.clone(),
            nickname: authority.nickname.clone(),
            email: authority.email.clone(),
            phone: authority.no_telephone.clone(),
            area: authority.area.clone(),
            state: authority.state.clone(),
        }
    }
}

impl LocalAuthorityForm {
    /// Validates the form and builds the request body.
    pub fn validate(&self) -> Result<LocalAuthorityPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = required(&mut errors, "name", &self.name).unwrap_or_default();
        let nickname = required(&mut errors, "nickname", &self.nickname).unwrap_or_default();
        let email = check_email(&mut errors, &self.email);
        let phone = match required(&mut errors, "phone", &self.phone) {
            Some(phone) if !PHONE_PATTERN.is_match(&phone) => {
                errors.add("phone", INVALID_PHONE);
                phone
            }
            other => other.unwrap_or_default(),
        };
        let area = required(&mut errors, "area", &self.area).unwrap_or_default();
        let state = required(&mut errors, "state", &self.state).unwrap_or_default();

        errors.into_result(LocalAuthorityPayload {
            name,
            nickname,
            email,
            no_telephone: phone,
            area,
            state,
        })
    }
}

/// Edit form for a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone().unwrap_or_default(),
            phone: user.no_telephone.clone().unwrap_or_default(),
            role: user.role.clone(),
        }
    }
}

impl UserForm {
    /// Validates the form and builds the request body. The email is checked
    /// but not sent; the backend does not accept email changes here.
    pub fn validate(&self) -> Result<UserUpdatePayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = required(&mut errors, "name", &self.name).unwrap_or_default();
        check_email(&mut errors, &self.email);
        let phone = required(&mut errors, "phone", &self.phone).unwrap_or_default();
        let role = match required(&mut errors, "role", &self.role) {
            Some(role) => match role.parse::<UserRole>() {
                Ok(role) => Some(role),
                Err(_) => {
                    errors.add("role", INVALID_ROLE);
                    None
                }
            },
            None => None,
        };

        match role {
            Some(role) if errors.is_empty() => Ok(UserUpdatePayload {
                name,
                no_telephone: phone,
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority_form() -> LocalAuthorityForm {
        LocalAuthorityForm {
            name: "Majlis Bandaraya Petaling Jaya".to_string(),
            nickname: "MBPJ".to_string(),
            email: "info@mbpj.gov.my".to_string(),
            phone: "03-7956 3544".to_string(),
            area: "Petaling Jaya".to_string(),
            state: "Selangor".to_string(),
        }
    }

    #[test]
    fn test_valid_authority_form() {
        let payload = authority_form().validate().unwrap();
        assert_eq!(payload.nickname, "MBPJ");
        assert_eq!(payload.no_telephone, "03-7956 3544");
    }

    #[test]
    fn test_authority_form_trims_fields() {
        let mut form = authority_form();
        form.name = "  MBSA  ".to_string();
        assert_eq!(form.validate().unwrap().name, "MBSA");
    }

    #[test]
    fn test_empty_authority_form_requires_everything() {
        let errors = LocalAuthorityForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        for field in ["name", "nickname", "email", "phone", "area", "state"] {
            assert_eq!(errors.get(field), Some(REQUIRED), "{field}");
        }
    }

    #[test]
    fn test_authority_form_bad_email_and_phone() {
        let mut form = authority_form();
        form.email = "not-an-email".to_string();
        form.phone = "12".to_string();

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(INVALID_EMAIL));
        assert_eq!(errors.get("phone"), Some(INVALID_PHONE));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "email: Invalid email, phone: Phone number is not valid"
        );
    }

    #[test]
    fn test_phone_formats() {
        for phone in ["0123456789", "+60123456789", "+1 555-123-4567", "(03) 7956 3544", "012-3456789"] {
            assert!(PHONE_PATTERN.is_match(phone), "{phone} should be valid");
        }
        for phone in ["abc", "12", "phone: 0123456789"] {
            assert!(!PHONE_PATTERN.is_match(phone), "{phone} should be invalid");
        }
    }

    #[test]
    fn test_form_from_record() {
        let authority = LocalAuthority {
            id: "1".to_string(),
            name: "MPS".to_string(),
            nickname: "Selayang".to_string(),
            email: "mps@mps.gov.my".to_string(),
            no_telephone: "0361265800".to_string(),
            area: "Selayang".to_string(),
            state: "Selangor".to_string(),
            income: None,
        };
        let form = LocalAuthorityForm::from(&authority);
        assert_eq!(form.phone, "0361265800");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_valid_user_form() {
        let form = UserForm {
            name: "Aminah".to_string(),
            email: "aminah@example.com".to_string(),
            phone: "0123456789".to_string(),
            role: "traffic warden".to_string(),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.role, UserRole::TrafficWarden);
        assert_eq!(payload.no_telephone, "0123456789");
    }

    #[test]
    fn test_user_form_rejects_unknown_role() {
        let form = UserForm {
            name: "Aminah".to_string(),
            email: "aminah@example.com".to_string(),
            phone: "0123456789".to_string(),
            role: "superuser".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("role"), Some(INVALID_ROLE));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_user_form_missing_fields() {
        let errors = UserForm::default().validate().unwrap_err();
        for field in ["name", "email", "phone", "role"] {
            assert_eq!(errors.get(field), Some(REQUIRED), "{field}");
        }
    }
}
