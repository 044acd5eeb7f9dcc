use serde_json::Value;

use super::{as_object, ValidationErrors, Validator};

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_INVALID: &str = "Please include a valid email";
pub const PASSWORD_TOO_SHORT: &str = "Please enter a password with 6 or more characters";
pub const PASSWORD_REQUIRED: &str = "Password is required";

pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn registration(body: &Value) -> Result<Registration, ValidationErrors> {
    let body = as_object(body)?;
    let mut v = Validator::new(body);

    let name = v.required_text("name", NAME_REQUIRED);
    let email = v.required_email("email", EMAIL_INVALID);
    let password = v.required_secret("password", PASSWORD_MIN_CHARS, PASSWORD_TOO_SHORT);

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) if v.is_clean() => Ok(Registration { name, email, password }),
        _ => Err(v.into_errors()),
    }
}

pub fn credentials(body: &Value) -> Result<Credentials, ValidationErrors> {
    let body = as_object(body)?;
    let mut v = Validator::new(body);

    let email = v.required_email("email", EMAIL_INVALID);
    let password = v.required_secret("password", 1, PASSWORD_REQUIRED);

    match (email, password) {
        (Some(email), Some(password)) if v.is_clean() => Ok(Credentials { email, password }),
        _ => Err(v.into_errors()),
    }
}
