use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    // Optional leading '+', then 10 to 15 digits
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\+?[0-9]{10,15}$").unwrap();
}

/// Credentials posted to `/auth/login/{kind}`.
///
/// Sent as given. Only empty fields are refused before the request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Payload posted to `/auth/register/{kind}`.
///
/// The business fields are only meaningful for mechanic accounts and are omitted
/// from the request body when empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Between 2 and 50 characters.
    #[validate(length(min = 2, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    /// Digits only, optionally prefixed with '+'.
    #[validate(regex(path = "PHONE_REGEX", message = "Phone must be 10 to 15 digits"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[validate(length(min = 2, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expertise_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vehicle_brands: Vec<String>,
}
