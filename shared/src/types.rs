//! API request and response types
//!
//! Request bodies carry `validator` rules mirroring the field-presence checks
//! of the API. String fields default to empty so a missing field is reported
//! as a validation message rather than a JSON parse error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Success envelope: `{ "success": true, "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            action: None,
            data,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

impl<T> DataResponse<Vec<T>> {
    /// Envelope for a list, including its length
    pub fn list(data: Vec<T>) -> Self {
        Self {
            count: Some(data.len()),
            ..Self::new(data)
        }
    }
}

/// `{ "success": true, "message": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Login / registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create or update the caller's profile
///
/// `skills` is a comma-separated list, e.g. `"rust, sql , go"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Skills is required"))]
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

/// Add an experience entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ExperienceRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    pub location: Option<String>,
    #[validate(required(message = "From is required"))]
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Add an education entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct EducationRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "School is required"))]
    pub school: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Field of study is required"))]
    pub fieldofstudy: String,
    #[validate(required(message = "From is required"))]
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Create a post, or comment on one
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TextRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}
