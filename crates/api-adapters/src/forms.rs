//! Server-side form payloads and required-field validation.
//!
//! Every field defaults to empty so a missing key surfaces as a validation
//! message on the re-rendered form rather than a rejected request.

use std::collections::BTreeMap;

use serde::Deserialize;

const REQUIRED: &str = "This field is required.";

/// Per-field messages shown next to the inputs.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    fn require(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.0.insert(field, REQUIRED);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).copied()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors::default()
            .require("name", &self.name)
            .require("email", &self.email)
            .require("password", &self.password)
    }

    /// Copy for re-rendering; the password is never echoed back.
    pub fn without_password(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors::default()
            .require("email", &self.email)
            .require("password", &self.password)
    }
}

/// Authoring form shared by new-post and edit-post. `author` is only shown
/// and required when editing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub body: String,
}

impl PostForm {
    pub fn validate(&self, editing: bool) -> FieldErrors {
        let errors = FieldErrors::default()
            .require("title", &self.title)
            .require("subtitle", &self.subtitle)
            .require("body", &self.body);
        if editing {
            errors.require("author", &self.author)
        } else {
            errors
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub comment: String,
}

impl CommentForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors::default().require("comment", &self.comment)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> FieldErrors {
        FieldErrors::default()
            .require("name", &self.name)
            .require("email", &self.email)
            .require("phone", &self.phone)
            .require("message", &self.message)
    }
}
