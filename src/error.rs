use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

pub const GENERIC_MESSAGE: &str = "Une erreur est survenue";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Validation failed: {}", summarize(.fields))]
    Validation {
        message: Option<String>,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("{0}")]
    Generic(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Text shown to the user next to (possibly stale) data. A top-level
    /// `message` from the backend wins over the first field error.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            AppError::Validation { fields, .. } => fields
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
            AppError::MissingInput(msg) | AppError::Generic(msg) | AppError::Config(msg) => {
                if msg.is_empty() {
                    GENERIC_MESSAGE.to_string()
                } else {
                    msg.clone()
                }
            }
        }
    }

    /// Normalizes a non-success body. `fallback` is used when the body
    /// carries neither validation errors nor a message.
    pub fn from_error_body(body: &str, fallback: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                errors: Some(fields),
                message,
            }) if !fields.is_empty() => AppError::Validation {
                message: message.filter(|m| !m.is_empty()),
                fields,
            },
            Ok(ErrorBody {
                message: Some(message),
                ..
            }) if !message.is_empty() => AppError::Generic(message),
            _ => AppError::Generic(fallback.to_string()),
        }
    }
}

/// Error payload returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub message: Option<String>,
}

fn summarize(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}
