use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Enseignant,
    Etudiant,
    Delegue,
}

impl Role {
    /// Instructors browse several niveaux, so their week queries carry one.
    pub fn scopes_by_niveau(self) -> bool {
        matches!(self, Role::Enseignant)
    }

    pub fn can_filter_courses(self) -> bool {
        matches!(self, Role::Enseignant)
    }

    pub fn can_complete_courses(self) -> bool {
        matches!(self, Role::Delegue)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enseignant" => Ok(Role::Enseignant),
            "etudiant" | "étudiant" => Ok(Role::Etudiant),
            "delegue" | "délégué" => Ok(Role::Delegue),
            other => Err(AppError::Config(format!("unknown role: {}", other))),
        }
    }
}

/// Credential and role of the signed-in user. Acquired elsewhere and handed
/// to the accessor at construction.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
    role: Option<Role>,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            token: Some(token.into()),
            role,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self, AppError> {
        let token = env::var("API_TOKEN").ok().filter(|t| !t.is_empty());
        let role = match env::var("API_ROLE") {
            Ok(raw) if !raw.is_empty() => Some(raw.parse()?),
            _ => None,
        };
        Ok(Self { token, role })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}
