use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Course;
use crate::schedule::WeekRange;
use crate::session::Role;

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Parameters of `GET /courses`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoursesQuery {
    pub page: u32,
    pub per_page: u32,
    pub start_date: Option<NaiveDate>,
    pub today: Option<bool>,
}

impl Default for CoursesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            start_date: None,
            today: None,
        }
    }
}

impl CoursesQuery {
    pub fn starting(start_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            ..Self::default()
        }
    }

    pub fn today() -> Self {
        Self {
            today: Some(true),
            ..Self::default()
        }
    }

    pub fn page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.page == 0 {
            return Err(AppError::MissingInput("page must be at least 1".to_string()));
        }
        if self.per_page == 0 {
            return Err(AppError::MissingInput("per_page must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(start_date) = self.start_date {
            params.push(("start_date", start_date.format("%Y-%m-%d").to_string()));
        }
        if let Some(today) = self.today {
            params.push(("isToday", today.to_string()));
        }
        params
    }
}

/// Parameters of `GET /week/courses`. Both dates are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub niveau_id: Option<u64>,
}

impl WeekQuery {
    pub fn new(range: WeekRange) -> Self {
        Self {
            start_date: range.start,
            end_date: range.end,
            niveau_id: None,
        }
    }

    /// Keeps `niveau_id` only for roles whose schedule is scoped by niveau.
    pub fn for_role(range: WeekRange, role: Option<Role>, niveau_id: Option<u64>) -> Self {
        let scoped = role.is_some_and(Role::scopes_by_niveau);
        Self {
            niveau_id: if scoped { niveau_id } else { None },
            ..Self::new(range)
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("startDate", self.start_date.format("%Y-%m-%d").to_string()),
            ("endDate", self.end_date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(niveau_id) = self.niveau_id.filter(|id| *id != 0) {
            params.push(("niveau_id", niveau_id.to_string()));
        }
        params
    }
}

/// What the backend answers to cancel/accept: the updated course, a
/// message, or something else we pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MutationAck {
    Course(Box<Course>),
    Message { message: String },
    Raw(serde_json::Value),
}

impl MutationAck {
    pub fn message(&self) -> Option<&str> {
        match self {
            MutationAck::Message { message } => Some(message.as_str()),
            MutationAck::Raw(serde_json::Value::String(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn course(&self) -> Option<&Course> {
        match self {
            MutationAck::Course(course) => Some(&**course),
            _ => None,
        }
    }
}
