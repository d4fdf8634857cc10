use std::sync::Arc;

use crate::api::{CourseApi, HttpCourseApi};
use crate::config::ApiConfig;
use crate::error::AppError;
use crate::session::Session;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CourseApi>,
    pub session: Session,
}

impl AppState {
    pub fn new(config: ApiConfig, session: Session) -> Result<Self, AppError> {
        let api = HttpCourseApi::new(config, session.clone())?;
        Ok(Self {
            api: Arc::new(api),
            session,
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(ApiConfig::new_from_env()?, Session::from_env()?)
    }
}
