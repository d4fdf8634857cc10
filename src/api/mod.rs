pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url, header};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::models::{Course, Filiere, Notification, Paginated};
use crate::session::Session;

pub use dto::{CoursesQuery, DEFAULT_PAGE_SIZE, MutationAck, WeekQuery};

#[async_trait]
pub trait CourseApi: Send + Sync {
    async fn list_courses(&self, query: &CoursesQuery) -> Result<Paginated<Course>, AppError>;
    async fn list_week_courses(&self, query: &WeekQuery) -> Result<Vec<Course>, AppError>;
    async fn list_pending_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn get_course(&self, id: u64) -> Result<Course, AppError>;
    async fn cancel_course(&self, id: u64) -> Result<MutationAck, AppError>;
    async fn accept_course(&self, id: u64) -> Result<MutationAck, AppError>;
    async fn complete_course(&self, id: u64) -> Result<(), AppError>;
    async fn list_filieres(&self) -> Result<Vec<Filiere>, AppError>;
    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError>;
}

fn require_course_id(id: u64) -> Result<(), AppError> {
    if id == 0 {
        return Err(AppError::MissingInput("Course id is required".to_string()));
    }
    Ok(())
}

pub struct HttpCourseApi {
    client: Client,
    config: ApiConfig,
    session: Session,
}

impl HttpCourseApi {
    pub fn new(config: ApiConfig, session: Session) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, AppError> {
        let raw = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&raw)
            .map_err(|e| AppError::Config(format!("Invalid API url {}: {}", raw, e)))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and maps transport failures and non-2xx answers
    /// onto the error taxonomy.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> Result<Response, AppError> {
        let response = request.send().await.map_err(|e| {
            error!("{}: {}", fallback, e);
            AppError::Generic(fallback.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API error {}: {}", status, body);
            return Err(AppError::from_error_body(&body, fallback));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        fallback: &str,
    ) -> Result<T, AppError> {
        let url = self.url(path, params)?;
        debug!("GET {}", url);
        let response = self.send(self.request(Method::GET, url), fallback).await?;
        decode(response, fallback).await
    }

    async fn put_empty(&self, path: &str, fallback: &str) -> Result<Response, AppError> {
        let url = self.url(path, &[])?;
        debug!("PUT {}", url);
        self.send(self.request(Method::PUT, url), fallback).await
    }

    async fn mutate(&self, path: &str, fallback: &str) -> Result<MutationAck, AppError> {
        let response = self.put_empty(path, fallback).await?;
        let body = response.text().await.map_err(|e| {
            error!("{}: {}", fallback, e);
            AppError::Generic(fallback.to_string())
        })?;
        if body.trim().is_empty() {
            return Ok(MutationAck::Raw(serde_json::Value::Null));
        }
        Ok(serde_json::from_str::<MutationAck>(&body)
            .unwrap_or(MutationAck::Raw(serde_json::Value::String(body))))
    }
}

async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, AppError> {
    let body = response.text().await.map_err(|e| {
        error!("{}: {}", fallback, e);
        AppError::Generic(fallback.to_string())
    })?;
    serde_json::from_str::<T>(&body).map_err(|e| {
        error!("Failed to parse response: {}", e);
        AppError::Generic(fallback.to_string())
    })
}

#[async_trait]
impl CourseApi for HttpCourseApi {
    async fn list_courses(&self, query: &CoursesQuery) -> Result<Paginated<Course>, AppError> {
        query.validate()?;
        self.get_json(
            "/courses",
            &query.to_params(),
            "Erreur lors de la récupération des cours",
        )
        .await
    }

    async fn list_week_courses(&self, query: &WeekQuery) -> Result<Vec<Course>, AppError> {
        self.get_json(
            "/week/courses",
            &query.to_params(),
            "Erreur lors de la récupération des cours de la semaine",
        )
        .await
    }

    async fn list_pending_courses(&self) -> Result<Vec<Course>, AppError> {
        self.get_json(
            "/pending-validation/courses",
            &[],
            "Erreur lors de la récupération des cours en attente de validation",
        )
        .await
    }

    async fn get_course(&self, id: u64) -> Result<Course, AppError> {
        require_course_id(id)?;
        let fallback = format!("Erreur lors de la récupération du cours {}", id);
        self.get_json(&format!("/courses/{}", id), &[], &fallback)
            .await
    }

    async fn cancel_course(&self, id: u64) -> Result<MutationAck, AppError> {
        require_course_id(id)?;
        let fallback = format!("Erreur lors de l'annulation du cours {}", id);
        self.mutate(&format!("/cancel/courses/{}", id), &fallback)
            .await
    }

    async fn accept_course(&self, id: u64) -> Result<MutationAck, AppError> {
        require_course_id(id)?;
        let fallback = format!("Erreur lors de la validation du cours {}", id);
        self.mutate(&format!("/accept/courses/{}", id), &fallback)
            .await
    }

    async fn complete_course(&self, id: u64) -> Result<(), AppError> {
        require_course_id(id)?;
        let fallback = format!("Erreur lors du marquage du cours {}", id);
        // Body is ignored; callers refetch to observe the new status.
        self.put_empty(&format!("/complete/courses/{}", id), &fallback)
            .await?;
        Ok(())
    }

    async fn list_filieres(&self) -> Result<Vec<Filiere>, AppError> {
        self.get_json("/filieres", &[], "Erreur lors du chargement des filières")
            .await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        self.get_json(
            "/notifications",
            &[],
            "Erreur lors de la récupération des notifications",
        )
        .await
    }
}

pub struct NoopCourseApi;

#[async_trait]
impl CourseApi for NoopCourseApi {
    async fn list_courses(&self, query: &CoursesQuery) -> Result<Paginated<Course>, AppError> {
        query.validate()?;
        Ok(Paginated::single_page(Vec::new()))
    }

    async fn list_week_courses(&self, _query: &WeekQuery) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }

    async fn list_pending_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }

    async fn get_course(&self, id: u64) -> Result<Course, AppError> {
        require_course_id(id)?;
        Err(AppError::Generic(format!("Course {} not found", id)))
    }

    async fn cancel_course(&self, id: u64) -> Result<MutationAck, AppError> {
        require_course_id(id)?;
        Ok(MutationAck::Raw(serde_json::Value::Null))
    }

    async fn accept_course(&self, id: u64) -> Result<MutationAck, AppError> {
        require_course_id(id)?;
        Ok(MutationAck::Raw(serde_json::Value::Null))
    }

    async fn complete_course(&self, id: u64) -> Result<(), AppError> {
        require_course_id(id)
    }

    async fn list_filieres(&self) -> Result<Vec<Filiere>, AppError> {
        Ok(Vec::new())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        Ok(Vec::new())
    }
}
