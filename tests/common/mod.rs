#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use schedule_client::api::{CourseApi, CoursesQuery, MutationAck, WeekQuery};
use schedule_client::error::AppError;
use schedule_client::models::{
    Course, CourseStatus, Filiere, Named, Niveau, Notification, Paginated, Reference,
};
use tokio::sync::Notify;

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub fn time(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").expect("valid time")
}

pub fn course(id: u64, day: &str, start: &str) -> Course {
    course_in(id, day, start, 2, 5)
}

pub fn course_in(id: u64, day: &str, start: &str, filiere: u64, niveau: u64) -> Course {
    Course {
        id,
        start_time: time(start),
        end_time: time("18:00"),
        date: date(day),
        status: CourseStatus::Pending,
        room: Named {
            name: format!("Salle {}", id),
        },
        subject: Named {
            name: format!("Matiere {}", id),
        },
        filiere: Reference {
            id: filiere,
            name: format!("Filiere {}", filiere),
        },
        niveau: Reference {
            id: niveau,
            name: format!("Niveau {}", niveau),
        },
    }
}

pub fn filiere(id: u64, niveaux: &[u64]) -> Filiere {
    Filiere {
        id,
        name: format!("Filiere {}", id),
        description: None,
        niveaux: niveaux
            .iter()
            .map(|n| Niveau {
                id: *n,
                name: format!("Niveau {}", n),
                filiere_id: id,
            })
            .collect(),
    }
}

pub fn page(data: Vec<Course>, current_page: u32, last_page: u32, total: u64) -> Paginated<Course> {
    Paginated {
        data,
        current_page,
        last_page,
        total,
    }
}

/// In-memory `CourseApi` recording what it was asked.
#[derive(Default)]
pub struct FakeCourseApi {
    pub pages: Mutex<HashMap<u32, Paginated<Course>>>,
    pub pending: Mutex<Vec<Course>>,
    pub queries: Mutex<Vec<CoursesQuery>>,
    pub course_calls: AtomicUsize,
    pub pending_calls: AtomicUsize,
    pub fail_courses: AtomicBool,
    pub fail_complete: AtomicBool,
    pub gate: Option<Arc<Notify>>,
}

impl FakeCourseApi {
    pub fn with_pages(pages: Vec<Paginated<Course>>) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().map(|p| (p.current_page, p)).collect()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CourseApi for FakeCourseApi {
    async fn list_courses(&self, query: &CoursesQuery) -> Result<Paginated<Course>, AppError> {
        self.course_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_courses.load(Ordering::SeqCst) {
            return Err(AppError::Generic("Erreur lors de la récupération des cours".to_string()));
        }
        self.pages
            .lock()
            .unwrap()
            .get(&query.page)
            .cloned()
            .ok_or_else(|| AppError::Generic("no such page".to_string()))
    }

    async fn list_week_courses(&self, _query: &WeekQuery) -> Result<Vec<Course>, AppError> {
        Ok(Vec::new())
    }

    async fn list_pending_courses(&self) -> Result<Vec<Course>, AppError> {
        self.pending_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn get_course(&self, id: u64) -> Result<Course, AppError> {
        Err(AppError::Generic(format!("Course {} not found", id)))
    }

    async fn cancel_course(&self, _id: u64) -> Result<MutationAck, AppError> {
        Ok(MutationAck::Raw(serde_json::Value::Null))
    }

    async fn accept_course(&self, _id: u64) -> Result<MutationAck, AppError> {
        Ok(MutationAck::Raw(serde_json::Value::Null))
    }

    async fn complete_course(&self, id: u64) -> Result<(), AppError> {
        if self.fail_complete.load(Ordering::SeqCst) {
            return Err(AppError::Generic("Erreur".to_string()));
        }
        self.pending.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn list_filieres(&self) -> Result<Vec<Filiere>, AppError> {
        Ok(Vec::new())
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        Ok(Vec::new())
    }
}
