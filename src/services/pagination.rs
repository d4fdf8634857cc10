use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::api::{CourseApi, CoursesQuery, DEFAULT_PAGE_SIZE};
use crate::models::{Course, Paginated};
use crate::schedule::{DateSection, group_by_date};
use crate::services::fetch::FetchHandle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagerState {
    pub courses: Vec<Course>,
    pub current_page: u32,
    pub last_page: u32,
    pub loading_more: bool,
    /// Bumped by every `sync`; a page requested under an older generation
    /// is discarded.
    pub generation: u64,
}

/// Clears the in-flight flag however `load_more` ends, including when its
/// future is dropped.
struct InFlight<'a>(&'a watch::Sender<PagerState>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|state| state.loading_more = false);
    }
}

/// Accumulates pages of the course list as the user scrolls.
pub struct CoursePager {
    api: Arc<dyn CourseApi>,
    query: CoursesQuery,
    state: watch::Sender<PagerState>,
}

impl CoursePager {
    /// `query` holds the filters of the first page; later pages reuse them.
    pub fn new(api: Arc<dyn CourseApi>, query: CoursesQuery, first: &Paginated<Course>) -> Self {
        let pager = Self {
            api,
            query,
            state: watch::Sender::new(PagerState::default()),
        };
        pager.sync(first);
        pager
    }

    /// Replaces everything accumulated so far with a fresh first page.
    pub fn sync(&self, page: &Paginated<Course>) {
        self.state.send_modify(|state| {
            state.courses = page.data.clone();
            state.current_page = page.current_page;
            state.last_page = page.last_page;
            state.generation += 1;
        });
    }

    /// Fetches and appends the next page. Returns whether a page was added.
    /// Errors are logged and otherwise ignored.
    pub async fn load_more(&self) -> bool {
        let mut next = None;
        self.state.send_if_modified(|state| {
            if state.loading_more || state.current_page >= state.last_page {
                return false;
            }
            state.loading_more = true;
            next = Some((state.current_page + 1, state.generation));
            true
        });
        let Some((page, generation)) = next else {
            return false;
        };
        let _in_flight = InFlight(&self.state);

        let query = CoursesQuery {
            page,
            per_page: DEFAULT_PAGE_SIZE,
            ..self.query.clone()
        };
        match self.api.list_courses(&query).await {
            Ok(response) => {
                info!(
                    "loaded page {}/{} ({} courses)",
                    response.current_page,
                    response.last_page,
                    response.data.len()
                );
                let appended = self.state.send_if_modified(|state| {
                    if state.generation != generation {
                        return false;
                    }
                    state.courses.extend(response.data);
                    state.current_page = response.current_page;
                    state.last_page = response.last_page;
                    true
                });
                if !appended {
                    debug!("page {} arrived after a re-sync, dropped", page);
                }
                appended
            }
            Err(e) => {
                error!("Failed to load more courses: {}", e);
                false
            }
        }
    }

    /// Refetches page 1 through `source`, then re-syncs from its data.
    pub async fn refresh(&self, source: &FetchHandle<Paginated<Course>>) {
        source.fetch().await;
        if let Some(page) = source.data() {
            self.sync(&page);
        }
    }

    pub fn state(&self) -> PagerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PagerState> {
        self.state.subscribe()
    }

    pub fn courses(&self) -> Vec<Course> {
        self.state.borrow().courses.clone()
    }

    pub fn has_more(&self) -> bool {
        let state = self.state.borrow();
        state.current_page < state.last_page
    }

    pub fn sections(&self) -> Vec<DateSection> {
        group_by_date(&self.state.borrow().courses)
    }
}
