use serde::{Deserialize, Serialize};

/// One page of a paginated listing, as returned by the backend paginator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Lifts a flat listing into a single page so it can go through the
    /// same filtering as paginated results.
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            data,
            current_page: 1,
            last_page: 1,
            total,
        }
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Same paging metadata, different items.
    pub fn with_data<U>(&self, data: Vec<U>) -> Paginated<U> {
        Paginated {
            data,
            current_page: self.current_page,
            last_page: self.last_page,
            total: self.total,
        }
    }
}
