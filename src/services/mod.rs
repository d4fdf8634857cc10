pub mod fetch;
pub mod filter;
pub mod pagination;

pub use fetch::{FetchHandle, FetchState, Operation, operation};
pub use filter::{CourseFilter, FilterMode, filter_courses};
pub use pagination::{CoursePager, PagerState};
