//! Pure transforms from a flat course listing to what the list and
//! timetable screens display.

pub mod format;
pub mod grouping;
pub mod week;

pub use format::{format_hour, long_date_fr, weekday_label};
pub use grouping::{DateSection, group_by_date};
pub use week::{
    AFTERNOON_START_HOUR, CourseSummary, DAYS_IN_GRID, HalfDay, Slot, WeekGrid, WeekRange, day_index,
    week_range,
};
