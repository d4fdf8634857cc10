use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::models::{Course, Reference};

/// Monday through Saturday; Sunday has no column.
pub const DAYS_IN_GRID: usize = 6;

/// Courses starting at or after this hour go to the afternoon row.
pub const AFTERNOON_START_HOUR: u32 = 14;

/// Day of week with Monday = 0 .. Sunday = 6.
pub fn day_index(date: NaiveDate) -> usize {
    ((date.weekday().num_days_from_sunday() + 6) % 7) as usize
}

/// Monday-to-Saturday span queried for the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    /// True for any day of the calendar week, Sunday included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.start + Days::new(6)
    }

    pub fn next(&self) -> Self {
        week_range(self.start + Days::new(7))
    }

    pub fn previous(&self) -> Self {
        week_range(self.start - Days::new(7))
    }
}

pub fn week_range(date: NaiveDate) -> WeekRange {
    let start = date - Days::new(day_index(date) as u64);
    WeekRange {
        start,
        end: start + Days::new(5),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub id: u64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject: String,
    pub room: String,
    pub filiere: Reference,
    pub niveau: Reference,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            date: course.date,
            start_time: course.start_time,
            end_time: course.end_time,
            subject: course.subject.name.clone(),
            room: course.room.name.clone(),
            filiere: course.filiere.clone(),
            niveau: course.niveau.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "course", rename_all = "snake_case")]
pub enum Slot {
    #[default]
    Empty,
    Course(CourseSummary),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub fn course(&self) -> Option<&CourseSummary> {
        match self {
            Slot::Course(summary) => Some(summary),
            Slot::Empty => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfDay {
    Morning,
    Afternoon,
}

impl HalfDay {
    pub fn of(time: NaiveTime) -> Self {
        if chrono::Timelike::hour(&time) < AFTERNOON_START_HOUR {
            HalfDay::Morning
        } else {
            HalfDay::Afternoon
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGrid {
    pub week: Option<WeekRange>,
    pub morning: [Slot; DAYS_IN_GRID],
    pub afternoon: [Slot; DAYS_IN_GRID],
}

impl WeekGrid {
    pub fn empty() -> Self {
        Self {
            week: None,
            morning: std::array::from_fn(|_| Slot::Empty),
            afternoon: std::array::from_fn(|_| Slot::Empty),
        }
    }

    /// Grid for the week containing `reference`. Courses dated outside that
    /// week are ignored.
    pub fn build(reference: NaiveDate, courses: &[Course]) -> Self {
        let week = week_range(reference);
        let mut grid = Self::empty();
        grid.week = Some(week);
        for course in courses.iter().filter(|c| week.contains(c.date)) {
            grid.place(course);
        }
        grid
    }

    /// Places every course by weekday alone, whatever week it belongs to.
    /// This is how the timetable screen lays out what the week endpoint
    /// returned.
    pub fn build_unbounded(courses: &[Course]) -> Self {
        let mut grid = Self::empty();
        for course in courses {
            grid.place(course);
        }
        grid
    }

    fn place(&mut self, course: &Course) {
        let index = day_index(course.date);
        if index >= DAYS_IN_GRID {
            debug!("course {} falls on a Sunday, left out of the grid", course.id);
            return;
        }

        let row = match HalfDay::of(course.start_time) {
            HalfDay::Morning => &mut self.morning,
            HalfDay::Afternoon => &mut self.afternoon,
        };
        // Same half-day: the later course wins.
        if let Slot::Course(previous) = &row[index] {
            debug!(
                "course {} replaces course {} in slot {}",
                course.id, previous.id, index
            );
        }
        row[index] = Slot::Course(CourseSummary::from(course));
    }

    pub fn slot(&self, day: usize, half: HalfDay) -> Option<&Slot> {
        match half {
            HalfDay::Morning => self.morning.get(day),
            HalfDay::Afternoon => self.afternoon.get(day),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.morning.iter().chain(self.afternoon.iter()).all(Slot::is_empty)
    }

    pub fn occupied(&self) -> usize {
        self.morning
            .iter()
            .chain(self.afternoon.iter())
            .filter(|s| !s.is_empty())
            .count()
    }
}
