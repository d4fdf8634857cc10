use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Course;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSection {
    pub date: NaiveDate,
    pub courses: Vec<Course>,
}

/// Splits courses into one section per date. Sections follow the order in
/// which each date is first seen; no chronological sort happens here.
pub fn group_by_date(courses: &[Course]) -> Vec<DateSection> {
    let mut sections: Vec<DateSection> = Vec::new();

    for course in courses {
        match sections.iter_mut().find(|s| s.date == course.date) {
            Some(section) => section.courses.push(course.clone()),
            None => sections.push(DateSection {
                date: course.date,
                courses: vec![course.clone()],
            }),
        }
    }

    sections
}
