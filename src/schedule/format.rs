use chrono::{Datelike, NaiveDate, NaiveTime};

const WEEKDAYS_SHORT: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];
const WEEKDAYS_LONG: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];
const MONTHS: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// `08:30` -> `08h30`
pub fn format_hour(time: NaiveTime) -> String {
    time.format("%Hh%M").to_string()
}

/// Short label for a grid column, Monday = 0.
pub fn weekday_label(day_index: usize) -> Option<&'static str> {
    WEEKDAYS_SHORT.get(day_index).copied()
}

/// `Lundi 6 Janvier 2025`
pub fn long_date_fr(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_LONG[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{} {} {} {}", weekday, date.day(), month, date.year())
}
