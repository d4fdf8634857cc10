use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schedule_client::api::{CourseApi, WeekQuery};
use schedule_client::schedule::{WeekGrid, format_hour, week_range, weekday_label};
use schedule_client::services::{FetchHandle, operation};
use schedule_client::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "schedule_client=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::from_env()?;
    let today = Local::now().date_naive();
    let range = week_range(today);
    let query = WeekQuery::for_role(range, state.session.role(), None);

    info!("fetching courses from {} to {}", range.start, range.end);
    let api: Arc<dyn CourseApi> = state.api.clone();
    let week = FetchHandle::mount(operation(move || {
        let api = api.clone();
        let query = query.clone();
        async move { api.list_week_courses(&query).await }
    }))
    .await;

    let fetched = week.state();
    if let Some(error) = fetched.error {
        warn!("could not load the week: {}", error);
    }

    let grid = WeekGrid::build(today, &fetched.data.unwrap_or_default());
    for day in 0..grid.morning.len() {
        let label = weekday_label(day).unwrap_or("?");
        for (half, slot) in [("matin", &grid.morning[day]), ("apres-midi", &grid.afternoon[day])] {
            match slot.course() {
                Some(course) => info!(
                    "{} {}: {} {}-{} salle {}",
                    label,
                    half,
                    course.subject,
                    format_hour(course.start_time),
                    format_hour(course.end_time),
                    course.room
                ),
                None => info!("{} {}: -", label, half),
            }
        }
    }

    match state.api.list_pending_courses().await {
        Ok(pending) => info!("{} courses awaiting validation", pending.len()),
        Err(e) => warn!("pending courses unavailable: {}", e),
    }

    Ok(())
}
