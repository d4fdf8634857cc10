mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{FakeCourseApi, course, date, page};
use schedule_client::api::{CourseApi, CoursesQuery};
use schedule_client::services::{CoursePager, FetchHandle, operation};
use tokio::sync::Notify;

fn three_pages() -> Vec<schedule_client::models::Paginated<schedule_client::models::Course>> {
    vec![
        page(
            vec![course(1, "2025-01-06", "08:00"), course(2, "2025-01-06", "15:00")],
            1,
            3,
            5,
        ),
        page(
            vec![course(3, "2025-01-07", "08:00"), course(4, "2025-01-08", "08:00")],
            2,
            3,
            5,
        ),
        page(vec![course(5, "2025-01-08", "15:00")], 3, 3, 5),
    ]
}

fn ids(pager: &CoursePager) -> Vec<u64> {
    pager.courses().iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn test_load_more_appends_pages() {
    let pages = three_pages();
    let fake = Arc::new(FakeCourseApi::with_pages(pages.clone()));
    let pager = CoursePager::new(fake.clone(), CoursesQuery::default(), &pages[0]);

    assert!(pager.load_more().await);
    assert_eq!(ids(&pager), vec![1, 2, 3, 4]);
    assert_eq!(pager.state().current_page, 2);

    assert!(pager.load_more().await);
    assert_eq!(ids(&pager), vec![1, 2, 3, 4, 5]);
    assert!(!pager.has_more());
    assert!(!pager.state().loading_more);
}

#[tokio::test]
async fn test_load_more_on_last_page_is_a_noop() {
    let last = page(vec![course(1, "2025-01-06", "08:00")], 1, 1, 1);
    let fake = Arc::new(FakeCourseApi::with_pages(vec![last.clone()]));
    let pager = CoursePager::new(fake.clone(), CoursesQuery::default(), &last);

    assert!(!pager.load_more().await);

    assert_eq!(ids(&pager), vec![1]);
    assert_eq!(fake.course_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_load_more_reuses_filters_with_fixed_page_size() {
    let pages = three_pages();
    let fake = Arc::new(FakeCourseApi::with_pages(pages.clone()));
    let query = CoursesQuery {
        per_page: 20,
        ..CoursesQuery::starting(date("2025-01-06"))
    };
    let pager = CoursePager::new(fake.clone(), query, &pages[0]);

    pager.load_more().await;

    let sent = fake.queries.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].page, 2);
    assert_eq!(sent[0].per_page, 5);
    assert_eq!(sent[0].start_date, Some(date("2025-01-06")));
}

#[tokio::test]
async fn test_load_more_failure_is_swallowed() {
    let pages = three_pages();
    let fake = Arc::new(FakeCourseApi::with_pages(pages.clone()));
    fake.fail_courses.store(true, Ordering::SeqCst);
    let pager = CoursePager::new(fake.clone(), CoursesQuery::default(), &pages[0]);

    assert!(!pager.load_more().await);

    let state = pager.state();
    assert_eq!(ids(&pager), vec![1, 2]);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.last_page, 3);
    assert!(!state.loading_more);
}

#[tokio::test]
async fn test_load_more_while_in_flight_is_ignored() {
    let pages = three_pages();
    let gate = Arc::new(Notify::new());
    let fake = Arc::new(FakeCourseApi {
        gate: Some(gate.clone()),
        ..FakeCourseApi::with_pages(pages.clone())
    });
    let pager = Arc::new(CoursePager::new(
        fake.clone(),
        CoursesQuery::default(),
        &pages[0],
    ));

    let first = tokio::spawn({
        let pager = pager.clone();
        async move { pager.load_more().await }
    });
    let mut rx = pager.subscribe();
    rx.wait_for(|s| s.loading_more).await.expect("pager alive");

    assert!(!pager.load_more().await);
    gate.notify_one();
    assert!(first.await.expect("load task"));

    assert_eq!(fake.course_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ids(&pager), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_sync_during_load_more_discards_stale_page() {
    let pages = three_pages();
    let gate = Arc::new(Notify::new());
    let fake = Arc::new(FakeCourseApi {
        gate: Some(gate.clone()),
        ..FakeCourseApi::with_pages(pages.clone())
    });
    let pager = Arc::new(CoursePager::new(
        fake.clone(),
        CoursesQuery::default(),
        &pages[0],
    ));
    gate.notify_one();
    assert!(pager.load_more().await);
    assert_eq!(ids(&pager), vec![1, 2, 3, 4]);

    let stale = tokio::spawn({
        let pager = pager.clone();
        async move { pager.load_more().await }
    });
    let mut rx = pager.subscribe();
    rx.wait_for(|s| s.loading_more).await.expect("pager alive");

    pager.sync(&pages[0]);
    gate.notify_one();
    assert!(!stale.await.expect("load task"));

    let state = pager.state();
    assert_eq!(ids(&pager), vec![1, 2]);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.last_page, 3);
    assert!(!state.loading_more);

    gate.notify_one();
    assert!(pager.load_more().await);
    assert_eq!(ids(&pager), vec![1, 2, 3, 4]);
    assert_eq!(
        fake.queries.lock().unwrap().iter().map(|q| q.page).collect::<Vec<_>>(),
        vec![2, 3, 2]
    );
}

#[tokio::test]
async fn test_sync_replaces_accumulated_courses() {
    let pages = three_pages();
    let fake = Arc::new(FakeCourseApi::with_pages(pages.clone()));
    let pager = CoursePager::new(fake.clone(), CoursesQuery::default(), &pages[0]);
    pager.load_more().await;

    pager.sync(&page(vec![course(9, "2025-01-10", "08:00")], 1, 2, 6));

    let state = pager.state();
    assert_eq!(ids(&pager), vec![9]);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.last_page, 2);
}

#[tokio::test]
async fn test_refresh_goes_through_source() {
    let pages = three_pages();
    let fake = Arc::new(FakeCourseApi::with_pages(pages.clone()));
    let api: Arc<dyn CourseApi> = fake.clone();
    let source_api = api.clone();
    let source = FetchHandle::mount(operation(move || {
        let api = source_api.clone();
        async move { api.list_courses(&CoursesQuery::default()).await }
    }))
    .await;
    let first = source.data().expect("first page");
    let pager = CoursePager::new(api, CoursesQuery::default(), &first);
    pager.load_more().await;
    assert_eq!(ids(&pager), vec![1, 2, 3, 4]);

    fake.pages
        .lock()
        .unwrap()
        .insert(1, page(vec![course(8, "2025-01-06", "08:00")], 1, 1, 1));
    pager.refresh(&source).await;

    assert_eq!(ids(&pager), vec![8]);
    assert!(!pager.has_more());
}

#[tokio::test]
async fn test_sections_group_accumulated_courses() {
    let pages = three_pages();
    let fake = Arc::new(FakeCourseApi::with_pages(pages.clone()));
    let pager = CoursePager::new(fake, CoursesQuery::default(), &pages[0]);
    pager.load_more().await;

    let sections = pager.sections();

    assert_eq!(
        sections.iter().map(|s| s.date).collect::<Vec<_>>(),
        vec![date("2025-01-06"), date("2025-01-07"), date("2025-01-08")]
    );
}
