//! Tests of the calendar controller, using in-memory task sources

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use task_calendar::app::FetchEvent;
use task_calendar::calendar::MonthYear;
use task_calendar::memory_source::MemorySource;
use task_calendar::mock_behaviour::MockBehaviour;
use task_calendar::traits::TaskSource;
use task_calendar::view::CalendarView;
use task_calendar::{App, NewTask, Task, TaskId};


fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
}

fn fill_form<S: TaskSource + 'static>(app: &mut App<S>, day: u32, title: &str) {
    let view = app.view_mut();
    view.select_day(day);
    view.draft_mut().title = title.to_string();
    view.draft_mut().description = format!("about {}", title);
}


#[tokio::test]
async fn test_refresh_fetches_every_task() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = MemorySource::new();
    source.insert(NewTask::new("Dentist".to_string(), String::new(), may(7))).unwrap();
    source.insert(NewTask::new("Gym".to_string(), String::new(), may(7))).unwrap();
    source.insert(NewTask::new("Taxes".to_string(), String::new(), may(31))).unwrap();

    let mut app = App::new(source, CalendarView::default());
    app.refresh();
    assert!(app.is_busy());
    app.settle().await;
    assert_eq!(app.is_busy(), false);

    assert_eq!(app.view().tasks().len(), 3);
    assert_eq!(app.view().tasks_for_day(7).len(), 2);
    assert_eq!(app.view().tasks_for_day(31).len(), 1);
    assert!(app.view().tasks_for_day(1).is_empty());
}

#[tokio::test]
async fn test_created_task_is_in_the_next_fetch() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = MemorySource::new();
    let mut app = App::new(source.clone(), CalendarView::default());

    fill_form(&mut app, 21, "Birthday");
    assert!(app.submit());

    match app.next_event().await {
        Some(FetchEvent::TaskCreated(task)) => {
            assert_eq!(task.title(), "Birthday");
            app.handle_event(FetchEvent::TaskCreated(task));
        },
        other => panic!("Unexpected event {:?}", other),
    }
    // Creating the task has started a refresh
    assert!(app.is_busy());
    app.settle().await;

    let shown = app.view().tasks_for_day(21);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].description(), "about Birthday");
    assert_eq!(shown[0].due_date(), Some(may(21)));
    assert_eq!(app.view().draft().title, "");
    assert_eq!(app.view().selected_day(), Some(21));
    assert_eq!(source.len(), 1);
}

#[tokio::test]
async fn test_failed_creation_changes_nothing() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock_behaviour = Arc::new(Mutex::new(MockBehaviour {
        add_task_behaviour: (0, 1),
        ..MockBehaviour::default()
    }));
    let source = MemorySource::with_mock_behaviour(mock_behaviour);
    let mut app = App::new(source.clone(), CalendarView::default());

    fill_form(&mut app, 3, "Lost task");
    assert!(app.submit());
    app.settle().await;

    assert!(source.is_empty());
    assert!(app.view().tasks().is_empty());
    // The form is left as it was, so that the user can try again
    assert_eq!(app.view().draft().title, "Lost task");
    assert_eq!(app.view().selected_day(), Some(3));

    // Nothing is retried on its own, but trying again works
    assert!(app.submit());
    app.settle().await;
    assert_eq!(app.view().tasks_for_day(3).len(), 1);
}

#[tokio::test]
async fn test_failed_fetch_keeps_the_previous_tasks() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock_behaviour = Arc::new(Mutex::new(MockBehaviour::new()));
    let source = MemorySource::with_mock_behaviour(Arc::clone(&mock_behaviour));
    source.insert(NewTask::new("Dentist".to_string(), String::new(), may(7))).unwrap();

    let mut app = App::new(source.clone(), CalendarView::default());
    app.refresh();
    app.settle().await;
    assert_eq!(app.view().tasks().len(), 1);

    source.insert(NewTask::new("Gym".to_string(), String::new(), may(8))).unwrap();
    *mock_behaviour.lock().unwrap() = MockBehaviour::fail_now(1);
    app.refresh();
    app.settle().await;
    assert_eq!(app.view().tasks().len(), 1);

    app.refresh();
    app.settle().await;
    assert_eq!(app.view().tasks().len(), 2);
}

#[tokio::test]
async fn test_submit_without_a_day() {
    let mut app = App::new(MemorySource::new(), CalendarView::default());
    app.view_mut().draft_mut().title = "Nowhere".to_string();

    assert_eq!(app.submit(), false);
    assert_eq!(app.is_busy(), false);
    assert_eq!(app.drain_events(), 0);
}

#[tokio::test]
async fn test_month_navigation_keeps_the_tasks() {
    let source = MemorySource::new();
    source.insert(NewTask::new("Dentist".to_string(), String::new(), may(7))).unwrap();

    let mut app = App::new(source, CalendarView::new(MonthYear::new(12, 2024).unwrap()));
    app.refresh();
    app.settle().await;

    // Only the day of the month is compared: the task is shown on every 7th
    assert_eq!(app.view().tasks_for_day(7).len(), 1);
    app.view_mut().next_month();
    assert_eq!(app.view().period(), MonthYear::new(1, 2025).unwrap());
    assert_eq!(app.view().tasks_for_day(7).len(), 1);
}

#[tokio::test]
async fn test_seeding_while_the_failures_are_suspended() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock_behaviour = Arc::new(Mutex::new(MockBehaviour::fail_now(1)));
    let source = MemorySource::with_mock_behaviour(Arc::clone(&mock_behaviour));
    let mut app = App::new(source.clone(), CalendarView::default());

    // Set up the test through the App, without consuming the scripted failures
    mock_behaviour.lock().unwrap().suspend();
    fill_form(&mut app, 12, "Seeded");
    assert!(app.submit());
    app.settle().await;
    assert_eq!(app.view().tasks_for_day(12).len(), 1);
    mock_behaviour.lock().unwrap().resume();

    fill_form(&mut app, 13, "Rejected");
    assert!(app.submit());
    app.settle().await;
    assert_eq!(source.len(), 1);
    assert_eq!(app.view().draft().title, "Rejected");

    // The list fetch fails once as well, and the previous list is kept
    app.refresh();
    app.settle().await;
    assert_eq!(app.view().tasks().len(), 1);
}


/// A source whose calls panic
struct PanickingSource;

#[async_trait]
impl TaskSource for PanickingSource {
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>> {
        panic!("get_tasks exploded")
    }

    async fn add_task(&self, _new_task: NewTask) -> Result<Task, Box<dyn Error + Send + Sync>> {
        panic!("add_task exploded")
    }
}

#[tokio::test]
async fn test_panicking_calls_are_reported_as_failures() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut app = App::new(PanickingSource, CalendarView::default());
    app.refresh();
    match app.next_event().await {
        Some(event @ FetchEvent::FetchFailed{ .. }) => app.handle_event(event),
        other => panic!("Unexpected event {:?}", other),
    }

    fill_form(&mut app, 5, "Doomed");
    assert!(app.submit());
    app.settle().await;

    assert_eq!(app.is_busy(), false);
    assert!(app.view().tasks().is_empty());
    assert_eq!(app.view().draft().title, "Doomed");
}


/// A source whose first list request only answers once it is released
struct GatedSource {
    calls: AtomicUsize,
    gate: Notify,
}

#[async_trait]
impl TaskSource for GatedSource {
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            self.gate.notified().await;
            return Ok(vec![Task::new(TaskId::from(1), "old".to_string(), String::new(), "2025-05-01".to_string(), false)]);
        }
        Ok(vec![Task::new(TaskId::from(2), "new".to_string(), String::new(), "2025-05-01".to_string(), false)])
    }

    async fn add_task(&self, _new_task: NewTask) -> Result<Task, Box<dyn Error + Send + Sync>> {
        Err("read-only".into())
    }
}

#[tokio::test]
async fn test_stale_list_does_not_overwrite_a_newer_one() {
    let _ = env_logger::builder().is_test(true).try_init();

    let source = GatedSource { calls: AtomicUsize::new(0), gate: Notify::new() };
    let mut app = App::new(source, CalendarView::default());

    app.refresh();
    // Make sure the first request is the one that is stuck
    while app.source().calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    app.refresh();

    let newer = app.next_event().await.unwrap();
    app.handle_event(newer);
    assert_eq!(app.view().tasks()[0].title(), "new");

    app.source().gate.notify_one();
    let older = app.next_event().await.unwrap();
    match &older {
        FetchEvent::TasksFetched{ sequence, .. } => assert_eq!(*sequence, 0),
        other => panic!("Unexpected event {:?}", other),
    }
    app.handle_event(older);

    assert_eq!(app.view().tasks().len(), 1);
    assert_eq!(app.view().tasks()[0].title(), "new");
    assert_eq!(app.is_busy(), false);
}
