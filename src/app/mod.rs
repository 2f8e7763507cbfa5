//! This module drives a [`CalendarView`] from a [`TaskSource`]
//!
//! Network calls never block the caller: they run in tokio tasks, whose results are sent back as [`FetchEvent`]s.
//! The owner of the `App` (usually the UI loop) applies them with [`App::handle_event`].

use std::sync::Arc;

use crate::traits::TaskSource;
use crate::view::CalendarView;

pub mod fetch_event;
pub use fetch_event::FetchEvent;
use fetch_event::{EventReceiver, EventSender};


/// A calendar view, connected to a source of tasks.
///
/// Errors from the source are logged (using the `log::*` macros) and never shown otherwise. Nothing is retried.
pub struct App<S>
where
    S: TaskSource + 'static,
{
    source: Arc<S>,
    view: CalendarView,

    sender: EventSender,
    receiver: EventReceiver,
    /// The sequence number of the next task list fetch
    next_sequence: u64,
    /// How many background calls have not reported back yet
    pending: usize,
}

impl<S> App<S>
where
    S: TaskSource + 'static,
{
    pub fn new(source: S, view: CalendarView) -> Self {
        let (sender, receiver) = fetch_event::event_channel();
        Self {
            source: Arc::new(source),
            view,
            sender, receiver,
            next_sequence: 0,
            pending: 0,
        }
    }

    pub fn view(&self) -> &CalendarView { &self.view }
    pub fn view_mut(&mut self) -> &mut CalendarView { &mut self.view }
    pub fn source(&self) -> &S { &self.source }

    /// Whether some network calls are still running
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    /// Fetch the task list in the background
    ///
    /// This must be called from within a tokio runtime
    pub fn refresh(&mut self) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pending += 1;

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        log::debug!("Starting fetch #{}", sequence);
        let call = tokio::spawn(async move { source.get_tasks().await });
        tokio::spawn(async move {
            let event = match call.await {
                Ok(Ok(tasks)) => FetchEvent::TasksFetched{ sequence, tasks },
                Ok(Err(err)) => FetchEvent::FetchFailed{ sequence, error: err.to_string() },
                Err(join_err) => FetchEvent::FetchFailed{ sequence, error: join_err.to_string() },
            };
            // The receiver is gone only when the App is dropped, nobody cares about the result then
            let _ = sender.send(event);
        });
    }

    /// Send the task of the form to the source, in the background.
    /// The task list is refreshed once the task has been created.
    ///
    /// Returns `false` (and does nothing) in case the form is not valid, e.g. when no day is selected.
    /// This must be called from within a tokio runtime
    pub fn submit(&mut self) -> bool {
        let new_task = match self.view.new_task() {
            Err(err) => {
                log::warn!("Not submitting the task: {}", err);
                return false;
            },
            Ok(t) => t,
        };
        self.pending += 1;

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        log::debug!("Creating task {:?} due on {}", new_task.title, new_task.due_date);
        let call = tokio::spawn(async move { source.add_task(new_task).await });
        tokio::spawn(async move {
            let event = match call.await {
                Ok(Ok(task)) => FetchEvent::TaskCreated(task),
                Ok(Err(err)) => FetchEvent::CreateFailed{ error: err.to_string() },
                Err(join_err) => FetchEvent::CreateFailed{ error: join_err.to_string() },
            };
            let _ = sender.send(event);
        });
        true
    }

    /// Apply the result of a background call
    pub fn handle_event(&mut self, event: FetchEvent) {
        self.pending = self.pending.saturating_sub(1);

        match event {
            FetchEvent::TasksFetched{ sequence, tasks } => {
                log::debug!("[fetch #{}] {} tasks received", sequence, tasks.len());
                self.view.apply_tasks(sequence, tasks);
            },
            FetchEvent::TaskCreated(task) => {
                log::info!("Task {} ({:?}) created", task.id(), task.title());
                self.view.task_created();
                self.refresh();
            },
            failure => {
                log::error!("{}", failure);
            },
        }
    }

    /// Returns a result that is already available, if any
    pub fn try_next_event(&mut self) -> Option<FetchEvent> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next result of a background call
    pub async fn next_event(&mut self) -> Option<FetchEvent> {
        self.receiver.recv().await
    }

    /// Apply every result that is already available. Returns how many were applied
    pub fn drain_events(&mut self) -> usize {
        let mut n_events = 0;
        while let Some(event) = self.try_next_event() {
            self.handle_event(event);
            n_events += 1;
        }
        n_events
    }

    /// Wait until every background call has reported back, and apply their results.
    ///
    /// A call that panics still reports back, as a failure
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.receiver.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
    }
}
