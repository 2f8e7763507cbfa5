//! Results of the background network calls, sent back to the UI loop

use std::fmt::{Display, Error, Formatter};

use crate::Task;

/// Something that happened in a background network call
#[derive(Clone, Debug)]
pub enum FetchEvent {
    /// The task list has been fetched. `sequence` tells which fetch this is the answer to
    TasksFetched{ sequence: u64, tasks: Vec<Task> },
    /// Fetching the task list failed
    FetchFailed{ sequence: u64, error: String },
    /// The server has accepted a new task
    TaskCreated(Task),
    /// Creating a task failed
    CreateFailed{ error: String },
}

impl Display for FetchEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            FetchEvent::TasksFetched{sequence, tasks} => write!(f, "[fetch #{}] {} tasks received", sequence, tasks.len()),
            FetchEvent::FetchFailed{sequence, error} => write!(f, "[fetch #{}] failed: {}", sequence, error),
            FetchEvent::TaskCreated(task) => write!(f, "Task {} created", task.id()),
            FetchEvent::CreateFailed{error} => write!(f, "Unable to create task: {}", error),
        }
    }
}



/// See [`event_channel`]
pub type EventSender = tokio::sync::mpsc::UnboundedSender<FetchEvent>;
/// See [`event_channel`]
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<FetchEvent>;

/// Create the channel background calls report to
pub fn event_channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
