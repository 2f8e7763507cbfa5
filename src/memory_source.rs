//! An in-memory task source, that behaves like the `/tasks` service without any network access

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::mock_behaviour::MockBehaviour;
use crate::traits::TaskSource;
use crate::{NewTask, Task, TaskId};


#[derive(Debug, Default)]
struct Storage {
    tasks: Vec<Task>,
    last_id: u64,
}

/// A task source that keeps its tasks in memory.
///
/// IDs are assigned in increasing order, starting at 1, like a database would do.
/// Clones share the same storage, so that a test can keep a handle on a source given to an [`App`](crate::App).
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    storage: Arc<Mutex<Storage>>,
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source whose calls may fail as the given behaviour says
    pub fn with_mock_behaviour(mock_behaviour: Arc<Mutex<MockBehaviour>>) -> Self {
        Self {
            storage: Arc::default(),
            mock_behaviour: Some(mock_behaviour),
        }
    }

    /// Store a task right away, bypassing the mock behaviour
    pub fn insert(&self, new_task: NewTask) -> Result<Task, Box<dyn Error + Send + Sync>> {
        let mut storage = self.storage.lock()
            .map_err(|_| "Memory source storage is poisoned")?;
        storage.last_id += 1;
        let task = new_task.into_task(TaskId::from(storage.last_id));
        storage.tasks.push(task.clone());
        Ok(task)
    }

    /// The number of stored tasks
    pub fn len(&self) -> usize {
        self.storage.lock()
            .map(|storage| storage.tasks.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, f: fn(&mut MockBehaviour) -> Result<(), Box<dyn Error + Send + Sync>>) -> Result<(), Box<dyn Error + Send + Sync>> {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(mb) => {
                let mut mb = mb.lock().map_err(|_| "Mock behaviour is poisoned")?;
                f(&mut *mb)
            },
        }
    }
}

#[async_trait]
impl TaskSource for MemorySource {
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>> {
        self.check(MockBehaviour::can_get_tasks)?;
        let storage = self.storage.lock()
            .map_err(|_| "Memory source storage is poisoned")?;
        Ok(storage.tasks.clone())
    }

    async fn add_task(&self, new_task: NewTask) -> Result<Task, Box<dyn Error + Send + Sync>> {
        self.check(MockBehaviour::can_add_task)?;
        self.insert(new_task)
    }
}
