//! This module provides a client to connect to the `/tasks` HTTP service

use std::error::Error;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::traits::TaskSource;
use crate::{NewTask, Task, TaskId};


/// A task source that fetches its data from a remote server
#[derive(Clone, Debug)]
pub struct Client {
    tasks_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for the server at `url` (e.g. `http://localhost:8080`). This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let base = Url::parse(url.as_ref())?;

        let mut tasks_url = base.clone();
        tasks_url.path_segments_mut()
            .map_err(|_| format!("{} cannot be used as a base URL", base))?
            .pop_if_empty()
            .push("tasks");

        Ok(Self {
            tasks_url,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client for the server set in the [`config`](crate::config)
    pub fn from_config() -> Result<Self, Box<dyn Error + Send + Sync>> {
        Self::new(crate::config::server_url())
    }

    /// The URL of the `/tasks` endpoint
    pub fn tasks_url(&self) -> &Url {
        &self.tasks_url
    }
}

#[async_trait]
impl TaskSource for Client {
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error + Send + Sync>> {
        let response = self.http
            .get(self.tasks_url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }

        let text = response.text().await?;
        let tasks: Vec<Task> = serde_json::from_str(&text)
            .map_err(|err| format!("Malformed task list from {}: {}", self.tasks_url, err))?;
        log::debug!("Fetched {} tasks from {}", tasks.len(), self.tasks_url);
        Ok(tasks)
    }

    async fn add_task(&self, new_task: NewTask) -> Result<Task, Box<dyn Error + Send + Sync>> {
        let body = serde_json::to_string(&new_task)?;

        let response = self.http
            .post(self.tasks_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }

        // The server is expected to echo the created task, but only the success status really matters
        let text = response.text().await?;
        match serde_json::from_str::<Task>(&text) {
            Ok(task) => {
                log::info!("Created task {} ({:?})", task.id(), task.title());
                Ok(task)
            },
            Err(err) => {
                log::warn!("Task created, but the server reply could not be read ({}). Using the sent values", err);
                Ok(new_task.into_task(TaskId::from(0)))
            },
        }
    }
}
