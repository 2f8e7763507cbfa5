//! To-do tasks, as served by the `/tasks` endpoint

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{DateTime, NaiveDate};


/// The identifier the server gave to a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    content: u64,
}

impl TaskId {
    pub fn as_u64(&self) -> u64 {
        self.content
    }
}
impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self { content: id }
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        Ok(TaskId{ content: id })
    }
}



/// A to-do task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    /// The due date, as it was sent by the server.
    /// Use [`Task::due_date`] to get an actual date
    due_date: String,
    #[serde(default)]
    completed: bool,
}

impl Task {
    pub fn new(id: TaskId, title: String, description: String, due_date: String, completed: bool) -> Self {
        Self { id, title, description, due_date, completed }
    }

    pub fn id(&self) -> TaskId           { self.id           }
    pub fn title(&self) -> &str          { &self.title       }
    pub fn description(&self) -> &str    { &self.description }
    pub fn raw_due_date(&self) -> &str   { &self.due_date    }
    pub fn completed(&self) -> bool      { self.completed    }

    /// The due date of this task, or `None` in case the server sent something that is not a date
    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_due_date(&self.due_date)
    }

    /// A human-readable completion status
    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Pending" }
    }
}



/// A task that is about to be created on the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(with = "iso_date")]
    pub due_date: NaiveDate,
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: String, description: String, due_date: NaiveDate) -> Self {
        Self { title, description, due_date, completed: false }
    }

    /// Turn this into a `Task`, once the server has given it an ID
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: format_due_date(&self.due_date),
            completed: self.completed,
        }
    }
}


/// Format a date the way it is sent to the server (zero-padded `YYYY-MM-DD`)
pub fn format_due_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a due date.
///
/// This accepts `YYYY-MM-DD`, its unpadded variant (`2025-5-7`) and RFC3339 timestamps, whose time part is ignored.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    // Unpadded dates, e.g. `2025-5-7`
    let mut parts = raw.splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_due_date(date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_due_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid due date {:?}", raw)))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_due_dates() {
        let may_7 = NaiveDate::from_ymd_opt(2025, 5, 7);
        assert_eq!(parse_due_date("2025-05-07"), may_7);
        assert_eq!(parse_due_date("2025-5-7"), may_7);
        assert_eq!(parse_due_date("2025-05-07T00:00:00Z"), may_7);
        assert_eq!(parse_due_date(" 2025-05-07 "), may_7);

        assert_eq!(parse_due_date("2025-02-30"), None);
        assert_eq!(parse_due_date("tomorrow"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn test_task_from_server_json() {
        let json = r#"[
            {"id": 3, "title": "Water plants", "description": "balcony", "due_date": "2025-5-12", "completed": true},
            {"id": 4, "title": "No description", "due_date": "2025-05-13"}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id(), TaskId::from(3));
        assert_eq!(tasks[0].due_date(), NaiveDate::from_ymd_opt(2025, 5, 12));
        assert_eq!(tasks[0].status_label(), "Completed");
        assert_eq!(tasks[1].description(), "");
        assert_eq!(tasks[1].status_label(), "Pending");
    }

    #[test]
    fn test_new_task_body() {
        let new_task = NewTask::new(
            "Pay rent".to_string(),
            "before noon".to_string(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );

        let body = serde_json::to_value(&new_task).unwrap();
        assert_eq!(body, serde_json::json!({
            "title": "Pay rent",
            "description": "before noon",
            "due_date": "2025-06-01",
            "completed": false,
        }));

        let task = new_task.into_task(TaskId::from(12));
        assert_eq!(task.raw_due_date(), "2025-06-01");
        assert_eq!(task.completed(), false);
    }
}
