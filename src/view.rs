//! The state of the calendar view: the displayed month, the fetched tasks, the selected day and the task form

use std::error::Error;

use crate::calendar::{self, DayMatch, MonthGrid, MonthYear};
use crate::{NewTask, Task};


/// The content of the task creation form
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }
}


/// Everything the calendar displays.
///
/// The task list is a local copy of what the server last returned. It is replaced as a whole on every fetch.
#[derive(Clone, Debug)]
pub struct CalendarView {
    period: MonthYear,
    tasks: Vec<Task>,
    /// The sequence number of the fetch that produced `tasks`
    tasks_sequence: Option<u64>,
    selected_day: Option<u32>,
    draft: TaskDraft,
    day_match: DayMatch,
}

impl Default for CalendarView {
    fn default() -> Self {
        Self::new(MonthYear::default())
    }
}

impl CalendarView {
    pub fn new(period: MonthYear) -> Self {
        Self {
            period,
            tasks: Vec::new(),
            tasks_sequence: None,
            selected_day: None,
            draft: TaskDraft::default(),
            day_match: DayMatch::default(),
        }
    }

    pub fn period(&self) -> MonthYear         { self.period       }
    pub fn tasks(&self) -> &[Task]            { &self.tasks       }
    pub fn selected_day(&self) -> Option<u32> { self.selected_day }
    pub fn draft(&self) -> &TaskDraft         { &self.draft       }
    pub fn draft_mut(&mut self) -> &mut TaskDraft { &mut self.draft }
    pub fn day_match(&self) -> DayMatch       { self.day_match    }

    pub fn set_day_match(&mut self, mode: DayMatch) {
        self.day_match = mode;
    }

    /// Whether the task creation form is open
    pub fn is_form_open(&self) -> bool {
        self.selected_day.is_some()
    }

    pub fn grid(&self) -> MonthGrid {
        MonthGrid::new(self.period)
    }

    /// The tasks that are displayed under a given day of the current month
    pub fn tasks_for_day(&self, day: u32) -> Vec<&Task> {
        calendar::tasks_for_day(&self.tasks, self.period, day, self.day_match)
    }

    /// Move by `increment` months. The selection is kept only if this day also exists in the new month
    /// Nothing changes when the new month would be out of the supported date range
    pub fn change_month(&mut self, increment: i32) {
        self.period = match self.period.shifted(increment) {
            Some(period) => period,
            None => {
                log::warn!("Unable to move {} months from {}: out of the supported date range", increment, self.period);
                return;
            },
        };
        if let Some(day) = self.selected_day {
            if self.period.date(day).is_none() {
                log::debug!("Day {} does not exist in {}, closing the task form", day, self.period);
                self.selected_day = None;
            }
        }
    }

    pub fn next_month(&mut self) {
        self.change_month(1);
    }

    pub fn previous_month(&mut self) {
        self.change_month(-1);
    }

    /// Select a day of the current month, and open the task creation form for it
    pub fn select_day(&mut self, day: u32) {
        if self.period.date(day).is_none() {
            log::warn!("Ignoring the selection of day {}, that does not exist in {}", day, self.period);
            return;
        }
        self.selected_day = Some(day);
    }

    pub fn close_form(&mut self) {
        self.selected_day = None;
    }

    /// Build the task that the form describes
    pub fn new_task(&self) -> Result<NewTask, Box<dyn Error + Send + Sync>> {
        let day = self.selected_day.ok_or("No day is selected")?;
        let due_date = self.period.date(day)
            .ok_or_else(|| format!("Day {} does not exist in {}", day, self.period))?;

        Ok(NewTask::new(
            self.draft.title.clone(),
            self.draft.description.clone(),
            due_date,
        ))
    }

    /// To be called once the server has accepted the task of the form
    pub fn task_created(&mut self) {
        self.draft.clear();
    }

    /// Replace the task list with the result of a fetch.
    ///
    /// `sequence` tells when the fetch was started. Lists coming from a fetch older than the current one are discarded.
    /// Returns whether the list has been applied
    pub fn apply_tasks(&mut self, sequence: u64, tasks: Vec<Task>) -> bool {
        if let Some(current) = self.tasks_sequence {
            if sequence < current {
                log::debug!("Discarding a stale task list (fetch #{}, current is #{})", sequence, current);
                return false;
            }
        }

        for task in tasks.iter().filter(|t| t.due_date().is_none()) {
            log::warn!("Task {} has an invalid due date {:?}, it will not be displayed", task.id(), task.raw_due_date());
        }

        self.tasks = tasks;
        self.tasks_sequence = Some(sequence);
        true
    }
}
