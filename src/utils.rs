//! Some utility functions

use std::fmt::Write;

use crate::calendar::Cell;
use crate::view::CalendarView;
use crate::Task;

/// Render a month and its tasks as plain text
pub fn render_month(view: &CalendarView) -> String {
    let mut out = String::new();
    let grid = view.grid();

    // Writing into a String cannot fail
    let _ = writeln!(out, "Calendar for {}", view.period());
    let _ = writeln!(out, " Sun Mon Tue Wed Thu Fri Sat");
    for week in grid.weeks() {
        for cell in week {
            match cell {
                Cell::Blank => out.push_str("    "),
                Cell::Day(day) => {
                    let marker = if view.tasks_for_day(*day).is_empty() { ' ' } else { '*' };
                    let _ = write!(out, " {:>2}{}", day, marker);
                },
            }
        }
        // Blank trailing cells leave spaces at the end of the line
        let trimmed_len = out.trim_end_matches(' ').len();
        out.truncate(trimmed_len);
        out.push('\n');
    }

    let days_with_tasks = grid.cells().iter()
        .filter_map(|cell| cell.day())
        .map(|day| (day, view.tasks_for_day(day)))
        .filter(|(_, tasks)| tasks.is_empty() == false)
        .collect::<Vec<_>>();

    if days_with_tasks.is_empty() == false {
        out.push('\n');
        for (day, tasks) in days_with_tasks {
            for task in tasks {
                let _ = writeln!(out, "{}", format_task(day, task));
            }
        }
    }
    out
}

fn format_task(day: u32, task: &Task) -> String {
    let completion = if task.completed() { "✓" } else { " " };
    format!("  {:>2} [{}] {}\t{}", day, completion, task.title(), task.status_label())
}

/// A debug utility that pretty-prints a month
pub fn print_month(view: &CalendarView) {
    print!("{}", render_month(view));
}
