//! Task due-date classification

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Scheduling fields of a maintenance task, as returned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskSchedule {
    pub fecha_programada: Option<NaiveDateTime>,
    pub fecha_vencimiento: Option<NaiveDateTime>,
    pub realizada: bool,
    /// Overdue flag already set by the backend scheduler
    pub vencida: bool,
}

/// Display status of a task relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Completed,
    Overdue,
    DueInDays(u32),
    DueToday,
}

impl TaskStatus {
    /// Sort key for task lists: overdue first, then due today, then upcoming
    /// by days left, completed last.
    pub fn priority(self) -> (u8, u32) {
        match self {
            TaskStatus::Overdue => (0, 0),
            TaskStatus::DueToday => (1, 0),
            TaskStatus::DueInDays(days) => (2, days),
            TaskStatus::Completed => (3, 0),
        }
    }

    pub fn label(self) -> String {
        match self {
            TaskStatus::Completed => "Completada".to_string(),
            TaskStatus::Overdue => "Vencida".to_string(),
            TaskStatus::DueInDays(1) => "En 1 día".to_string(),
            TaskStatus::DueInDays(days) => format!("En {} días", days),
            TaskStatus::DueToday => "Hoy".to_string(),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Completed => write!(f, "COMPLETED"),
            TaskStatus::Overdue => write!(f, "OVERDUE"),
            TaskStatus::DueInDays(days) => write!(f, "DUE_IN_{}_DAYS", days),
            TaskStatus::DueToday => write!(f, "DUE_TODAY"),
        }
    }
}

impl TaskSchedule {
    /// Classify this task against `now`.
    ///
    /// The due date is `fecha_vencimiento`, falling back to `fecha_programada`.
    /// A task with no date at all is due today.
    pub fn status(&self, now: NaiveDateTime) -> TaskStatus {
        if self.realizada {
            return TaskStatus::Completed;
        }
        if self.vencida {
            return TaskStatus::Overdue;
        }

        let Some(due) = self.fecha_vencimiento.or(self.fecha_programada) else {
            return TaskStatus::DueToday;
        };
        if due < now {
            return TaskStatus::Overdue;
        }

        match days_until(now, due) {
            0 => TaskStatus::DueToday,
            days => TaskStatus::DueInDays(days),
        }
    }
}

/// `ceil((due - now) / 1 day)` for `due >= now`.
fn days_until(now: NaiveDateTime, due: NaiveDateTime) -> u32 {
    let seconds = (due - now).num_seconds().max(0);
    let days = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}
