use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Success,
    Failure,
    Skipped,
}

impl TaskStatus {
    pub fn glyph(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "🍿",
            TaskStatus::Running => "🔥",
            TaskStatus::Success => "✅",
            TaskStatus::Failure => "❌",
            TaskStatus::Skipped => "",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Failure => write!(f, "failure"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// One row of a [`TaskBoard`](super::TaskBoard).
///
/// Duration accumulates over every start/stop cycle. Once skipped, a task
/// keeps the skipped status even if it is later run.
#[derive(Debug, Clone)]
pub struct WorkTask {
    name: String,
    description: String,
    status: TaskStatus,
    started_at: Option<DateTime<Local>>,
    running_since: Option<Instant>,
    total: Duration,
    stopped: bool,
    skipped: bool,
}

impl WorkTask {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            started_at: None,
            running_since: None,
            total: Duration::ZERO,
            stopped: false,
            skipped: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Time spent so far; `None` if the task never started.
    pub fn duration(&self) -> Option<Duration> {
        if self.started_at.is_none() {
            return None;
        }

        match (self.stopped, self.running_since) {
            (false, Some(since)) => Some(self.total + since.elapsed()),
            _ => Some(self.total),
        }
    }

    pub fn skip(&mut self) {
        self.skipped = true;
        self.status = TaskStatus::Skipped;
    }

    pub(crate) fn start(&mut self) {
        if !self.skipped {
            self.status = TaskStatus::Running;
        }
        self.started_at = Some(Local::now());
        self.running_since = Some(Instant::now());
        self.stopped = false;
    }

    pub(crate) fn stop(&mut self, success: bool) {
        if !self.skipped {
            self.status = if success {
                TaskStatus::Success
            } else {
                TaskStatus::Failure
            };
        }
        if let Some(since) = self.running_since.take() {
            self.total += since.elapsed();
        }
        self.stopped = true;
    }

    /// Cells for the Status, Started At, Duration (s) and Task columns.
    pub fn values(&self) -> [String; 4] {
        let started_at = self
            .started_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        let duration = self
            .duration()
            .map(|d| format!("{:>6.2}", d.as_secs_f64()))
            .unwrap_or_default();

        [
            self.status.glyph().to_string(),
            started_at,
            duration,
            self.description.clone(),
        ]
    }
}
