use std::fmt;

/// Result of a bucket creation call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketCreation {
    Created,
    AlreadyOwned,
}

/// Status of an import task as reported by the provider.
///
/// Anything the provider reports that is not one of the three terminal
/// statuses is kept verbatim in `Pending` so it can still be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending(String),
    Completed,
    Deleted,
    Cancelled,
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "completed" => TaskStatus::Completed,
            "deleted" => TaskStatus::Deleted,
            "cancelled" => TaskStatus::Cancelled,
            other => TaskStatus::Pending(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending(raw) => raw,
            TaskStatus::Completed => "completed",
            TaskStatus::Deleted => "deleted",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to submit a single-disk image import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    bucket: String,
    key: String,
    description: String,
    role_name: String,
}

impl ImportRequest {
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        description: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            description: description.into(),
            role_name: role_name.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }
}

/// Snapshot of an import task taken from a single status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTask {
    task_id: String,
    status: TaskStatus,
    status_message: Option<String>,
    progress: Option<String>,
    image_id: Option<String>,
}

impl ImportTask {
    pub fn new(task_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            status_message: None,
            progress: None,
            image_id: None,
        }
    }

    pub fn with_status_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }

    pub fn with_progress(mut self, progress: impl Into<String>) -> Self {
        self.progress = Some(progress.into());
        self
    }

    pub fn with_image_id(mut self, image_id: impl Into<String>) -> Self {
        self.image_id = Some(image_id.into());
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub fn image_id(&self) -> Option<&str> {
        self.image_id.as_deref()
    }
}
