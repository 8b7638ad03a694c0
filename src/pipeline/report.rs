use std::io::{self, Write};

use super::PipelineError;
use crate::cloud::{ImportTask, TaskStatus};

/// Print the operator-facing summary for a finished task.
pub fn write_summary(task: &ImportTask, out: &mut impl Write) -> io::Result<()> {
    match (task.status(), task.image_id()) {
        (TaskStatus::Completed, Some(image_id)) => {
            writeln!(out, "\n--- Conversion Complete ---")?;
            writeln!(out, "The OVA file has been successfully converted to an AMI.")?;
            writeln!(out, "Final AMI Location (ID): {image_id}")
        }
        _ => {
            writeln!(out, "\n--- Conversion Failed ---")?;
            writeln!(out, "The import task did not complete successfully.")?;
            writeln!(out, "Final Status: {}", task.status())?;
            writeln!(out, "Status Message: {}", task.status_message().unwrap_or("N/A"))
        }
    }
}

/// The resulting AMI id, or the failure for any other terminal outcome.
pub fn image_id(task: &ImportTask) -> Result<&str, PipelineError> {
    match task.status() {
        TaskStatus::Completed => task
            .image_id()
            .ok_or_else(|| PipelineError::MissingImageId(task.task_id().to_string())),
        status => Err(PipelineError::TaskFailed {
            task_id: task.task_id().to_string(),
            status: status.to_string(),
            message: task.status_message().unwrap_or("N/A").to_string(),
        }),
    }
}
