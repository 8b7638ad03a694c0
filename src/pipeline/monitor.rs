use tracing::info;

use super::{Pipeline, PipelineError};
use crate::cloud::{AccessControl, ImageImport, ImportTask, ObjectStorage};

impl<S, A, I> Pipeline<'_, S, A, I>
where
    S: ObjectStorage,
    A: AccessControl,
    I: ImageImport,
{
    /// Poll the import task every poll interval until it reaches a terminal
    /// status. There is no iteration limit; a failed query ends the run.
    pub(crate) async fn monitor(&self, task_id: &str) -> Result<ImportTask, PipelineError> {
        let interval = self.settings.poll_interval();
        info!(task_id, interval_secs = interval.as_secs(), "monitoring import task status");

        loop {
            let task = self
                .images
                .describe_import(task_id)
                .await
                .map_err(|source| PipelineError::Monitor {
                    task_id: task_id.to_string(),
                    source,
                })?;

            info!(
                status = %task.status(),
                message = task.status_message().unwrap_or("No message"),
                progress = task.progress().unwrap_or("-"),
                "current import status"
            );

            if task.status().is_terminal() {
                return Ok(task);
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cloud::TaskStatus;
    use crate::config::Settings;
    use crate::pipeline::fake::{FakeCloud, TASK_ID};

    fn pending() -> ImportTask {
        ImportTask::new(TASK_ID, TaskStatus::parse("active")).with_status_message("pending")
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_first_terminal_status() {
        for terminal in [TaskStatus::Completed, TaskStatus::Deleted, TaskStatus::Cancelled] {
            let settings = Settings::default();
            let cloud = FakeCloud::new().with_statuses([
                pending(),
                pending(),
                ImportTask::new(TASK_ID, terminal.clone()),
                pending(),
            ]);
            let pipeline = Pipeline::new(&settings, "us-east-1", &cloud, &cloud, &cloud);

            let task = pipeline.monitor(TASK_ID).await.unwrap();

            assert_eq!(task.status(), &terminal);
            assert_eq!(cloud.describe_count(), 3);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_poll_interval_between_queries() {
        let settings = Settings::default();
        let cloud = FakeCloud::new().with_statuses([
            pending(),
            pending(),
            ImportTask::new(TASK_ID, TaskStatus::Completed),
        ]);
        let pipeline = Pipeline::new(&settings, "us-east-1", &cloud, &cloud, &cloud);

        let started = tokio::time::Instant::now();
        pipeline.monitor(TASK_ID).await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(60) && elapsed < Duration::from_secs(61));
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_while_pending() {
        let settings = Settings::default();
        let cloud = FakeCloud::new().with_statuses([pending()]);
        let pipeline = Pipeline::new(&settings, "us-east-1", &cloud, &cloud, &cloud);

        // Queries land at 0s, 30s, ..., 300s; the deadline falls before the
        // twelfth.
        let outcome =
            tokio::time::timeout(Duration::from_secs(301), pipeline.monitor(TASK_ID)).await;

        assert!(outcome.is_err());
        assert_eq!(cloud.describe_count(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn query_failure_is_fatal() {
        let settings = Settings::default();
        let cloud = FakeCloud::new().failing_describe("Throttling: Rate exceeded");
        let pipeline = Pipeline::new(&settings, "us-east-1", &cloud, &cloud, &cloud);

        let err = pipeline.monitor(TASK_ID).await.unwrap_err();

        assert!(matches!(err, PipelineError::Monitor { .. }));
        assert_eq!(cloud.describe_count(), 1);
    }
}
