use tracing::info;

use super::{Pipeline, PipelineError};
use crate::cloud::{AccessControl, ImageImport, ImportRequest, ObjectStorage};

impl<S, A, I> Pipeline<'_, S, A, I>
where
    S: ObjectStorage,
    A: AccessControl,
    I: ImageImport,
{
    pub(crate) async fn start_import(
        &self,
        bucket: &str,
        key: &str,
        description: &str,
    ) -> Result<String, PipelineError> {
        info!(bucket, key, "initiating VM import task");

        let request = ImportRequest::new(bucket, key, description, self.settings.role_name());
        let task_id = self
            .images
            .start_import(&request)
            .await
            .map_err(PipelineError::Submit)?;

        info!(task_id = task_id.as_str(), "import task started");
        Ok(task_id)
    }
}
