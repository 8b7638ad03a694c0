use async_trait::async_trait;
use aws_sdk_ec2::Client;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{ImageDiskContainer, ImportImageTask, UserBucket};

use crate::cloud::{CloudError, ImageImport, ImportRequest, ImportTask, TaskStatus};

/// Disk container format handed to VM Import.
const IMPORT_FORMAT: &str = "ova";

pub struct Ec2Import {
    client: Client,
}

impl Ec2Import {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageImport for Ec2Import {
    async fn start_import(&self, request: &ImportRequest) -> Result<String, CloudError> {
        let container = ImageDiskContainer::builder()
            .description(request.description())
            .format(IMPORT_FORMAT)
            .user_bucket(
                UserBucket::builder()
                    .s3_bucket(request.bucket())
                    .s3_key(request.key())
                    .build(),
            )
            .build();

        let output = self
            .client
            .import_image()
            .description(request.description())
            .role_name(request.role_name())
            .disk_containers(container)
            .send()
            .await
            .map_err(|e| CloudError::service("ImportImage", DisplayErrorContext(&e)))?;

        output
            .import_task_id()
            .map(str::to_string)
            .ok_or_else(|| CloudError::unexpected("ImportImage", "no import task id"))
    }

    async fn describe_import(&self, task_id: &str) -> Result<ImportTask, CloudError> {
        let output = self
            .client
            .describe_import_image_tasks()
            .import_task_ids(task_id)
            .send()
            .await
            .map_err(|e| CloudError::service("DescribeImportImageTasks", DisplayErrorContext(&e)))?;

        let task = output.import_image_tasks().first().ok_or_else(|| {
            CloudError::unexpected(
                "DescribeImportImageTasks",
                format!("task {task_id} not found"),
            )
        })?;
        to_import_task(task_id, task)
    }
}

fn to_import_task(task_id: &str, task: &ImportImageTask) -> Result<ImportTask, CloudError> {
    let status = task.status().ok_or_else(|| {
        CloudError::unexpected("DescribeImportImageTasks", format!("task {task_id} has no status"))
    })?;

    let mut snapshot = ImportTask::new(task_id, TaskStatus::parse(status));
    if let Some(message) = task.status_message() {
        snapshot = snapshot.with_status_message(message);
    }
    if let Some(progress) = task.progress() {
        snapshot = snapshot.with_progress(progress);
    }
    if let Some(image_id) = task.image_id() {
        snapshot = snapshot.with_image_id(image_id);
    }
    Ok(snapshot)
}
