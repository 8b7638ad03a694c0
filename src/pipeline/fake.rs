//! In-memory cloud used by the pipeline tests. Records every call in order.

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::cloud::{
    AccessControl, BucketCreation, CloudError, ImageImport, ImportRequest, ImportTask,
    ObjectStorage,
};

pub(crate) const TASK_ID: &str = "import-ami-1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateBucket(String, String),
    RoleExists(String),
    CreateRole(String),
    PutRolePolicy(String, String),
    Upload(String, String),
    StartImport(String),
    DescribeImport(String),
}

#[derive(Default)]
pub(crate) struct FakeCloud {
    calls: Mutex<Vec<Call>>,
    buckets: Mutex<HashSet<String>>,
    roles: Mutex<HashSet<String>>,
    documents: Mutex<Vec<String>>,
    statuses: Mutex<VecDeque<ImportTask>>,
    bucket_failure: Option<String>,
    create_role_failure: Option<String>,
    put_policy_failure: Option<String>,
    role_never_visible: bool,
    upload_failure: Option<String>,
    import_failure: Option<String>,
    describe_failure: Option<String>,
}

impl FakeCloud {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_role(self, role: &str) -> Self {
        self.roles.lock().unwrap().insert(role.to_string());
        self
    }

    /// Status snapshots returned by successive describe calls; the last one
    /// repeats forever.
    pub(crate) fn with_statuses(self, statuses: impl IntoIterator<Item = ImportTask>) -> Self {
        self.statuses.lock().unwrap().extend(statuses);
        self
    }

    pub(crate) fn failing_bucket(mut self, message: &str) -> Self {
        self.bucket_failure = Some(message.to_string());
        self
    }

    pub(crate) fn failing_create_role(mut self, message: &str) -> Self {
        self.create_role_failure = Some(message.to_string());
        self
    }

    pub(crate) fn failing_put_policy(mut self, message: &str) -> Self {
        self.put_policy_failure = Some(message.to_string());
        self
    }

    /// Created roles never show up in `role_exists`, as if IAM never
    /// propagated them.
    pub(crate) fn role_never_visible(mut self) -> Self {
        self.role_never_visible = true;
        self
    }

    pub(crate) fn failing_upload(mut self, message: &str) -> Self {
        self.upload_failure = Some(message.to_string());
        self
    }

    pub(crate) fn failing_import(mut self, message: &str) -> Self {
        self.import_failure = Some(message.to_string());
        self
    }

    pub(crate) fn failing_describe(mut self, message: &str) -> Self {
        self.describe_failure = Some(message.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Policy documents passed to `create_role` and `put_role_policy`.
    pub(crate) fn documents(&self) -> Vec<String> {
        self.documents.lock().unwrap().clone()
    }

    pub(crate) fn role_check_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::RoleExists(_)))
            .count()
    }

    pub(crate) fn describe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::DescribeImport(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn failure(operation: &'static str, message: &Option<String>) -> Result<(), CloudError> {
    match message {
        Some(message) => Err(CloudError::service(operation, message)),
        None => Ok(()),
    }
}

#[async_trait]
impl ObjectStorage for FakeCloud {
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<BucketCreation, CloudError> {
        self.record(Call::CreateBucket(bucket.to_string(), region.to_string()));
        failure("CreateBucket", &self.bucket_failure)?;
        if self.buckets.lock().unwrap().insert(bucket.to_string()) {
            Ok(BucketCreation::Created)
        } else {
            Ok(BucketCreation::AlreadyOwned)
        }
    }

    async fn upload_object(&self, bucket: &str, key: &str, _path: &Path) -> Result<(), CloudError> {
        self.record(Call::Upload(bucket.to_string(), key.to_string()));
        failure("PutObject", &self.upload_failure)
    }
}

#[async_trait]
impl AccessControl for FakeCloud {
    async fn role_exists(&self, role: &str) -> Result<bool, CloudError> {
        self.record(Call::RoleExists(role.to_string()));
        Ok(!self.role_never_visible && self.roles.lock().unwrap().contains(role))
    }

    async fn create_role(&self, role: &str, trust_policy: &str) -> Result<(), CloudError> {
        self.record(Call::CreateRole(role.to_string()));
        failure("CreateRole", &self.create_role_failure)?;
        self.documents.lock().unwrap().push(trust_policy.to_string());
        self.roles.lock().unwrap().insert(role.to_string());
        Ok(())
    }

    async fn put_role_policy(
        &self,
        role: &str,
        policy_name: &str,
        document: &str,
    ) -> Result<(), CloudError> {
        self.record(Call::PutRolePolicy(role.to_string(), policy_name.to_string()));
        failure("PutRolePolicy", &self.put_policy_failure)?;
        self.documents.lock().unwrap().push(document.to_string());
        Ok(())
    }
}

#[async_trait]
impl ImageImport for FakeCloud {
    async fn start_import(&self, request: &ImportRequest) -> Result<String, CloudError> {
        self.record(Call::StartImport(request.key().to_string()));
        failure("ImportImage", &self.import_failure)?;
        Ok(TASK_ID.to_string())
    }

    async fn describe_import(&self, task_id: &str) -> Result<ImportTask, CloudError> {
        self.record(Call::DescribeImport(task_id.to_string()));
        failure("DescribeImportImageTasks", &self.describe_failure)?;

        let mut statuses = self.statuses.lock().unwrap();
        let next = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        next.ok_or_else(|| CloudError::unexpected("DescribeImportImageTasks", "no status queued"))
    }
}
