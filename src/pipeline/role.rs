use tracing::info;

use super::{Pipeline, PipelineError};
use crate::cloud::policy::{import_permission_policy, import_trust_policy, partition_for_region};
use crate::cloud::{AccessControl, CloudError, ImageImport, ObjectStorage};

/// What to do about the import service role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDecision {
    /// A role with the configured name exists; use it as is. Its policies
    /// are not inspected.
    Reuse,
    Create,
}

pub async fn decide_role<A>(access: &A, role: &str) -> Result<RoleDecision, CloudError>
where
    A: AccessControl + ?Sized,
{
    if access.role_exists(role).await? {
        Ok(RoleDecision::Reuse)
    } else {
        Ok(RoleDecision::Create)
    }
}

impl<S, A, I> Pipeline<'_, S, A, I>
where
    S: ObjectStorage,
    A: AccessControl,
    I: ImageImport,
{
    pub(crate) async fn provision_role(&self, bucket: &str) -> Result<RoleDecision, PipelineError> {
        let role = self.settings.role_name();
        let wrap = |source: CloudError| PipelineError::Role {
            role: role.to_string(),
            source,
        };

        info!(role, "checking for existing IAM role");
        let decision = decide_role(self.access, role).await.map_err(wrap)?;
        match decision {
            RoleDecision::Reuse => info!(role, "IAM role already exists, skipping creation"),
            RoleDecision::Create => {
                info!(role, "IAM role not found, creating");
                self.create_role(role, bucket).await.map_err(wrap)?;
            }
        }
        Ok(decision)
    }

    async fn create_role(&self, role: &str, bucket: &str) -> Result<(), CloudError> {
        let trust = import_trust_policy(self.settings.external_id()).to_json()?;
        self.access.create_role(role, &trust).await?;
        info!(role, "IAM role created");

        let permissions = import_permission_policy(partition_for_region(self.region), bucket).to_json()?;
        self.access
            .put_role_policy(role, self.settings.policy_name(), &permissions)
            .await?;
        info!(role, policy = self.settings.policy_name(), "IAM role policy attached");

        info!(role, "waiting for IAM role to propagate");
        self.access
            .wait_for_role(
                role,
                self.settings.role_wait_attempts(),
                self.settings.role_wait_delay(),
            )
            .await?;
        info!(role, "IAM role is now available");
        Ok(())
    }
}
