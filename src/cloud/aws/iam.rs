use async_trait::async_trait;
use aws_sdk_iam::Client;
use aws_sdk_iam::error::DisplayErrorContext;

use crate::cloud::{AccessControl, CloudError};

const ROLE_DESCRIPTION: &str = "Service role for VM Import/Export";

pub struct IamAccess {
    client: Client,
}

impl IamAccess {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccessControl for IamAccess {
    async fn role_exists(&self, role: &str) -> Result<bool, CloudError> {
        match self.client.get_role().role_name(role).send().await {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_entity_exception()) =>
            {
                Ok(false)
            }
            Err(err) => Err(CloudError::service("GetRole", DisplayErrorContext(&err))),
        }
    }

    async fn create_role(&self, role: &str, trust_policy: &str) -> Result<(), CloudError> {
        self.client
            .create_role()
            .role_name(role)
            .assume_role_policy_document(trust_policy)
            .description(ROLE_DESCRIPTION)
            .send()
            .await
            .map_err(|e| CloudError::service("CreateRole", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn put_role_policy(
        &self,
        role: &str,
        policy_name: &str,
        document: &str,
    ) -> Result<(), CloudError> {
        self.client
            .put_role_policy()
            .role_name(role)
            .policy_name(policy_name)
            .policy_document(document)
            .send()
            .await
            .map_err(|e| CloudError::service("PutRolePolicy", DisplayErrorContext(&e)))?;
        Ok(())
    }
}
