//! IAM policy documents for the VM Import service role.

use serde::Serialize;
use std::collections::BTreeMap;

const POLICY_VERSION: &str = "2012-10-17";
const IMPORT_SERVICE_PRINCIPAL: &str = "vmie.amazonaws.com";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    version: &'static str,
    statement: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    effect: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    principal: Option<Principal>,
    action: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resource: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    condition: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    #[serde(rename = "Service")]
    service: String,
}

impl Statement {
    fn allow<S: Into<String>>(actions: impl IntoIterator<Item = S>) -> Self {
        Self {
            effect: "Allow",
            principal: None,
            action: actions.into_iter().map(Into::into).collect(),
            resource: Vec::new(),
            condition: BTreeMap::new(),
        }
    }

    fn on<S: Into<String>>(mut self, resources: impl IntoIterator<Item = S>) -> Self {
        self.resource = resources.into_iter().map(Into::into).collect();
        self
    }
}

impl PolicyDocument {
    fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION,
            statement,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Trust policy letting the VM Import service assume the role, but only
/// when it presents `external_id`.
pub fn import_trust_policy(external_id: &str) -> PolicyDocument {
    let mut statement = Statement::allow(["sts:AssumeRole"]);
    statement.principal = Some(Principal {
        service: IMPORT_SERVICE_PRINCIPAL.to_string(),
    });
    statement.condition.insert(
        "StringEquals".to_string(),
        BTreeMap::from([("sts:ExternalId".to_string(), external_id.to_string())]),
    );
    PolicyDocument::new(vec![statement])
}

/// Permission policy for the import role: read access to exactly one bucket
/// plus the EC2 calls needed to register the resulting image.
pub fn import_permission_policy(partition: &str, bucket: &str) -> PolicyDocument {
    let storage = Statement::allow(["s3:GetBucketLocation", "s3:GetObject", "s3:ListBucket"]).on([
        format!("arn:{partition}:s3:::{bucket}"),
        format!("arn:{partition}:s3:::{bucket}/*"),
    ]);
    let compute = Statement::allow([
        "ec2:ModifySnapshotAttribute",
        "ec2:CopySnapshot",
        "ec2:RegisterImage",
        "ec2:Describe*",
    ])
    .on(["*"]);
    PolicyDocument::new(vec![storage, compute])
}

/// ARN partition for a region name.
pub fn partition_for_region(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "aws-cn"
    } else if region.starts_with("us-gov-") {
        "aws-us-gov"
    } else {
        "aws"
    }
}
