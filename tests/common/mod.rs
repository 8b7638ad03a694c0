#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestContext {
    pub dir: TempDir,
}

impl TestContext {
    /// Command with a scrubbed environment so no run can reach AWS.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ova-to-ami"));
        cmd.timeout(Duration::from_secs(30));
        cmd.env_remove("OVA_TO_AMI_CONFIG");
        cmd.env("AWS_EC2_METADATA_DISABLED", "true");
        cmd
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }
}

pub fn ova_to_ami() -> TestContext {
    TestContext {
        dir: tempfile::tempdir().expect("Failed to create temp dir"),
    }
}
