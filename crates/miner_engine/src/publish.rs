use std::io;
use std::path::PathBuf;
use std::process::Command;

use miner_logging::{miner_debug, miner_info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not run `{step}`: {source}")]
    Spawn {
        step: String,
        #[source]
        source: io::Error,
    },
    #[error("`{step}` exited with {code:?}: {stderr}")]
    Failed {
        step: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Makes the files written so far publicly visible as one unit.
pub trait Publisher: Send + Sync {
    fn publish(&self, message: &str) -> Result<(), PublishError>;
}

/// Stages everything in the repository, commits with `message` and pushes.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_dir: PathBuf,
}

impl GitPublisher {
    pub fn new(repo_dir: PathBuf) -> Self {
        Self { repo_dir }
    }

    fn git(&self, args: &[&str]) -> Result<(), PublishError> {
        let step = format!("git {}", args.first().copied().unwrap_or_default());
        miner_debug!("Running {} in {:?}", step, self.repo_dir);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|source| PublishError::Spawn {
                step: step.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PublishError::Failed {
                step,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, message: &str) -> Result<(), PublishError> {
        self.git(&["add", "-A"])?;
        self.git(&["commit", "-m", message])?;
        self.git(&["push"])?;
        miner_info!("Published: {}", message);
        Ok(())
    }
}

/// Leaves the working tree as is and only logs what would be published.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunPublisher;

impl Publisher for DryRunPublisher {
    fn publish(&self, message: &str) -> Result<(), PublishError> {
        miner_info!("Dry run, not publishing: {}", message);
        Ok(())
    }
}
