//! Git publisher: commits (and optionally pushes) the synthesis so the
//! downstream consumer notices a new cycle.

use crate::config::PublishConfig;
use explorer_shared::persist::Publisher;
use explorer_shared::PersistenceError;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct GitPublisher {
    repo_dir: PathBuf,
    branch: String,
    push: bool,
}

impl GitPublisher {
    pub fn new(config: &PublishConfig) -> Self {
        Self {
            repo_dir: config.repo_dir.clone(),
            branch: config.branch.clone(),
            push: config.push,
        }
    }

    /// The git invocations, in order.
    pub fn steps(&self, title: &str, body: &str) -> Vec<Vec<String>> {
        let mut steps = vec![
            vec!["checkout".to_string(), self.branch.clone()],
            vec!["add".to_string(), "-A".to_string()],
            vec![
                "commit".to_string(),
                "--allow-empty".to_string(),
                "-m".to_string(),
                title.to_string(),
                "-m".to_string(),
                body.to_string(),
            ],
        ];
        if self.push {
            steps.push(vec!["push".to_string()]);
        }
        steps
    }

    fn run_git(&self, args: &[String]) -> Result<(), String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()
            .map_err(|e| format!("cannot run git {}: {}", args[0], e))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!(
            "git {} exited with {}: {}",
            args[0],
            output.status,
            stderr.trim()
        ))
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, title: &str, body: &str, written: &Path) -> Result<(), PersistenceError> {
        for step in self.steps(title, body) {
            tracing::debug!(args = %step.join(" "), "git");
            self.run_git(&step).map_err(|reason| PersistenceError::Publish {
                written: written.to_path_buf(),
                reason,
            })?;
        }
        tracing::info!(repo = %self.repo_dir.display(), title, "synthesis published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_with_and_without_push() {
        let mut config = PublishConfig::default();
        let publisher = GitPublisher::new(&config);
        let steps = publisher.steps("Cycle 1: x", "BOUNDARY: x");
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], vec!["checkout", "main"]);
        assert_eq!(steps[2][3], "Cycle 1: x");
        assert_eq!(steps[3], vec!["push"]);

        config.push = false;
        let steps = GitPublisher::new(&config).steps("t", "b");
        assert_eq!(steps.len(), 3);
    }
}
