//! Scripted cleanup target for orchestrator tests
//!
//! Records every call and fails the steps it is told to fail.

#![allow(dead_code)]

use async_trait::async_trait;
use mergeflow::cleanup::{CleanupStep, CleanupTarget};
use mergeflow::error::{Error, Result, TimeoutError};
use mergeflow::git::Deadline;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// How an injected failure manifests
#[derive(Debug, Clone)]
enum Failure {
    Execution(String),
    Timeout,
}

/// Fake [`CleanupTarget`] with call tracking and error injection
#[derive(Debug, Default)]
pub struct ScriptedTarget {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<CleanupStep, Failure>>,
}

impl ScriptedTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `step` fail with git-style output
    pub fn fail_on(self, step: CleanupStep, output: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(step, Failure::Execution(output.to_string()));
        self
    }

    /// Make `step` run out of time
    pub fn time_out_on(self, step: CleanupStep) -> Self {
        self.failures.lock().unwrap().insert(step, Failure::Timeout);
        self
    }

    /// Calls received, as `"<step> [arg]"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn step(&self, step: CleanupStep, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        let failure = self.failures.lock().unwrap().get(&step).cloned();
        match failure {
            None => Ok(()),
            Some(Failure::Execution(output)) => Err(Error::Execution {
                operation: step.to_string(),
                output,
            }),
            Some(Failure::Timeout) => {
                let elapsed = tokio::time::timeout(Duration::ZERO, std::future::pending::<()>())
                    .await
                    .unwrap_err();
                Err(TimeoutError {
                    operation: step.to_string(),
                    deadline: Duration::from_secs(1),
                    source: elapsed,
                }
                .into())
            }
        }
    }
}

#[async_trait]
impl CleanupTarget for ScriptedTarget {
    async fn switch_branch(&self, _deadline: &Deadline, name: &str) -> Result<()> {
        self.step(CleanupStep::SwitchBranch, format!("switch {name}"))
            .await
    }

    async fn pull(&self, _deadline: &Deadline) -> Result<()> {
        self.step(CleanupStep::PullLatest, "pull".to_string()).await
    }

    async fn fetch_and_prune(&self, _deadline: &Deadline) -> Result<()> {
        self.step(CleanupStep::FetchAndPrune, "fetch --prune".to_string())
            .await
    }

    async fn delete_branch(&self, _deadline: &Deadline, name: &str) -> Result<()> {
        self.step(CleanupStep::DeleteBranch, format!("delete {name}"))
            .await
    }
}
