//! Post-merge cleanup
//!
//! Two-part pattern:
//! 1. Plan - the fixed step order and each step's criticality (pure)
//! 2. Execute - run the steps against a repository, producing a report

mod execute;
mod plan;

pub use execute::{
    CleanupOrchestrator, CleanupProgress, CleanupReport, CleanupTarget, NoProgress, StepOutcome,
};
pub use plan::{CleanupStep, Criticality};
