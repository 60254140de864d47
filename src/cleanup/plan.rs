//! Cleanup steps and their failure policy
//!
//! Pure data: the fixed step order and which steps may fail without
//! stopping the sequence.

use std::fmt;

/// How a step's failure affects the rest of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    /// Failure stops the sequence; later steps are not attempted
    Critical,
    /// Failure is recorded and the sequence continues
    BestEffort,
}

/// One post-merge cleanup step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupStep {
    /// Check out the main branch
    SwitchBranch,
    /// Fast-forward main from the remote
    PullLatest,
    /// Fetch and prune stale remote-tracking branches
    FetchAndPrune,
    /// Delete the merged feature branch locally
    DeleteBranch,
}

impl CleanupStep {
    /// Every step, in execution order
    pub const ALL: [Self; 4] = [
        Self::SwitchBranch,
        Self::PullLatest,
        Self::FetchAndPrune,
        Self::DeleteBranch,
    ];

    /// Failure policy for this step
    pub const fn criticality(self) -> Criticality {
        match self {
            Self::SwitchBranch | Self::PullLatest => Criticality::Critical,
            Self::FetchAndPrune | Self::DeleteBranch => Criticality::BestEffort,
        }
    }

    /// Whether failure stops the sequence
    pub const fn is_critical(self) -> bool {
        matches!(self.criticality(), Criticality::Critical)
    }

    /// Position in [`ALL`](Self::ALL)
    pub const fn index(self) -> usize {
        match self {
            Self::SwitchBranch => 0,
            Self::PullLatest => 1,
            Self::FetchAndPrune => 2,
            Self::DeleteBranch => 3,
        }
    }
}

impl fmt::Display for CleanupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwitchBranch => write!(f, "switch branch"),
            Self::PullLatest => write!(f, "pull latest"),
            Self::FetchAndPrune => write!(f, "fetch and prune"),
            Self::DeleteBranch => write!(f, "delete branch"),
        }
    }
}
