//! mergeflow - authenticated git operations for merge-request workflows
//!
//! Opens a local repository, picks the right credential for its remote
//! (platform token over HTTPS, SSH agent or key file over SSH), and runs
//! git with that credential injected through the child environment. All
//! error text that leaves the crate passes through [`secret::sanitize_text`].
//!
//! After a merge, [`cleanup::CleanupOrchestrator`] switches back to the main
//! branch, pulls, prunes, and deletes the merged branch, reporting each step.

pub mod auth;
pub mod cleanup;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod git;
pub mod platform;
pub mod secret;
pub mod system;
pub mod types;

pub use error::{Error, Result};
