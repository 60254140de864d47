//! Shared test fixtures

#![allow(dead_code, unused_imports)]

pub mod fake_system;
pub mod scripted_target;
pub mod temp_repo;

pub use fake_system::{FakeEnvironment, FakeFileSystem, RecordingSink, fixture};
pub use scripted_target::ScriptedTarget;
pub use temp_repo::TempGitRepo;
