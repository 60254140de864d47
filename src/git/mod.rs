//! Git operations
//!
//! Reads (branch names, remote URLs, commit messages) go through `gix` with
//! no subprocess. Anything that touches the working tree or the network runs
//! the git CLI through [`BoundedExecutor`] under a deadline.

mod discovery;
mod executor;
mod repository;

pub use discovery::find_repository_root;
pub use executor::{BoundedExecutor, Deadline};
pub use repository::RepositoryHandle;
