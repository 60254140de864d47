//! Platform detection for GitHub and GitLab remotes
//!
//! Maps a remote URL to the platform hosting it, including self-hosted instances.

mod detection;

pub use detection::{detect_platform, parse_remote_url, platform_for_remote};
