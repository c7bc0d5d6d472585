pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod committer;
pub mod config;
pub mod error;
pub mod git;
pub mod manifest;
pub mod plan;
pub mod ui;
pub mod version;

pub use error::{ReleaseError, Result};
