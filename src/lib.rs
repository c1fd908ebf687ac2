pub mod build;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod install;
pub mod orchestrator;
pub mod patch;
pub mod selector;
pub mod ui;
pub mod warning;

pub use error::{GitVersionsError, Result};
