//! External build toolchain invocation.

pub mod env;
pub mod make;

pub use env::{ScopedEnv, DEFAULT_SCRUBBED_VARS};
pub use make::{BuildTool, MakeBuildTool, OutputMode};
