//! Per-platform compilation.
//!
//! Each resolved platform gets one compiler invocation writing into a
//! deterministic location under the output root. Compile failures are recorded
//! on the platform's outcome and never abort the run.
//!
//! # Submodules
//!
//! - [`context`] - Run-wide values derived once from settings and workspace
//! - [`execute`] - Compiler invocation for one platform
//! - [`paths`] - Pure output-layout functions

pub mod context;
pub mod execute;
pub mod paths;

pub use context::{BuildContext, ContextError};
pub use execute::{BuildOutcome, PlatformBuilder, compile_command};
