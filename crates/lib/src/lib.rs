//! xforge-lib: Cross-compilation release pipeline
//!
//! This crate drives a toolchain over a matrix of target platforms:
//! - `platform`: OS/arch model, the ordered platform table and selector resolution
//! - `prebuild`: fail-fast workspace tasks (clean, vet, test, fmt, install)
//! - `build`: one compiler invocation per platform into a deterministic layout
//! - `package`: code-signing and archiving of each binary
//! - `report`: the `downloads.md` index
//! - `orchestrate`: the whole run, in order

pub mod artifact;
pub mod build;
pub mod consts;
pub mod orchestrate;
pub mod package;
pub mod platform;
pub mod prebuild;
pub mod process;
pub mod report;
pub mod settings;
pub mod toolchain;
pub mod util;

pub use orchestrate::{Orchestrator, RunError, RunReport};
pub use settings::Settings;
