//! Code-signing for binaries built for the signing-capable OS family.

use std::path::Path;

use crate::consts::CODESIGN_PROGRAM;
use crate::platform::os::Os;
use crate::process::{CommandRunner, ExternalCommand, ProcessError};

/// The only OS family whose binaries can be signed, and only from a host of that family.
pub const SIGNING_OS: Os = Os::Darwin;

/// OS of the machine running the build. Only the OS decides signing, never the architecture.
pub fn host_os() -> Option<Os> {
  Os::current()
}

/// Whether a binary for `target` should be signed on `host` with `identity`.
pub fn should_sign(identity: &str, host: Option<Os>, target: Os) -> bool {
  !identity.is_empty() && host == Some(SIGNING_OS) && target == SIGNING_OS
}

/// `codesign -s <identity> <binary>`
pub fn codesign_command(identity: &str, binary: &Path) -> ExternalCommand {
  ExternalCommand::new(CODESIGN_PROGRAM)
    .args(["-s", identity])
    .path_arg(binary)
}

pub async fn sign<R: CommandRunner>(runner: &R, identity: &str, binary: &Path) -> Result<(), ProcessError> {
  runner.run(&codesign_command(identity, binary)).await.map(|_| ())
}
