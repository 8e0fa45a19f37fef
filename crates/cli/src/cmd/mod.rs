mod build;
mod info;
mod init;
mod platforms;

pub use build::{BuildArgs, cmd_build};
pub use info::cmd_info;
pub use init::cmd_init;
pub use platforms::cmd_platforms;
