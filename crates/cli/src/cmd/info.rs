use xforge_lib::package::codesign::{SIGNING_OS, host_os};
use xforge_lib::platform::Platform;

pub fn cmd_info() {
  println!("System:");
  match Platform::current() {
    Some(platform) => {
      println!("Platform: {}", platform);
      println!("CGO:      {}", if platform.cgo_enabled() { "enabled" } else { "disabled" });
    }
    _ => println!("Could not detect platform."),
  }
  let can_sign = host_os() == Some(SIGNING_OS);
  println!("Codesign: {}", if can_sign { "available" } else { "unavailable" });
}
