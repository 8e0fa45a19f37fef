use owo_colors::{OwoColorize, Stream};

use xforge_lib::platform::{PlatformTable, Selector, resolve};

/// Print the resolved platform matrix, marking entries built with CGO enabled.
pub fn cmd_platforms(os: &str, arch: &str) {
  let table = PlatformTable::standard();
  let matrix = resolve(&table, &Selector::parse(os), &Selector::parse(arch));

  if matrix.is_empty() {
    println!("No platforms match.");
    return;
  }

  for platform in &matrix {
    if platform.cgo_enabled() {
      println!(
        "{:<16} {}",
        platform.key(),
        "cgo".if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    } else {
      println!("{}", platform.key());
    }
  }
}
