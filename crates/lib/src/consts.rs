/// Workspace config file, read first.
pub const CONFIG_FILENAME: &str = ".xforge.json";

/// Uncommitted per-user override, merged over [`CONFIG_FILENAME`].
pub const LOCAL_CONFIG_FILENAME: &str = ".xforge.local.json";

/// Markdown index written into each version directory.
pub const DOWNLOADS_FILENAME: &str = "downloads.md";

/// Appended to the application name to form the default output root.
pub const ARTIFACTS_DIR_SUFFIX: &str = "-xc";

/// Default compiler program.
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// Version label used when none is configured.
pub const DEFAULT_PACKAGE_VERSION: &str = "unknown";

/// Linker symbol that receives the version label.
pub const VERSION_SYMBOL: &str = "main.VERSION";

/// External code-signing program.
pub const CODESIGN_PROGRAM: &str = "codesign";
