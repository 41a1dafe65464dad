//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "Brailler";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "brailler";

/// Default port of the HTTP server.
pub const DEFAULT_WEB_PORT: u16 = 3030;
