// Utilities
pub mod error;
pub mod formatter;
pub mod logging;
pub mod path_display;
