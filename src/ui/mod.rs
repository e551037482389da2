// UI Layer
pub mod components;
pub mod layout;
pub mod theme;

pub use layout::{LayoutManager, LayoutMode};
pub use theme::Theme;

pub use components::{
    ArchiveTreeView, CommandBar, PathPrompt, ProgressPanel, StatusBar, StatusLevel, WarningScreen,
};
