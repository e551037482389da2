// UI Components
pub mod archive_tree_view;
pub mod command_bar;
pub mod path_prompt;
pub mod progress_panel;
pub mod status_bar;
pub mod warning;

pub use archive_tree_view::ArchiveTreeView;
pub use command_bar::CommandBar;
pub use path_prompt::PathPrompt;
pub use progress_panel::ProgressPanel;
pub use status_bar::{StatusBar, StatusLevel};
pub use warning::WarningScreen;
