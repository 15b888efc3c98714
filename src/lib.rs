pub mod forms;
pub mod guard;
pub mod model;
pub mod profile;
pub mod remote;
pub mod session;
pub mod tui;
pub mod view;

mod tui_shell;
