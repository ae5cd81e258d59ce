pub mod console_panel;
pub mod control_bar;
pub mod error_dialog;
pub mod main_panel;
pub mod status_bar;

pub use console_panel::render_console_panel;
pub use control_bar::render_control_bar;
pub use error_dialog::render_error_dialog;
pub use main_panel::render_main_panel;
pub use status_bar::render_status_bar;
