// TUI components
//
// Each component renders one region of the screen. Stateful ones (login
// form, logs table) own their state; the rest are plain render functions.

pub mod filter_bar;
pub mod login_form;
pub mod logs_panel;
pub mod logs_table;
pub mod stats_chart;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use login_form::{FormAction, LoginForm};
pub use logs_table::LogsTable;
pub use toast::Toast;
