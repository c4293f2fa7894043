//! UI Components
//!
//! Leptos components of the console screens.

mod toast;
mod popup_sheet;
mod confirm_dialog;
mod node_form;
mod node_table;
mod node_client_table;
mod user_panel;
mod user_node_client_table;
mod user_node_client_form;
mod order_editor;

pub use toast::ToastHost;
pub use popup_sheet::PopupSheet;
pub use confirm_dialog::ConfirmDialog;
pub use node_form::NodeForm;
pub use node_table::NodeTable;
pub use node_client_table::NodeClientTable;
pub use user_panel::UserPanel;
pub use user_node_client_table::UserNodeClientTable;
pub use user_node_client_form::UserNodeClientForm;
pub use order_editor::OrderEditor;
