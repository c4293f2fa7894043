//! Commands Layer
//!
//! Tauri command handlers that bridge frontend to backend services.

mod node_cmd;
mod client_cmd;
mod assignment_cmd;
mod user_cmd;

pub use node_cmd::*;
pub use client_cmd::*;
pub use assignment_cmd::*;
pub use user_cmd::*;
