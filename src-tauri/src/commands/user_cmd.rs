//! Tauri Commands for Users and configuration

use tauri::State;
use crate::config::UiConfig;
use crate::domain::{DomainResult, User};
use crate::repository::Repository;
use crate::AppState;

#[tauri::command]
pub async fn list_users(state: State<'_, AppState>) -> DomainResult<Vec<User>> {
    state.users.list().await
}

#[tauri::command]
pub async fn create_user(state: State<'_, AppState>, name: String) -> DomainResult<User> {
    state.users.create(&User::new(0, name)).await
}

/// Delete a user and drop their assignments
#[tauri::command]
pub async fn delete_user(state: State<'_, AppState>, id: u32) -> DomainResult<()> {
    state.users.delete(id).await
}

/// Settings the frontend needs (mutation timeout)
#[tauri::command]
pub fn get_console_config(state: State<'_, AppState>) -> UiConfig {
    state.config.ui()
}

/// Last lines of the application log
#[tauri::command]
pub fn get_recent_logs() -> Result<Vec<String>, String> {
    rolling_logger::recent_lines().map_err(|e| e.to_string())
}
