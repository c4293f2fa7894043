//! Node Console Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - commands: Tauri command handlers (desktop builds)

pub mod config;
pub mod domain;
pub mod repository;
#[cfg(feature = "desktop")]
mod commands;

use config::ConsoleConfig;
use repository::{DbState, NodeClientRepository, NodeRepository, UserRepository};

/// Application state shared across commands
pub struct AppState {
    pub db_state: DbState,
    pub config: ConsoleConfig,
    pub nodes: NodeRepository,
    pub clients: NodeClientRepository,
    pub users: UserRepository,
}

impl AppState {
    /// Repositories over a not-yet-initialized connection slot
    pub fn new(db_state: DbState, config: ConsoleConfig) -> Self {
        Self {
            nodes: NodeRepository::new(db_state.conn.clone()),
            clients: NodeClientRepository::new(db_state.conn.clone()),
            users: UserRepository::new(db_state.conn.clone()),
            db_state,
            config,
        }
    }
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::{Emitter, Manager};

    tauri::Builder::default()
        .setup(|app| {
            // Single instance check - must be first!
            #[cfg(desktop)]
            app.handle().plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
                if let Some(window) = app.get_webview_window("main") {
                    let _ = window.set_focus();
                }
            }))?;

            let app_handle = app.handle().clone();
            let paths = app_handle.path();

            let config_dir = paths.app_config_dir()?;
            let config = match config::load_config(&config_dir) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Invalid console config, using defaults: {}", e);
                    ConsoleConfig::default()
                }
            };

            rolling_logger::init_logger(
                paths.app_log_dir()?,
                "NodeConsole",
                rolling_logger::RotationPolicy {
                    max_bytes: config.log_max_bytes,
                    max_files: config.log_max_files,
                },
            )?;

            let data_dir = paths.app_data_dir()?;
            std::fs::create_dir_all(&data_dir)?;
            let db_path = data_dir.join(&config.db_file_name);

            log::info!("app setup starting, db at {}", db_path.display());

            // Manage state immediately; the connection arrives once migrations ran
            let db_state = DbState::new();
            app.manage(AppState::new(db_state.clone(), config));

            tauri::async_runtime::spawn(async move {
                match repository::init_db(&db_path).await {
                    Ok(initialized) => {
                        let conn = initialized.conn.lock().await.take();
                        *db_state.conn.lock().await = conn;
                        let _ = rolling_logger::info("database initialized");

                        if let Err(e) = app_handle.emit("db-initialized", ()) {
                            log::error!("failed to emit db-initialized: {}", e);
                        }
                    }
                    Err(e) => {
                        let _ = rolling_logger::error(&format!("database init failed: {}", e));
                    }
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Nodes
            commands::create_node,
            commands::list_nodes,
            commands::get_node,
            commands::update_node,
            commands::delete_node,
            // Node clients
            commands::create_node_client,
            commands::update_node_client,
            commands::delete_node_client,
            commands::list_user_node_clients,
            // Assignments
            commands::assign_client,
            commands::unassign_client,
            commands::set_assignment_enabled,
            commands::set_assignment_order,
            commands::bulk_set_order,
            // Users & config
            commands::list_users,
            commands::create_user,
            commands::delete_user,
            commands::get_console_config,
            commands::get_recent_logs,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
