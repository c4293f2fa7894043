//! Tauri Command Wrappers
//!
//! Frontend bindings to backend commands, organized by domain. Every call
//! goes through `call`, which decodes backend errors and applies the
//! configured mutation timeout.

mod node;
mod client;
mod assignment;
mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use wasm_bindgen::prelude::*;

use crate::models::UiConfig;
use crate::mutation::{with_timeout, CommandError, MutationError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "event"], catch)]
    async fn listen(event: &str, handler: &Closure<dyn FnMut(JsValue)>) -> Result<JsValue, JsValue>;
}

// Re-export all public items
pub use node::*;
pub use client::*;
pub use assignment::*;
pub use user::*;

static TIMEOUT_MS: AtomicU64 = AtomicU64::new(15_000);

/// Use the backend-provided timeout for all later calls
pub fn set_mutation_timeout(config: UiConfig) {
    TIMEOUT_MS.store(config.mutation_timeout_ms, Ordering::Relaxed);
}

pub fn mutation_timeout_ms() -> u64 {
    TIMEOUT_MS.load(Ordering::Relaxed)
}

/// Run `handler` each time the backend reports its database ready
pub fn on_db_initialized(handler: impl Fn() + 'static) {
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |_event: JsValue| handler());
    wasm_bindgen_futures::spawn_local(async move {
        match listen("db-initialized", &closure).await {
            Ok(_) => closure.forget(),
            Err(e) => web_sys::console::warn_1(&format!("[CMD] listen failed: {:?}", e).into()),
        }
    });
}

fn rejection(err: JsValue) -> MutationError {
    if let Ok(cmd_err) = serde_wasm_bindgen::from_value::<CommandError>(err.clone()) {
        return cmd_err.into();
    }
    MutationError::Remote(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Invoke `cmd` with `args`, decode the response, bounded by the mutation timeout
pub(crate) async fn call<A, R>(cmd: &str, args: &A) -> Result<R, MutationError>
where
    A: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let js_args = serde_wasm_bindgen::to_value(args).map_err(|e| MutationError::Remote(e.to_string()))?;
    let timeout_ms = mutation_timeout_ms();

    let request = async move {
        let result = invoke(cmd, js_args).await.map_err(rejection)?;
        serde_wasm_bindgen::from_value(result).map_err(|e| MutationError::Remote(e.to_string()))
    };

    let outcome = with_timeout(request, timeout_ms).await;
    if let Err(e) = &outcome {
        web_sys::console::warn_1(&format!("[CMD] {} failed: {}", cmd, e).into());
    }
    outcome
}

/// Argument struct for commands that take only `id`
#[derive(Serialize)]
struct IdArgs {
    id: u32,
}

/// Argument struct for commands without arguments
#[derive(Serialize)]
struct NoArgs {}
