//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{DndSignals, DropTarget};

use crate::mutation::{InFlight, MutationError};

/// How long a toast stays on screen
const TOAST_MS: u32 = 3_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload nodes and users from backend
    set_reload_trigger: WriteSignal<u32>,
    /// Toasts currently on screen
    pub toasts: RwSignal<Vec<Toast>>,
    next_toast_id: StoredValue<u32>,
    /// Drag state of the reorder list
    pub dnd: DndSignals,
    /// Last completed drop, consumed by the open reorder editor
    pub last_drop: RwSignal<Option<(u32, DropTarget)>>,
}

impl AppContext {
    pub fn new(set_reload_trigger: WriteSignal<u32>, dnd: DndSignals) -> Self {
        Self {
            set_reload_trigger,
            toasts: RwSignal::new(Vec::new()),
            next_toast_id: StoredValue::new(0),
            dnd,
            last_drop: RwSignal::new(None),
        }
    }

    /// Trigger a reload of nodes and users
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn toast_success(&self, message: impl Into<String>) {
        self.push_toast(ToastKind::Success, message.into());
    }

    pub fn toast_error(&self, message: impl Into<String>) {
        self.push_toast(ToastKind::Error, message.into());
    }

    pub fn dismiss_toast(&self, id: u32) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }

    /// Run one mutation guarded by `in_flight`.
    ///
    /// Refused while a previous request of the same control is pending. On
    /// failure a toast `"{failure}: {error}"` is shown and `on_success` is skipped.
    pub fn spawn_mutation<T, F, S>(&self, in_flight: RwSignal<InFlight>, request: F, failure: &'static str, on_success: S)
    where
        T: 'static,
        F: Future<Output = Result<T, MutationError>> + 'static,
        S: FnOnce(T) + 'static,
    {
        let mut claimed = false;
        in_flight.update(|state| claimed = state.begin());
        if !claimed {
            return;
        }

        let ctx = *self;
        spawn_local(async move {
            let result = request.await;
            in_flight.update(|state| state.finish());
            match result {
                Ok(value) => on_success(value),
                Err(e) => ctx.toast_error(format!("{}: {}", failure, e)),
            }
        });
    }

    fn push_toast(&self, kind: ToastKind, message: String) {
        let id = self.next_toast_id.get_value();
        self.next_toast_id.set_value(id.wrapping_add(1));
        self.toasts.update(|list| list.push(Toast { id, kind, message }));

        let ctx = *self;
        spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(TOAST_MS).await;
            ctx.dismiss_toast(id);
        });
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
