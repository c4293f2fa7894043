//! Node Console Frontend App
//!
//! Tabbed layout: node management and per-user client assignment.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals};
use reactive_stores::Store;

use crate::commands;
use crate::components::{NodeTable, ToastHost, UserPanel};
use crate::context::AppContext;
use crate::mutation::MutationError;
use crate::store::{AppState, AppStateStoreFields};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Nodes,
    Users,
}

#[component]
pub fn App() -> impl IntoView {
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (tab, set_tab) = signal(Tab::Nodes);

    let store = Store::new(AppState::default());
    let ctx = AppContext::new(set_reload_trigger, create_dnd_signals());
    provide_context(store);
    provide_context(ctx);

    // Listeners live for the page; the open reorder editor consumes drops
    bind_global_mouseup(ctx.dnd, move |dragged, target| ctx.last_drop.set(Some((dragged, target))));

    // Mutation timeout from backend config
    spawn_local(async move {
        match commands::get_console_config().await {
            Ok(config) => commands::set_mutation_timeout(config),
            Err(e) => web_sys::console::warn_1(
                &format!("[APP] config unavailable, timeout stays {} ms: {}", commands::mutation_timeout_ms(), e).into(),
            ),
        }
    });

    // The first load may run before the database is ready
    commands::on_db_initialized(move || ctx.reload());

    // Load nodes and users on mount and on every reload
    Effect::new(move |_| {
        let trigger = reload_trigger.get();
        web_sys::console::log_1(&format!("[APP] Loading data, trigger={}", trigger).into());
        let report = move |what: &str, e: MutationError| {
            if trigger == 0 {
                web_sys::console::warn_1(&format!("[APP] initial {} load failed: {}", what, e).into());
            } else {
                ctx.toast_error(format!("加载{}失败: {}", what, e));
            }
        };
        spawn_local(async move {
            match commands::list_nodes().await {
                Ok(nodes) => store.nodes().set(nodes),
                Err(e) => report("节点", e),
            }
            match commands::list_users().await {
                Ok(users) => store.users().set(users),
                Err(e) => report("用户", e),
            }
        });
    });

    let tab_class = move |t: Tab| if tab.get() == t { "tab-btn active" } else { "tab-btn" };

    view! {
        <div class="app-layout">
            <nav class="tab-bar">
                <button class=move || tab_class(Tab::Nodes) on:click=move |_| set_tab.set(Tab::Nodes)>"节点"</button>
                <button class=move || tab_class(Tab::Users) on:click=move |_| set_tab.set(Tab::Users)>"用户"</button>
            </nav>

            <Show
                when=move || tab.get() == Tab::Nodes
                fallback=|| view! { <UserPanel /> }
            >
                <NodeTable />
            </Show>

            <ToastHost />
        </div>
    }
}
