//! Node Form Component
//!
//! Creates a node, or edits one when `node` is given.

use leptos::prelude::*;

use crate::commands::{self, CreateNodeArgs, UpdateNodeArgs};
use crate::context::use_app_context;
use crate::models::Node;
use crate::mutation::{InFlight, MutationError};
use crate::store::{store_update_node, use_app_store};

#[component]
pub fn NodeForm(
    #[prop(optional)] node: Option<Node>,
    #[prop(into, optional)] on_done: Option<Callback<()>>,
) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let submit_state = RwSignal::new(InFlight::Idle);

    let editing_id = node.as_ref().map(|n| n.id);
    let (name, set_name) = signal(node.as_ref().map(|n| n.name.clone()).unwrap_or_default());
    let (address, set_address) = signal(node.and_then(|n| n.address).unwrap_or_default());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name_value = name.get_untracked().trim().to_string();
        let address_value = address.get_untracked().trim().to_string();
        if name_value.is_empty() {
            ctx.toast_error(MutationError::Validation("名称不能为空".into()).to_string());
            return;
        }

        match editing_id {
            Some(id) => ctx.spawn_mutation(
                submit_state,
                async move {
                    let args = UpdateNodeArgs {
                        id,
                        name: Some(&name_value),
                        address: Some(&address_value),
                    };
                    commands::update_node(&args).await
                },
                "更新失败",
                move |updated| {
                    store_update_node(&store, updated);
                    ctx.toast_success("节点更新成功");
                    if let Some(done) = on_done {
                        done.run(());
                    }
                },
            ),
            None => ctx.spawn_mutation(
                submit_state,
                async move {
                    let address = (!address_value.is_empty()).then_some(address_value.as_str());
                    let args = CreateNodeArgs { name: &name_value, address };
                    commands::create_node(&args).await
                },
                "创建失败",
                move |created| {
                    web_sys::console::log_1(&format!("[NODE] created #{}", created.id).into());
                    set_name.set(String::new());
                    set_address.set(String::new());
                    ctx.toast_success("节点创建成功");
                    ctx.reload();
                },
            ),
        }
    };

    view! {
        <form class="node-form" on:submit=on_submit>
            <label>
                "名称"
                <input
                    type="text"
                    placeholder="节点名称"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            </label>
            <label>
                "地址"
                <input
                    type="text"
                    placeholder="host:port"
                    prop:value=move || address.get()
                    on:input=move |ev| set_address.set(event_target_value(&ev))
                />
            </label>
            <button type="submit" disabled=move || submit_state.get().is_pending()>
                {move || match (editing_id.is_some(), submit_state.get().is_pending()) {
                    (_, true) => "提交中...",
                    (true, false) => "保存",
                    (false, false) => "新增节点",
                }}
            </button>
        </form>
    }
}
