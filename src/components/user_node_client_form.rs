//! User Node Client Form Component
//!
//! Edits a client (name, node) together with the selected user's enabled
//! flag and order. Only changed fields are sent.

use leptos::prelude::*;

use crate::commands::{self, UpdateNodeClientArgs};
use crate::context::use_app_context;
use crate::models::NodeClient;
use crate::mutation::{InFlight, MutationError};
use crate::store::{use_app_store, AppStateStoreFields};

/// Field changes of one submit
#[derive(Debug, Clone, PartialEq)]
struct ClientEdit {
    name: Option<String>,
    node_id: Option<u32>,
    enable: Option<bool>,
    order: Option<i32>,
}

/// Compare form values against `client`, as seen by `user_id`
fn diff_client(
    client: &NodeClient,
    user_id: u32,
    name: &str,
    node_id: u32,
    enable: bool,
    order_text: &str,
) -> Result<ClientEdit, MutationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MutationError::Validation("名称不能为空".into()));
    }
    let order: i32 = order_text
        .trim()
        .parse()
        .map_err(|_| MutationError::Validation("顺序必须是整数".into()))?;
    if order < 0 {
        return Err(MutationError::Validation("顺序不能为负数".into()));
    }

    let current = client.assignment_for(user_id);
    Ok(ClientEdit {
        name: (name != client.name).then(|| name.to_string()),
        node_id: (node_id != client.node_id).then_some(node_id),
        enable: (current.map(|a| a.enable) != Some(enable)).then_some(enable),
        order: (current.map(|a| a.order) != Some(order)).then_some(order),
    })
}

#[component]
pub fn UserNodeClientForm(
    user_id: u32,
    client: NodeClient,
    #[prop(into)] on_done: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let submit_state = RwSignal::new(InFlight::Idle);

    let assignment = client.assignment_for(user_id).cloned();
    let (name, set_name) = signal(client.name.clone());
    let (node_id, set_node_id) = signal(client.node_id);
    let (enable, set_enable) = signal(assignment.as_ref().map(|a| a.enable).unwrap_or(true));
    let (order_text, set_order_text) = signal(assignment.map(|a| a.order).unwrap_or(0).to_string());
    let client = StoredValue::new(client);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let edit = client.with_value(|c| {
            diff_client(
                c,
                user_id,
                &name.get_untracked(),
                node_id.get_untracked(),
                enable.get_untracked(),
                &order_text.get_untracked(),
            )
        });
        let edit = match edit {
            Ok(edit) => edit,
            Err(e) => {
                ctx.toast_error(e.to_string());
                return;
            }
        };
        let client_id = client.with_value(|c| c.id);

        ctx.spawn_mutation(
            submit_state,
            async move {
                if edit.name.is_some() || edit.node_id.is_some() {
                    let args = UpdateNodeClientArgs {
                        id: client_id,
                        node_id: edit.node_id,
                        name: edit.name.as_deref(),
                    };
                    commands::update_node_client(&args).await?;
                }
                if let Some(enable) = edit.enable {
                    commands::set_assignment_enabled(client_id, user_id, enable).await?;
                }
                if let Some(order) = edit.order {
                    commands::set_assignment_order(client_id, user_id, order).await?;
                }
                Ok::<(), MutationError>(())
            },
            "更新失败",
            move |_| {
                ctx.toast_success("更新成功");
                on_done.run(());
                ctx.reload();
            },
        );
    };

    view! {
        <form class="client-form" on:submit=on_submit>
            <label>
                "名称"
                <input
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            </label>
            <label>
                "节点"
                <select on:change=move |ev| {
                    if let Ok(id) = event_target_value(&ev).parse() {
                        set_node_id.set(id);
                    }
                }>
                    {move || store.nodes().get().into_iter().map(|entry| {
                        let id = entry.node.id;
                        view! {
                            <option value=id.to_string() selected=move || node_id.get() == id>
                                {entry.node.name}
                            </option>
                        }
                    }).collect_view()}
                </select>
            </label>
            <label class="checkbox-label">
                <input
                    type="checkbox"
                    prop:checked=move || enable.get()
                    on:change=move |ev| set_enable.set(event_target_checked(&ev))
                />
                "启用"
            </label>
            <label>
                "顺序"
                <input
                    type="number"
                    min="0"
                    prop:value=move || order_text.get()
                    on:input=move |ev| set_order_text.set(event_target_value(&ev))
                />
            </label>
            <button type="submit" disabled=move || submit_state.get().is_pending()>
                {move || if submit_state.get().is_pending() { "提交中..." } else { "保存" }}
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientAssignment;

    fn client() -> NodeClient {
        NodeClient {
            id: 4,
            node_id: 1,
            name: "edge".into(),
            users: vec![ClientAssignment { client_id: 4, user_id: 7, enable: true, order: 2 }],
        }
    }

    #[test]
    fn test_unchanged_form_sends_nothing() {
        let edit = diff_client(&client(), 7, " edge ", 1, true, "2").unwrap();
        assert_eq!(edit, ClientEdit { name: None, node_id: None, enable: None, order: None });
    }

    #[test]
    fn test_only_changed_fields_are_sent() {
        let edit = diff_client(&client(), 7, "edge-2", 1, false, "2").unwrap();
        assert_eq!(edit.name.as_deref(), Some("edge-2"));
        assert_eq!(edit.node_id, None);
        assert_eq!(edit.enable, Some(false));
        assert_eq!(edit.order, None);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(diff_client(&client(), 7, "  ", 1, true, "2"), Err(MutationError::Validation(_))));
        assert!(matches!(diff_client(&client(), 7, "edge", 1, true, "x"), Err(MutationError::Validation(_))));
        assert!(matches!(diff_client(&client(), 7, "edge", 1, true, "-1"), Err(MutationError::Validation(_))));
    }
}
