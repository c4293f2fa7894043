//! Node Client Table Component
//!
//! Clients of one node with the users they are assigned to, shown as the
//! expanded content of a node row.

use leptos::prelude::*;

use crate::commands::{self, CreateNodeClientArgs};
use crate::components::ConfirmDialog;
use crate::context::use_app_context;
use crate::models::{NodeClient, User};
use crate::mutation::{InFlight, MutationError};
use crate::store::{store_remove_client, use_app_store, AppStateStoreFields};
use crate::table_state::TableMode;

fn assigned_users_label(client: &NodeClient, users: &[User]) -> String {
    client
        .users
        .iter()
        .map(|a| {
            let name = users
                .iter()
                .find(|u| u.id == a.user_id)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| format!("#{}", a.user_id));
            if a.enable { name } else { format!("{} (禁用)", name) }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inline form adding a client to a node, optionally assigned to a user
#[component]
fn NodeClientAddForm(node_id: u32) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let submit_state = RwSignal::new(InFlight::Idle);

    let (name, set_name) = signal(String::new());
    let (user_id, set_user_id) = signal(None::<u32>);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name_value = name.get_untracked().trim().to_string();
        if name_value.is_empty() {
            ctx.toast_error(MutationError::Validation("名称不能为空".into()).to_string());
            return;
        }
        let user_id = user_id.get_untracked();

        ctx.spawn_mutation(
            submit_state,
            async move {
                let args = CreateNodeClientArgs {
                    node_id,
                    name: &name_value,
                    user_id,
                    enable: user_id.map(|_| true),
                };
                commands::create_node_client(&args).await
            },
            "创建失败",
            move |_| {
                set_name.set(String::new());
                ctx.toast_success("客户端创建成功");
                ctx.reload();
            },
        );
    };

    view! {
        <form class="client-add-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="新客户端名称"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <select on:change=move |ev| set_user_id.set(event_target_value(&ev).parse().ok())>
                <option value="">"不分配用户"</option>
                {move || store.users().get().into_iter().map(|user| {
                    let id = user.id;
                    view! {
                        <option value=id.to_string() selected=move || user_id.get() == Some(id)>
                            {user.name}
                        </option>
                    }
                }).collect_view()}
            </select>
            <button type="submit" disabled=move || submit_state.get().is_pending()>"+"</button>
        </form>
    }
}

#[component]
pub fn NodeClientTable(node_id: u32, clients: Vec<NodeClient>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let mode = RwSignal::new(TableMode::<NodeClient>::Idle);
    let delete_state = RwSignal::new(InFlight::Idle);
    let close = move || mode.update(|m| m.close());

    let confirm_delete = move |_: ()| {
        let Some(client_id) = mode.get_untracked().deleting().map(|c| c.id) else {
            return;
        };
        ctx.spawn_mutation(
            delete_state,
            async move { commands::delete_node_client(client_id).await },
            "删除失败",
            move |_| {
                store_remove_client(&store, client_id);
                ctx.toast_success("删除成功");
                close();
                ctx.reload();
            },
        );
    };

    let rows = clients
        .into_iter()
        .map(|client| {
            let name = client.name.clone();
            let delete_target = client.clone();
            view! {
                <tr>
                    <td>{name}</td>
                    <td>{move || store.users().with(|users| assigned_users_label(&client, users))}</td>
                    <td class="row-actions">
                        <button
                            class="delete-btn"
                            on:click=move |_| mode.update(|m| { m.begin_delete(delete_target.clone()); })
                        >
                            "删除"
                        </button>
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="node-client-table">
            <table class="data-table nested">
                <thead>
                    <tr>
                        <th>"名称"</th>
                        <th>"用户"</th>
                        <th>"操作"</th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>

            <NodeClientAddForm node_id=node_id />

            {move || mode.get().deleting().cloned().map(|client| view! {
                <ConfirmDialog
                    description=format!("确定要删除客户端 {} 吗？此操作不可撤销。", client.name)
                    pending=Signal::derive(move || delete_state.get().is_pending())
                    on_confirm=confirm_delete
                    on_cancel=move |_| close()
                />
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientAssignment;

    #[test]
    fn test_assigned_users_label() {
        let client = NodeClient {
            id: 1,
            node_id: 1,
            name: "edge".into(),
            users: vec![
                ClientAssignment { client_id: 1, user_id: 1, enable: true, order: 0 },
                ClientAssignment { client_id: 1, user_id: 2, enable: false, order: 3 },
                ClientAssignment { client_id: 1, user_id: 9, enable: true, order: 1 },
            ],
        };
        let users = vec![
            User { id: 1, name: "alice".into() },
            User { id: 2, name: "bob".into() },
        ];

        assert_eq!(assigned_users_label(&client, &users), "alice, bob (禁用), #9");
    }
}
