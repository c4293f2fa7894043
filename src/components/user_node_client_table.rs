//! User Node Client Table Component
//!
//! One user's clients in that user's order, with a display-only
//! `virtualOrder` column. Hosts the edit sheet, the reorder editor and the
//! delete confirmation; at most one of them is open at a time.

use leptos::prelude::*;

use crate::commands;
use crate::components::{ConfirmDialog, OrderEditor, PopupSheet, UserNodeClientForm};
use crate::context::use_app_context;
use crate::models::{NodeClient, NodeWithClients};
use crate::mutation::InFlight;
use crate::projection::{project_for_user, UserClientRow};
use crate::store::{all_clients, store_remove_client, use_app_store, AppStateStoreFields};
use crate::table_state::TableMode;

fn node_name(nodes: &[NodeWithClients], node_id: u32) -> String {
    nodes
        .iter()
        .find(|n| n.node.id == node_id)
        .map(|n| n.node.name.clone())
        .unwrap_or_else(|| format!("#{}", node_id))
}

/// Select + button assigning an existing client to the user
#[component]
fn AssignClientControl(user_id: u32) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let assign_state = RwSignal::new(InFlight::Idle);
    let (picked, set_picked) = signal(None::<u32>);

    let unassigned = move || {
        store.nodes().with(|nodes| {
            all_clients(nodes)
                .into_iter()
                .filter(|c| c.assignment_for(user_id).is_none())
                .map(|c| (c.id, format!("{} / {}", node_name(nodes, c.node_id), c.name)))
                .collect::<Vec<_>>()
        })
    };

    let assign = move |_| {
        let Some(client_id) = picked.get_untracked() else {
            return;
        };
        ctx.spawn_mutation(
            assign_state,
            async move { commands::assign_client(client_id, user_id, true).await },
            "分配失败",
            move |_| {
                set_picked.set(None);
                ctx.toast_success("分配成功");
                ctx.reload();
            },
        );
    };

    view! {
        <div class="assign-control">
            <select on:change=move |ev| set_picked.set(event_target_value(&ev).parse().ok())>
                <option value="" selected=move || picked.get().is_none()>"选择客户端"</option>
                {move || unassigned().into_iter().map(|(id, label)| view! {
                    <option value=id.to_string() selected=move || picked.get() == Some(id)>{label}</option>
                }).collect_view()}
            </select>
            <button
                disabled=move || picked.get().is_none() || assign_state.get().is_pending()
                on:click=assign
            >
                "分配"
            </button>
        </div>
    }
}

#[component]
pub fn UserNodeClientTable(user_id: u32) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let mode = RwSignal::new(TableMode::<NodeClient>::Idle);
    let delete_state = RwSignal::new(InFlight::Idle);
    let unassign_state = RwSignal::new(InFlight::Idle);
    let close = move || mode.update(|m| m.close());

    let rows = Memo::new(move |_| store.nodes().with(|nodes| project_for_user(&all_clients(nodes), user_id)));

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

    let unassign = move |client_id: u32| {
        ctx.spawn_mutation(
            unassign_state,
            async move { commands::unassign_client(client_id, user_id).await },
            "取消分配失败",
            move |_| {
                ctx.toast_success("已取消分配");
                ctx.reload();
            },
        );
    };

    let render_row = move |row: UserClientRow| {
        let UserClientRow { client, assignment, virtual_order } = row;
        let client_id = client.id;
        let node = store.nodes().with(|nodes| node_name(nodes, client.node_id));
        let edit_target = client.clone();
        let delete_target = client.clone();
        let (row_class, status) = if assignment.enable {
            ("client-row", "启用")
        } else {
            ("client-row disabled", "禁用")
        };
        view! {
            <tr class=row_class>
                <td>{virtual_order}</td>
                <td>{client.name}</td>
                <td>{node}</td>
                <td>{status}</td>
                <td>{assignment.order}</td>
                <td class="row-actions">
                    <button
                        class="edit-btn"
                        on:click=move |_| mode.update(|m| { m.begin_edit(edit_target.clone()); })
                    >
                        "编辑"
                    </button>
                    <button
                        class="unassign-btn"
                        disabled=move || unassign_state.get().is_pending()
                        on:click=move |_| unassign(client_id)
                    >
                        "取消分配"
                    </button>
                    <button
                        class="delete-btn"
                        on:click=move |_| mode.update(|m| { m.begin_delete(delete_target.clone()); })
                    >
                        "删除"
                    </button>
                </td>
            </tr>
        }
    };

    view! {
        <section class="user-node-client-table">
            <div class="table-toolbar">
                <button
                    class="outline-btn"
                    disabled=move || !mode.get().is_idle()
                    on:click=move |_| mode.update(|m| { m.begin_reorder(); })
                >
                    "⇅ 编辑顺序"
                </button>
                <AssignClientControl user_id=user_id />
            </div>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"virtualOrder"</th>
                        <th>"名称"</th>
                        <th>"节点"</th>
                        <th>"状态"</th>
                        <th>"order"</th>
                        <th>"操作"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || rows.get().into_iter().map(render_row).collect_view()}
                </tbody>
            </table>

            <Show when=move || rows.with(|r| r.is_empty())>
                <div class="empty-message">"该用户暂无客户端"</div>
            </Show>

            {move || mode.get().editing().cloned().map(|client| view! {
                <PopupSheet title="编辑客户端" on_close=move |_| close()>
                    <UserNodeClientForm user_id=user_id client=client on_done=move |_| close() />
                </PopupSheet>
            })}

            {move || mode.get().is_reordering().then(|| view! {
                <PopupSheet title="编辑顺序" on_close=move |_| close()>
                    <OrderEditor user_id=user_id rows=rows.get_untracked() on_done=move |_| close() />
                </PopupSheet>
            })}

            {move || mode.get().deleting().cloned().map(|_| view! {
                <ConfirmDialog
                    description="确定要删除此客户端吗？此操作不可撤销。"
                    pending=Signal::derive(move || delete_state.get().is_pending())
                    on_confirm=confirm_delete
                    on_cancel=move |_| close()
                />
            })}
        </section>
    }
}
