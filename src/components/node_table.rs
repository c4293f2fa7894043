//! Node Table Component
//!
//! Lists nodes with their clients expanded below each row. Editing opens a
//! popup sheet, deleting goes through a confirmation dialog.

use std::collections::HashSet;

use leptos::prelude::*;

use crate::commands;
use crate::components::{ConfirmDialog, NodeClientTable, NodeForm, PopupSheet};
use crate::context::use_app_context;
use crate::models::Node;
use crate::mutation::InFlight;
use crate::store::{store_remove_node, use_app_store, AppStateStoreFields};
use crate::table_state::TableMode;

#[component]
pub fn NodeTable() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let mode = RwSignal::new(TableMode::<Node>::Idle);
    let delete_state = RwSignal::new(InFlight::Idle);
    // Nodes start expanded
    let collapsed = RwSignal::new(HashSet::<u32>::new());

    let close = move || mode.update(|m| m.close());

    let confirm_delete = move |_: ()| {
        let Some(node_id) = mode.get_untracked().deleting().map(|n| n.id) else {
            return;
        };
        ctx.spawn_mutation(
            delete_state,
            async move { commands::delete_node(node_id).await },
            "删除失败",
            move |_| {
                store_remove_node(&store, node_id);
                ctx.toast_success("节点删除成功");
                close();
                ctx.reload();
            },
        );
    };

    view! {
        <section class="node-table">
            <NodeForm />

            <table class="data-table">
                <thead>
                    <tr>
                        <th></th>
                        <th>"名称"</th>
                        <th>"地址"</th>
                        <th>"客户端"</th>
                        <th>"操作"</th>
                    </tr>
                </thead>
                {move || store.nodes().get().into_iter().map(|entry| {
                    let id = entry.node.id;
                    let is_expanded = move || !collapsed.with(|set| set.contains(&id));
                    let title = format!("节点 {} 的客户端列表 ({})", entry.node.name, entry.items.len());
                    let client_count = entry.items.len();
                    let clients = entry.items;
                    let name = entry.node.name.clone();
                    let address = entry.node.address.clone().unwrap_or_default();
                    let edit_target = entry.node.clone();
                    let delete_target = entry.node;
                    view! {
                        <tbody class="node-group">
                            <tr class="node-row">
                                <td>
                                    <button
                                        class="expand-btn"
                                        on:click=move |_| collapsed.update(|set| {
                                            if !set.remove(&id) {
                                                set.insert(id);
                                            }
                                        })
                                    >
                                        {move || if is_expanded() { "▼" } else { "▶" }}
                                    </button>
                                </td>
                                <td>{name}</td>
                                <td>{address}</td>
                                <td>{client_count}</td>
                                <td class="row-actions">
                                    <button
                                        class="edit-btn"
                                        on:click=move |_| mode.update(|m| { m.begin_edit(edit_target.clone()); })
                                    >
                                        "编辑"
                                    </button>
                                    <button
                                        class="delete-btn"
                                        on:click=move |_| mode.update(|m| { m.begin_delete(delete_target.clone()); })
                                    >
                                        "删除"
                                    </button>
                                </td>
                            </tr>
                            <Show when=is_expanded>
                                <tr class="node-expanded">
                                    <td colspan="5">
                                        <div class="expanded-title">{title.clone()}</div>
                                        <NodeClientTable node_id=id clients=clients.clone() />
                                    </td>
                                </tr>
                            </Show>
                        </tbody>
                    }
                }).collect_view()}
            </table>

            {move || store.nodes().with(|nodes| nodes.is_empty()).then(|| view! {
                <div class="empty-message">"暂无节点"</div>
            })}

            {move || mode.get().editing().cloned().map(|node| view! {
                <PopupSheet title="编辑节点" on_close=move |_| close()>
                    <NodeForm node=node on_done=move |_| close() />
                </PopupSheet>
            })}

            {move || mode.get().deleting().cloned().map(|node| view! {
                <ConfirmDialog
                    description=format!("确定要删除节点 {} 吗？此操作不可撤销。", node.name)
                    pending=Signal::derive(move || delete_state.get().is_pending())
                    on_confirm=confirm_delete
                    on_cancel=move |_| close()
                />
            })}
        </section>
    }
}
