//! Order Editor Component
//!
//! Reorders one user's clients by drag-and-drop or move buttons. The whole
//! sequence is committed at once through `bulk_set_order`; the table keeps
//! showing the old order until the commit is acknowledged.

use std::collections::HashMap;

use leptos::prelude::*;
use leptos_dragdrop::{
    apply_drop, make_on_end_mouseenter, make_on_mouseleave, make_on_mousedown, make_on_row_mouseenter,
    DropTarget,
};

use crate::commands;
use crate::context::use_app_context;
use crate::mutation::InFlight;
use crate::projection::{move_down, move_up, projected_ids, UserClientRow};
use crate::store::{store_apply_committed, use_app_store};

#[component]
pub fn OrderEditor(
    user_id: u32,
    /// Projection at the time the editor was opened
    rows: Vec<UserClientRow>,
    #[prop(into)] on_done: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let dnd = ctx.dnd;
    let save_state = RwSignal::new(InFlight::Idle);

    let order = RwSignal::new(projected_ids(&rows));
    let names: HashMap<u32, String> = rows.iter().map(|r| (r.client.id, r.client.name.clone())).collect();
    let names = StoredValue::new(names);

    // Drops from before this editor opened are stale
    ctx.last_drop.set(None);
    Effect::new(move |_| {
        if let Some((dragged, target)) = ctx.last_drop.get() {
            order.update(|ids| *ids = apply_drop(ids, dragged, target));
            ctx.last_drop.set(None);
        }
    });

    let save = move |_| {
        let ids = order.get_untracked();
        web_sys::console::log_1(&format!("[ORDER] saving user {} order {:?}", user_id, ids).into());
        ctx.spawn_mutation(
            save_state,
            async move { commands::bulk_set_order(user_id, &ids).await },
            "保存失败",
            move |committed| {
                store_apply_committed(&store, &committed);
                ctx.toast_success("顺序已保存");
                on_done.run(());
                ctx.reload();
            },
        );
    };

    let row_class = move |id: u32| {
        if dnd.dragging_id_read.get() == Some(id) {
            "order-row dragging"
        } else if dnd.drop_target_read.get() == Some(DropTarget::Before(id)) {
            "order-row drop-before"
        } else {
            "order-row"
        }
    };

    view! {
        <div class="order-editor">
            <ol class="order-list">
                {move || {
                    let ids = order.get();
                    let last = ids.len().saturating_sub(1);
                    ids.into_iter().enumerate().map(|(index, id)| {
                        let at_top = index == 0;
                        let at_bottom = index == last;
                        let name = names.with_value(|n| n.get(&id).cloned().unwrap_or_else(|| format!("#{}", id)));
                        view! {
                            <li
                                class=move || row_class(id)
                                on:mousedown=make_on_mousedown(dnd, id)
                                on:mouseenter=make_on_row_mouseenter(dnd, id)
                                on:mouseleave=make_on_mouseleave(dnd)
                            >
                                <span class="drag-handle">"⠿"</span>
                                <span class="order-index">{index}</span>
                                <span class="order-name">{name}</span>
                                <button
                                    class="move-btn"
                                    disabled=at_top
                                    on:click=move |_| order.update(|ids| move_up(ids, index))
                                >
                                    "↑"
                                </button>
                                <button
                                    class="move-btn"
                                    disabled=at_bottom
                                    on:click=move |_| order.update(|ids| move_down(ids, index))
                                >
                                    "↓"
                                </button>
                            </li>
                        }
                    }).collect_view()
                }}
                <li
                    class=move || if dnd.drop_target_read.get() == Some(DropTarget::End) { "order-end drop-before" } else { "order-end" }
                    on:mouseenter=make_on_end_mouseenter(dnd)
                    on:mouseleave=make_on_mouseleave(dnd)
                ></li>
            </ol>

            <Show when=move || order.with(|ids| ids.is_empty())>
                <div class="empty-message">"该用户暂无客户端"</div>
            </Show>

            <div class="form-actions">
                <button class="cancel-btn" on:click=move |_| on_done.run(())>"取消"</button>
                <button
                    class="primary-btn"
                    disabled=move || save_state.get().is_pending()
                    on:click=save
                >
                    {move || if save_state.get().is_pending() { "保存中..." } else { "保存" }}
                </button>
            </div>
        </div>
    }
}
