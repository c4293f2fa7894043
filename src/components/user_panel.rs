//! User Panel Component
//!
//! User list on the left, the selected user's node client table on the right.

use leptos::prelude::*;

use crate::commands;
use crate::components::{ConfirmDialog, UserNodeClientTable};
use crate::context::use_app_context;
use crate::models::User;
use crate::mutation::{InFlight, MutationError};
use crate::store::{store_remove_user, use_app_store, AppStateStoreFields};
use crate::table_state::TableMode;

#[component]
fn UserAddForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let submit_state = RwSignal::new(InFlight::Idle);
    let (name, set_name) = signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name_value = name.get_untracked().trim().to_string();
        if name_value.is_empty() {
            ctx.toast_error(MutationError::Validation("名称不能为空".into()).to_string());
            return;
        }
        ctx.spawn_mutation(
            submit_state,
            async move { commands::create_user(&name_value).await },
            "创建失败",
            move |user| {
                set_name.set(String::new());
                store.selected_user().set(Some(user.id));
                store.users().write().push(user);
                ctx.toast_success("用户创建成功");
            },
        );
    };

    view! {
        <form class="user-add-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="新用户..."
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || submit_state.get().is_pending()>"+"</button>
        </form>
    }
}

#[component]
pub fn UserPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let mode = RwSignal::new(TableMode::<User>::Idle);
    let delete_state = RwSignal::new(InFlight::Idle);
    let close = move || mode.update(|m| m.close());

    let confirm_delete = move |_: ()| {
        let Some(user_id) = mode.get_untracked().deleting().map(|u| u.id) else {
            return;
        };
        ctx.spawn_mutation(
            delete_state,
            async move { commands::delete_user(user_id).await },
            "删除失败",
            move |_| {
                store_remove_user(&store, user_id);
                ctx.toast_success("用户删除成功");
                close();
            },
        );
    };

    view! {
        <div class="user-panel">
            <aside class="user-list">
                <div class="user-list-header">"用户"</div>
                <UserAddForm />
                <For
                    each=move || store.users().get()
                    key=|user| user.id
                    children=move |user| {
                        let id = user.id;
                        let is_selected = move || store.selected_user().get() == Some(id);
                        let delete_target = user.clone();
                        view! {
                            <div
                                class=move || if is_selected() { "user-row selected" } else { "user-row" }
                                on:click=move |_| store.selected_user().set(Some(id))
                            >
                                <span class="user-name">{user.name}</span>
                                <button
                                    class="delete-btn small"
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        mode.update(|m| { m.begin_delete(delete_target.clone()); });
                                    }
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    }
                />
            </aside>

            <main class="user-content">
                {move || match store.selected_user().get() {
                    Some(user_id) => view! { <UserNodeClientTable user_id=user_id /> }.into_any(),
                    None => view! { <div class="empty-message">"请选择用户"</div> }.into_any(),
                }}
            </main>

            {move || mode.get().deleting().cloned().map(|user| view! {
                <ConfirmDialog
                    description=format!("确定要删除用户 {} 吗？其客户端分配也会被删除。", user.name)
                    pending=Signal::derive(move || delete_state.get().is_pending())
                    on_confirm=confirm_delete
                    on_cancel=move |_| close()
                />
            })}
        </div>
    }
}
