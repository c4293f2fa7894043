//! Confirm Dialog Component
//!
//! Modal delete confirmation. The delete button is disabled and relabelled
//! while the deletion is in flight.

use leptos::prelude::*;

/// Delete confirmation dialog
///
/// # Arguments
/// * `description` - What is about to be deleted
/// * `pending` - True while the delete request is in flight
/// * `on_confirm` - Runs the deletion
/// * `on_cancel` - Closes the dialog
#[component]
pub fn ConfirmDialog(
    #[prop(into)] description: String,
    #[prop(into)] pending: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="dialog-overlay">
            <div class="dialog" role="alertdialog">
                <h3 class="dialog-title">"确认删除"</h3>
                <p class="dialog-description">{description}</p>
                <div class="dialog-footer">
                    <button class="cancel-btn" on:click=move |_| on_cancel.run(())>
                        "取消"
                    </button>
                    <button
                        class="danger-btn"
                        disabled=move || pending.get()
                        on:click=move |ev| {
                            ev.stop_propagation();
                            if !pending.get_untracked() {
                                on_confirm.run(());
                            }
                        }
                    >
                        {move || if pending.get() { "删除中..." } else { "删除" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
