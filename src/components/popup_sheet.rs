//! Popup Sheet Component
//!
//! Side sheet hosting an edit form. Clicking the overlay or × closes it.

use leptos::prelude::*;

#[component]
pub fn PopupSheet(
    #[prop(into)] title: String,
    #[prop(into)] on_close: Callback<()>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="sheet-overlay" on:click=move |_| on_close.run(())>
            <aside class="sheet" on:click=|ev| ev.stop_propagation()>
                <header class="sheet-header">
                    <h2>{title}</h2>
                    <button class="sheet-close-btn" on:click=move |_| on_close.run(())>"×"</button>
                </header>
                <div class="sheet-body">{children()}</div>
            </aside>
        </div>
    }
}
