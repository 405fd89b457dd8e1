//! Stack of transient notifications in the corner of the viewport.

use leptos::prelude::*;

use crate::state::notifications::NotificationState;

#[component]
pub fn Toaster() -> impl IntoView {
    let notifications = expect_context::<RwSignal<NotificationState>>();

    view! {
        <div class="toaster" role="status" aria-live="polite">
            {move || {
                notifications
                    .get()
                    .items()
                    .iter()
                    .map(|n| {
                        let id = n.id;
                        view! {
                            <div class=n.kind.class()>
                                <span class="toast__message">{n.message.clone()}</span>
                                <button
                                    class="toast__dismiss"
                                    title="Dismiss"
                                    on:click=move |_| notifications.update(|s| s.dismiss(id))
                                >
                                    "\u{00d7}"
                                </button>
                            </div>
                        }
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}
