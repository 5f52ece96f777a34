use leptos::prelude::*;

use crate::actions;
use crate::collections::Feed;
use crate::components::auth_panel::AuthPanel;
use crate::components::pagination_panel::PaginationPanel;
use crate::components::search_panel::SearchPanel;
use crate::components::snippets_panel::SnippetsPanel;
use crate::state::{AppState, ToastKind};

#[component]
pub(crate) fn App() -> impl IntoView {
    let state = AppState::provide();
    actions::init(state);
    on_cleanup(move || state.dispose());

    let user_text = move || {
        state.session.with(|session| {
            session
                .user()
                .map(|user| format!("{} {} ({})", user.first_name, user.last_name, user.username))
                .unwrap_or_else(|| "гость".to_string())
        })
    };

    view! {
        <main class="page">
            <section class="container">
                <h1>"Snippet Vault (Leptos)"</h1>
                <p>"Пользователь: " {user_text}</p>

                <ToastList />
                <AuthPanel />
                <FeedTabs />
                <SearchPanel />
                <SnippetsPanel />
                <PaginationPanel />
            </section>
        </main>
    }
}

#[component]
fn ToastList() -> impl IntoView {
    let state = AppState::expect();

    view! {
        <div class="toasts">
            <For
                each=move || state.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "toast toast-success",
                        ToastKind::Error => "toast toast-error",
                    };
                    view! {
                        <div class=class>
                            {toast.message.clone()}
                            <button
                                style="margin-left: 0.5rem;"
                                on:click=move |_| state.dismiss_toast(id)
                            >
                                "x"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
fn FeedTabs() -> impl IntoView {
    let state = AppState::expect();

    view! {
        <nav style="margin: 1rem 0;">
            <button
                disabled=move || state.active_feed.get() == Feed::Home
                on:click=move |_| actions::switch_feed(state, Feed::Home)
            >
                "Лента"
            </button>

            // приватные ленты подключаются только после входа
            <Show when=move || state.is_authenticated()>
                <button
                    style="margin-left: 0.5rem;"
                    disabled=move || state.active_feed.get() == Feed::Mine
                    on:click=move |_| actions::switch_feed(state, Feed::Mine)
                >
                    "Мои сниппеты"
                </button>
                <button
                    style="margin-left: 0.5rem;"
                    disabled=move || state.active_feed.get() == Feed::Saved
                    on:click=move |_| actions::switch_feed(state, Feed::Saved)
                >
                    "Сохранённые"
                </button>
            </Show>
        </nav>
    }
}
