use leptos::prelude::*;

use crate::actions;
use crate::pagination::{PageItem, page_items};
use crate::state::AppState;

#[component]
pub(crate) fn PaginationPanel() -> impl IntoView {
    let state = AppState::expect();

    let pagination = move || {
        state
            .collections
            .with(|collections| collections.pagination(state.active_feed.get()))
    };

    view! {
        <Show when=move || pagination().is_some()>
            <nav class="pagination" style="margin-top: 1rem;">
                {move || {
                    pagination()
                        .map(|meta| {
                            // disabled-состояние берётся из серверных флагов,
                            // без пересчёта по page/total_pages
                            let items = page_items(meta.page, meta.total_pages);
                            view! {
                                <button
                                    disabled={!meta.has_prev_page}
                                    on:click=move |_| actions::change_page(state, 1)
                                >
                                    "<<"
                                </button>
                                <button
                                    disabled={!meta.has_prev_page}
                                    on:click=move |_| {
                                        actions::change_page(state, meta.page.saturating_sub(1).max(1))
                                    }
                                >
                                    "<"
                                </button>

                                {items
                                    .into_iter()
                                    .map(|item| match item {
                                        PageItem::Page(page) => {
                                            view! {
                                                <button
                                                    disabled={page == meta.page}
                                                    on:click=move |_| actions::change_page(state, page)
                                                >
                                                    {page}
                                                </button>
                                            }
                                                .into_any()
                                        }
                                        PageItem::Ellipsis => view! { <span>"…"</span> }.into_any(),
                                    })
                                    .collect_view()}

                                <button
                                    disabled={!meta.has_next_page}
                                    on:click=move |_| actions::change_page(state, meta.page + 1)
                                >
                                    ">"
                                </button>
                                <button
                                    disabled={!meta.has_next_page}
                                    on:click=move |_| actions::change_page(state, meta.total_pages)
                                >
                                    ">>"
                                </button>
                            }
                        })
                }}
            </nav>
        </Show>
    }
}
