use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::actions;
use crate::query::{ALL_LANGUAGES, SearchFilters, parse_tags_input};
use crate::state::AppState;

const LANGUAGES: [&str; 6] = [ALL_LANGUAGES, "javascript", "python", "java", "csharp", "rust"];

#[component]
pub(crate) fn SearchPanel() -> impl IntoView {
    let state = AppState::expect();

    // стартовые значения — из фильтров, восстановленных из адресной строки
    let initial = state.filters.get_untracked();
    let search = RwSignal::new(initial.search.clone());
    let language = RwSignal::new(initial.programming_language.clone());
    let tags = RwSignal::new(initial.tags.join(", "));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let filters = SearchFilters {
            search: search.get().trim().to_string(),
            programming_language: language.get(),
            tags: parse_tags_input(&tags.get()),
            page: 1,
        };
        actions::submit_search(state, filters);
    };

    view! {
        <form on:submit=on_submit style="margin: 1rem 0;">
            <input
                placeholder="поиск по сниппетам"
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            <select on:change=move |ev| language.set(event_target_value(&ev))>
                {LANGUAGES
                    .into_iter()
                    .map(|lang| {
                        view! {
                            <option value=lang selected=move || language.get() == lang>
                                {lang}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
            <input
                placeholder="метки через запятую"
                prop:value=move || tags.get()
                on:input=move |ev| tags.set(event_target_value(&ev))
            />
            <button type="submit">"Искать"</button>
        </form>
    }
}
