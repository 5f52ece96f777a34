use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::actions;
use crate::models::{Snippet, SnippetDraft};
use crate::query::parse_tags_input;
use crate::state::{AppState, ToastKind};

fn validate_draft(draft: &SnippetDraft) -> Result<(), &'static str> {
    if draft.title.trim().is_empty()
        || draft.content.trim().is_empty()
        || draft.programming_language.trim().is_empty()
    {
        return Err("Заполните заголовок, код и язык");
    }
    Ok(())
}

fn optional_text(raw: String) -> Option<String> {
    let trimmed = raw.trim().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[component]
pub(crate) fn SnippetsPanel() -> impl IntoView {
    let state = AppState::expect();

    let snippets = move || {
        state
            .collections
            .with(|collections| collections.feed_snippets(state.active_feed.get()))
    };
    let loading = move || {
        state
            .collections
            .with(|collections| collections.is_loading(state.active_feed.get()))
    };

    view! {
        <h2>"Сниппеты"</h2>

        <CreateSnippetForm />

        <Show when=loading>
            <p>"Загрузка..."</p>
        </Show>

        <Show when=move || snippets().is_empty() && !loading()>
            <p>"Ничего не найдено. Попробуйте другой запрос."</p>
        </Show>

        <ul>
            <For
                each=snippets
                key=|snippet| (snippet.id, snippet.updated_at.clone())
                children=move |snippet| {
                    view! { <SnippetCard snippet=snippet /> }
                }
            />
        </ul>

        <SelectedSnippet />
    }
}

#[component]
fn SnippetCard(snippet: Snippet) -> impl IntoView {
    let state = AppState::expect();

    let id = snippet.id;
    let owner_id = snippet.user_id;
    let title = snippet.title.clone();
    let language = snippet.programming_language.clone();
    let author = snippet.user.username.clone();
    let views = snippet.view_count;
    let tag_names = snippet
        .tags
        .iter()
        .map(|tag| tag.name.clone())
        .collect::<Vec<_>>()
        .join(", ");

    // начальная отметка «сохранён» для карточки
    if state.is_authenticated() {
        actions::check_saved(state, id);
    }

    let is_mine = move || {
        state.session.with(|session| {
            session
                .user()
                .map(|user| user.id == owner_id)
                .unwrap_or(false)
        })
    };
    let is_saved = move || {
        state
            .collections
            .with(|collections| collections.is_marked_saved(id))
    };

    view! {
        <li style="margin-bottom: 0.5rem;">
            <strong style="cursor: pointer;" on:click=move |_| actions::open_snippet(state, id)>
                {title}
            </strong>
            <div>
                <small>{format!("[{language}] автор {author}, просмотров: {views}")}</small>
            </div>
            <div>
                <small>{format!("метки: {tag_names}")}</small>
            </div>

            <Show when=move || state.is_authenticated()>
                <div style="margin-top: 0.25rem;">
                    <button on:click=move |_| actions::toggle_saved(state, id, is_saved())>
                        {move || if is_saved() { "Убрать из сохранённых" } else { "Сохранить" }}
                    </button>

                    <Show when=is_mine>
                        <button
                            style="margin-left: 0.5rem;"
                            on:click=move |_| actions::delete_snippet(state, id)
                        >
                            "Удалить"
                        </button>
                    </Show>
                </div>
            </Show>
        </li>
    }
}

#[component]
fn CreateSnippetForm() -> impl IntoView {
    let state = AppState::expect();

    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let language = RwSignal::new(String::new());
    let tags = RwSignal::new(String::new());
    let is_public = RwSignal::new(true);
    let form_error = RwSignal::new(None::<&'static str>);

    let on_create = move |ev: SubmitEvent| {
        ev.prevent_default();
        form_error.set(None);

        let draft = SnippetDraft {
            title: title.get().trim().to_string(),
            description: optional_text(description.get()),
            content: content.get().trim().to_string(),
            tags: parse_tags_input(&tags.get()),
            programming_language: language.get().trim().to_string(),
            is_public: is_public.get(),
        };

        if let Err(message) = validate_draft(&draft) {
            form_error.set(Some(message));
            return;
        }

        actions::create_snippet(state, draft);
        title.set(String::new());
        description.set(String::new());
        content.set(String::new());
        language.set(String::new());
        tags.set(String::new());
    };

    view! {
        <Show when=move || state.is_authenticated()>
            <h3 style="margin-top: 1rem;">"Новый сниппет"</h3>
            <form on:submit=on_create>
                <input
                    placeholder="заголовок"
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                />
                <input
                    placeholder="описание"
                    prop:value=move || description.get()
                    on:input=move |ev| description.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="код"
                    prop:value=move || content.get()
                    on:input=move |ev| content.set(event_target_value(&ev))
                ></textarea>
                <input
                    placeholder="язык"
                    prop:value=move || language.get()
                    on:input=move |ev| language.set(event_target_value(&ev))
                />
                <input
                    placeholder="метки через запятую"
                    prop:value=move || tags.get()
                    on:input=move |ev| tags.set(event_target_value(&ev))
                />
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || is_public.get()
                        on:change=move |ev| is_public.set(event_target_checked(&ev))
                    />
                    "публичный"
                </label>
                <button type="submit">"Создать"</button>
            </form>

            <Show when=move || form_error.get().is_some()>
                <div class="error-banner">
                    {move || form_error.get().unwrap_or_default()}
                </div>
            </Show>
        </Show>
    }
}

#[component]
fn SelectedSnippet() -> impl IntoView {
    let state = AppState::expect();

    let editing = RwSignal::new(false);
    let edit_title = RwSignal::new(String::new());
    let edit_content = RwSignal::new(String::new());

    let selected = move || {
        state
            .collections
            .with(|collections| collections.selected().cloned())
    };

    let is_own_selected = move || {
        let owner_id = state
            .collections
            .with(|collections| collections.selected().map(|snippet| snippet.user_id));
        owner_id.is_some_and(|owner_id| {
            state
                .session
                .with(|session| session.user().is_some_and(|user| user.id == owner_id))
        })
    };

    let on_start_edit = move |_| {
        if let Some(snippet) = selected() {
            edit_title.set(snippet.title);
            edit_content.set(snippet.content);
            editing.set(true);
        }
    };

    let on_save = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(snippet) = selected() else {
            return;
        };

        // обновление отправляет запись целиком
        let draft = SnippetDraft {
            title: edit_title.get().trim().to_string(),
            description: snippet.description.clone(),
            content: edit_content.get().trim().to_string(),
            tags: snippet.tags.iter().map(|tag| tag.name.clone()).collect(),
            programming_language: snippet.programming_language.clone(),
            is_public: snippet.is_public,
        };

        if draft.title.is_empty() || draft.content.is_empty() {
            state.push_toast(ToastKind::Error, "Заполните заголовок и код");
            return;
        }

        actions::update_snippet(state, snippet.id, draft);
        editing.set(false);
    };

    view! {
        <Show when=move || selected().is_some()>
            <div class="selected-snippet" style="margin-top: 1rem;">
                {move || {
                    selected()
                        .map(|snippet| {
                            view! {
                                <h3>{snippet.title.clone()}</h3>
                                <p>
                                    <small>
                                        {format!(
                                            "язык: {}, просмотров: {}",
                                            snippet.programming_language,
                                            snippet.view_count,
                                        )}
                                    </small>
                                </p>
                                <pre>{snippet.content.clone()}</pre>
                            }
                        })
                }}

                <Show when=move || is_own_selected() && !editing.get()>
                    <button on:click=on_start_edit>"Редактировать"</button>
                </Show>

                <Show when=move || editing.get()>
                    <form on:submit=on_save>
                        <input
                            placeholder="новый заголовок"
                            prop:value=move || edit_title.get()
                            on:input=move |ev| edit_title.set(event_target_value(&ev))
                        />
                        <textarea
                            placeholder="новый код"
                            prop:value=move || edit_content.get()
                            on:input=move |ev| edit_content.set(event_target_value(&ev))
                        ></textarea>
                        <button type="submit">"Сохранить"</button>
                        <button type="button" on:click=move |_| editing.set(false)>
                            "Отмена"
                        </button>
                    </form>
                </Show>

                <button style="margin-left: 0.5rem;" on:click=move |_| actions::close_snippet(state)>
                    "Закрыть"
                </button>
            </div>
        </Show>
    }
}
