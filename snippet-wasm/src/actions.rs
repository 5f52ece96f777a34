//! Асинхронные операции над состоянием приложения.
//!
//! Каждая операция — обычная пара запрос/ответ: store переводится в
//! pending, ответ применяется в обработчике того же вызова. Ошибки не
//! выходят за пределы store: максимум — тост и устаревший список.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::collections::Feed;
use crate::models::{RegisterRequest, SnippetDraft};
use crate::query::SearchFilters;
use crate::session;
use crate::state::{AppState, ToastKind};
use crate::storage;

pub(crate) const DEFAULT_LIMIT: u32 = 10;

fn current_query() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default()
}

fn push_query(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let _ = history.push_state_with_url(
        &wasm_bindgen::JsValue::NULL,
        "",
        Some(&format!("/{query}")),
    );
}

/// Фильтры из текущей адресной строки.
pub(crate) fn restore_filters() -> SearchFilters {
    SearchFilters::from_query_string(&current_query())
}

fn session_token(state: AppState) -> Option<String> {
    state
        .session
        .with_untracked(|session| session.token().map(str::to_string))
}

/// 401 обрабатывает сам store: сбрасывает cookie и завершает сессию.
fn handle_api_error(state: AppState, err: api::ApiError, fallback: &str) {
    if err.is_authorization_expired() {
        let _ = storage::clear_token();
        state.session.update(|session| session.expired());
    }
    state.push_toast(ToastKind::Error, err.toast_message(fallback));
}

/// Восстановление сессии и первая загрузка при старте приложения.
pub(crate) fn init(state: AppState) {
    if let Some(token) = storage::load_token() {
        state.session.update(|session| session.restore_token(token));
        refresh_self(state);
    }

    let filters = restore_filters();
    state.filters.set(filters.clone());
    load_feed(state, Feed::Home, filters);
}

pub(crate) fn login(state: AppState, email: String, password: String) {
    state.session.update(|session| session.begin());

    spawn_local(async move {
        match api::login(&email, &password).await {
            Ok(auth) => {
                if let Err(message) = storage::save_token(&auth.access_token) {
                    state.session.update(|session| session.failed(message));
                    return;
                }
                state
                    .session
                    .update(|session| session.authenticated(auth.user, auth.access_token));
            }
            Err(_) => {
                state
                    .session
                    .update(|session| session.failed(session::LOGIN_FAILED));
            }
        }
    });
}

pub(crate) fn register(state: AppState, payload: RegisterRequest) {
    state.session.update(|session| session.begin());

    spawn_local(async move {
        match api::register(&payload).await {
            Ok(auth) => {
                if let Err(message) = storage::save_token(&auth.access_token) {
                    state.session.update(|session| session.failed(message));
                    return;
                }
                state
                    .session
                    .update(|session| session.authenticated(auth.user, auth.access_token));
                state.push_toast(ToastKind::Success, "Добро пожаловать!");
            }
            Err(_) => {
                state
                    .session
                    .update(|session| session.failed(session::REGISTER_FAILED));
            }
        }
    });
}

/// Выход локальный и всегда успешен: cookie и store очищаются вместе.
pub(crate) fn logout(state: AppState) {
    if let Err(message) = storage::clear_token() {
        state.push_toast(ToastKind::Error, message);
    }
    state.session.update(|session| session.logout());
    state.active_feed.set(Feed::Home);
}

/// «Кто я» по сохранённому токену.
pub(crate) fn refresh_self(state: AppState) {
    let Some(token) = session_token(state) else {
        return;
    };
    state.session.update(|session| session.begin());

    spawn_local(async move {
        match api::me(&token).await {
            Ok(user) => state.session.update(|session| session.refreshed(user)),
            Err(err) => {
                if err.is_authorization_expired() {
                    let _ = storage::clear_token();
                    state.session.update(|session| session.expired());
                } else {
                    state.session.update(|session| {
                        session.failed("Не удалось обновить данные пользователя");
                    });
                }
            }
        }
    });
}

/// Загружает одну ленту. Применяется только ответ последнего запроса к
/// этому слоту: опоздавшие ответы отбрасываются по номеру запроса.
pub(crate) fn load_feed(state: AppState, feed: Feed, filters: SearchFilters) {
    let Some(ticket) = state
        .collections
        .try_update(|collections| collections.begin_fetch(feed))
    else {
        return;
    };
    let token = session_token(state);

    spawn_local(async move {
        let result = match feed {
            Feed::Home => api::list_snippets(&filters, DEFAULT_LIMIT).await,
            Feed::Mine => api::list_my_snippets(token.as_deref(), &filters, DEFAULT_LIMIT).await,
            Feed::Saved => {
                api::list_saved_snippets(token.as_deref(), filters.page, DEFAULT_LIMIT).await
            }
        };

        match result {
            Ok(page) => {
                state.collections.update(|collections| {
                    collections.apply_page(feed, ticket, page);
                });
            }
            Err(err) => {
                state.collections.update(|collections| {
                    collections.fail_fetch(feed, ticket);
                });
                handle_api_error(state, err, "Не удалось загрузить сниппеты");
            }
        }
    });
}

/// Search/Filter Controller: сабмит формы поиска.
///
/// Сбрасывает страницу на первую, кладёт фильтры в адресную строку и
/// загружает активную ленту.
pub(crate) fn submit_search(state: AppState, filters: SearchFilters) {
    let filters = filters.first_page();
    push_query(&filters.to_query_string());
    state.filters.set(filters.clone());
    load_feed(state, state.active_feed.get_untracked(), filters);
}

/// Pagination Controller: переход на страницу.
///
/// Фильтры перечитываются из адресной строки, меняется только номер
/// страницы.
pub(crate) fn change_page(state: AppState, page: u32) {
    let filters = restore_filters().with_page(page);
    push_query(&filters.to_query_string());
    state.filters.set(filters.clone());
    load_feed(state, state.active_feed.get_untracked(), filters);
}

pub(crate) fn switch_feed(state: AppState, feed: Feed) {
    state.active_feed.set(feed);
    let filters = state.filters.get_untracked().first_page();
    push_query(&filters.to_query_string());
    state.filters.set(filters.clone());
    load_feed(state, feed, filters);
}

pub(crate) fn open_snippet(state: AppState, id: i64) {
    let token = session_token(state);

    spawn_local(async move {
        match api::get_snippet(token.as_deref(), id).await {
            Ok(snippet) => {
                state
                    .collections
                    .update(|collections| collections.select(snippet));
            }
            Err(err) => handle_api_error(state, err, "Не удалось загрузить сниппет"),
        }
    });
}

pub(crate) fn close_snippet(state: AppState) {
    state
        .collections
        .update(|collections| collections.clear_selected());
}

/// Создание не вставляет запись в ленты: следующая загрузка перечитает
/// список с сервера.
pub(crate) fn create_snippet(state: AppState, draft: SnippetDraft) {
    let Some(token) = session_token(state) else {
        state.push_toast(ToastKind::Error, "Нужна авторизация для создания сниппета");
        return;
    };

    spawn_local(async move {
        match api::create_snippet(&token, &draft).await {
            Ok(_) => state.push_toast(ToastKind::Success, "Сниппет создан"),
            Err(err) => handle_api_error(state, err, "Не удалось создать сниппет"),
        }
    });
}

/// Обновлённая запись кладётся в общую map и сразу видна во всех лентах.
pub(crate) fn update_snippet(state: AppState, id: i64, draft: SnippetDraft) {
    let Some(token) = session_token(state) else {
        state.push_toast(ToastKind::Error, "Нужна авторизация для обновления сниппета");
        return;
    };

    spawn_local(async move {
        match api::update_snippet(&token, id, &draft).await {
            Ok(updated) => {
                state
                    .collections
                    .update(|collections| collections.upsert(updated));
                state.push_toast(ToastKind::Success, "Сниппет обновлён");
            }
            Err(err) => handle_api_error(state, err, "Не удалось обновить сниппет"),
        }
    });
}

/// Удаление выносит запись из map и из всех лент разом.
pub(crate) fn delete_snippet(state: AppState, id: i64) {
    let Some(token) = session_token(state) else {
        state.push_toast(ToastKind::Error, "Нужна авторизация для удаления сниппета");
        return;
    };

    spawn_local(async move {
        match api::delete_snippet(&token, id).await {
            Ok(()) => {
                state.collections.update(|collections| collections.remove(id));
                state.push_toast(ToastKind::Success, "Сниппет удалён");
            }
            Err(err) => handle_api_error(state, err, "Не удалось удалить сниппет"),
        }
    });
}

/// Сохранение/снятие сохранения с оптимистичной отметкой на карточке.
/// Лента сохранённых не меняется до следующей загрузки.
pub(crate) fn toggle_saved(state: AppState, id: i64, currently_saved: bool) {
    let Some(token) = session_token(state) else {
        state.push_toast(ToastKind::Error, "Нужна авторизация для сохранения сниппета");
        return;
    };

    state
        .collections
        .update(|collections| collections.mark_saved(id, !currently_saved));

    spawn_local(async move {
        let result = if currently_saved {
            api::unsave_snippet(&token, id).await
        } else {
            api::save_snippet(&token, id).await
        };

        match result {
            Ok(()) => {
                let message = if currently_saved {
                    "Сниппет убран из сохранённых"
                } else {
                    "Сниппет сохранён"
                };
                state.push_toast(ToastKind::Success, message);
            }
            Err(err) => {
                // откатываем оптимистичную отметку
                state
                    .collections
                    .update(|collections| collections.mark_saved(id, currently_saved));
                handle_api_error(state, err, "Не удалось обновить сохранённые");
            }
        }
    });
}

/// Начальная отметка «сохранён» для карточки.
pub(crate) fn check_saved(state: AppState, id: i64) {
    let Some(token) = session_token(state) else {
        return;
    };

    spawn_local(async move {
        if let Ok(saved) = api::is_snippet_saved(&token, id).await {
            state
                .collections
                .update(|collections| collections.mark_saved(id, saved));
        }
    });
}
