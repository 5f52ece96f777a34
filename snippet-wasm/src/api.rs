use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::models::{
    AuthResponse, IsSavedResponse, LoginRequest, MeResponse, RegisterRequest, Snippet,
    SnippetDraft, SnippetPage, User,
};
use crate::query::SearchFilters;

const API_BASE_URL: &str = match option_env!("WASM_API_BASE_URL") {
    Some(value) => value,
    None => "http://127.0.0.1:8080",
};

#[derive(Debug, Clone)]
pub(crate) enum ApiError {
    Network(String),
    Http { status: u16, message: String },
    Decode(String),
}

impl ApiError {
    /// 401: авторизация истекла. Реакция (сброс токена) — на стороне store,
    /// глобального перехватчика нет.
    pub(crate) fn is_authorization_expired(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    /// Текст для тоста: сообщение сервера, если оно есть, иначе fallback.
    pub(crate) fn toast_message(&self, fallback: &str) -> String {
        match self {
            Self::Http { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http { status, message } => write!(f, "http error {status}: {message}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

async fn parse_json<T: DeserializeOwned>(
    response: gloo_net::http::Response,
) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn parse_error_body(response: gloo_net::http::Response) -> ApiError {
    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "request failed".to_string());

    let fallback = match status {
        400 => "Некорректный запрос".to_string(),
        401 => "Требуется авторизация".to_string(),
        403 => "Недостаточно прав для этой операции".to_string(),
        404 => "Ресурс не найден".to_string(),
        409 => "Конфликт данных".to_string(),
        500..=599 => "Ошибка сервера".to_string(),
        _ => format!("HTTP ошибка {status}"),
    };

    let message = if text.trim().is_empty() { fallback } else { text };

    ApiError::Http { status, message }
}

async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    Ok(())
}

pub(crate) async fn login(email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    let payload = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };

    let response = Request::post(&endpoint("/auth/login"))
        .json(&payload)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn register(payload: &RegisterRequest) -> Result<AuthResponse, ApiError> {
    let response = Request::post(&endpoint("/auth/register"))
        .json(payload)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn me(token: &str) -> Result<User, ApiError> {
    let response = authorized(Request::get(&endpoint("/me")), Some(token))
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    let body: MeResponse = parse_json(response).await?;
    Ok(body.user)
}

pub(crate) async fn list_snippets(
    filters: &SearchFilters,
    limit: u32,
) -> Result<SnippetPage, ApiError> {
    let url = endpoint(&format!("/snippets{}", filters.to_api_query(limit)));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn list_my_snippets(
    token: Option<&str>,
    filters: &SearchFilters,
    limit: u32,
) -> Result<SnippetPage, ApiError> {
    let url = endpoint(&format!("/me/snippets{}", filters.to_api_query(limit)));

    let response = authorized(Request::get(&url), token)
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn list_saved_snippets(
    token: Option<&str>,
    page: u32,
    limit: u32,
) -> Result<SnippetPage, ApiError> {
    let url = endpoint(&format!("/saved-snippets?page={page}&limit={limit}"));

    let response = authorized(Request::get(&url), token)
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn get_snippet(token: Option<&str>, id: i64) -> Result<Snippet, ApiError> {
    let response = authorized(Request::get(&endpoint(&format!("/me/snippets/{id}"))), token)
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn create_snippet(token: &str, draft: &SnippetDraft) -> Result<Snippet, ApiError> {
    let response = authorized(Request::post(&endpoint("/me/snippets")), Some(token))
        .json(draft)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn update_snippet(
    token: &str,
    id: i64,
    draft: &SnippetDraft,
) -> Result<Snippet, ApiError> {
    // Обновление идёт тем же POST, что и на сервере-прототипе, не PUT.
    let response = authorized(
        Request::post(&endpoint(&format!("/me/snippets/{id}"))),
        Some(token),
    )
    .json(draft)
    .map_err(|err| ApiError::Network(err.to_string()))?
    .send()
    .await
    .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    parse_json(response).await
}

pub(crate) async fn delete_snippet(token: &str, id: i64) -> Result<(), ApiError> {
    send_empty(authorized(
        Request::delete(&endpoint(&format!("/me/snippets/{id}"))),
        Some(token),
    ))
    .await
}

pub(crate) async fn save_snippet(token: &str, id: i64) -> Result<(), ApiError> {
    send_empty(authorized(
        Request::post(&endpoint(&format!("/saved-snippets/{id}"))),
        Some(token),
    ))
    .await
}

pub(crate) async fn unsave_snippet(token: &str, id: i64) -> Result<(), ApiError> {
    send_empty(authorized(
        Request::delete(&endpoint(&format!("/saved-snippets/{id}"))),
        Some(token),
    ))
    .await
}

pub(crate) async fn is_snippet_saved(token: &str, id: i64) -> Result<bool, ApiError> {
    let response = authorized(
        Request::get(&endpoint(&format!("/saved-snippets/{id}/is-saved"))),
        Some(token),
    )
    .send()
    .await
    .map_err(|err| ApiError::Network(err.to_string()))?;

    if !response.ok() {
        return Err(parse_error_body(response).await);
    }

    let body: IsSavedResponse = parse_json(response).await?;
    Ok(body.is_saved)
}
