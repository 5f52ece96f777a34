//! Клиентская библиотека для работы с REST API сервиса сниппетов по HTTP.
//!
//! Предоставляет единый API (`SnippetClient`) поверх `reqwest`:
//! аутентификация, публичная лента, собственные и сохранённые сниппеты,
//! CRUD и избранное.
//!
//! Клиент хранит bearer-токен после `register`/`login` и автоматически
//! подставляет его в запросы. Предварительной проверки авторизации нет:
//! защищённые операции уходят на сервер как есть, а 401 возвращается
//! наверх отдельным видом ошибки (`AuthorizationExpired`), чтобы владелец
//! сессии сам сбросил сохранённый токен.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{SnippetClientError, SnippetClientResult};
pub use models::{
    ALL_LANGUAGES, Attachment, AuthSession, NewAccount, PaginationMeta, Snippet, SnippetDraft,
    SnippetPage, SnippetQuery, Tag, User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент REST API сервиса сниппетов.
pub struct SnippetClient {
    http: HttpClient,
    token: Option<String>,
}

impl SnippetClient {
    /// Создаёт клиент с базовым URL сервера, например `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
            token: None,
        }
    }

    /// Устанавливает bearer-токен вручную (например, восстановленный
    /// из сохранённой сессии).
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий токен, если он установлен.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Возвращает `true`, если у клиента есть токен сессии.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Выполняет вход и сохраняет полученный токен в клиенте.
    pub async fn login(&mut self, email: &str, password: &str) -> SnippetClientResult<AuthSession> {
        let auth = self.http.login(email, password).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    /// Регистрирует аккаунт и сохраняет полученный токен в клиенте.
    ///
    /// Данные проверяются локально до отправки запроса.
    pub async fn register(&mut self, account: &NewAccount) -> SnippetClientResult<AuthSession> {
        let auth = self.http.register(account).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    /// Завершает сессию на клиенте.
    ///
    /// Операция локальная и всегда успешна: сервер не хранит состояние
    /// сессии, достаточно забыть токен.
    pub fn logout(&mut self) {
        self.token = None;
    }

    /// Возвращает текущего пользователя по сохранённому токену.
    pub async fn me(&self) -> SnippetClientResult<User> {
        self.http.me(self.token.as_deref()).await
    }

    /// Возвращает страницу публичной ленты сниппетов.
    pub async fn list_snippets(&self, query: &SnippetQuery) -> SnippetClientResult<SnippetPage> {
        self.http.list_snippets(self.token.as_deref(), query).await
    }

    /// Возвращает страницу сниппетов текущего пользователя.
    ///
    /// Авторизацию проверяет сервер; без токена вернётся
    /// `AuthorizationExpired`.
    pub async fn list_my_snippets(&self, query: &SnippetQuery) -> SnippetClientResult<SnippetPage> {
        self.http
            .list_my_snippets(self.token.as_deref(), query)
            .await
    }

    /// Возвращает страницу сохранённых сниппетов.
    pub async fn list_saved_snippets(
        &self,
        page: u32,
        limit: u32,
    ) -> SnippetClientResult<SnippetPage> {
        self.http
            .list_saved_snippets(self.token.as_deref(), page, limit)
            .await
    }

    /// Возвращает сниппет по идентификатору.
    pub async fn get_snippet(&self, id: i64) -> SnippetClientResult<Snippet> {
        self.http.get_snippet(self.token.as_deref(), id).await
    }

    /// Создаёт сниппет. С вложением запрос уходит как multipart-форма.
    pub async fn create_snippet(
        &self,
        draft: &SnippetDraft,
        attachment: Option<&Attachment>,
    ) -> SnippetClientResult<Snippet> {
        self.http
            .create_snippet(self.token.as_deref(), draft, attachment)
            .await
    }

    /// Обновляет сниппет, отправляя запись целиком.
    pub async fn update_snippet(
        &self,
        id: i64,
        draft: &SnippetDraft,
        attachment: Option<&Attachment>,
    ) -> SnippetClientResult<Snippet> {
        self.http
            .update_snippet(self.token.as_deref(), id, draft, attachment)
            .await
    }

    /// Удаляет сниппет по идентификатору.
    pub async fn delete_snippet(&self, id: i64) -> SnippetClientResult<()> {
        self.http.delete_snippet(self.token.as_deref(), id).await
    }

    /// Добавляет сниппет в сохранённые.
    pub async fn save_snippet(&self, id: i64) -> SnippetClientResult<()> {
        self.http.save_snippet(self.token.as_deref(), id).await
    }

    /// Убирает сниппет из сохранённых.
    pub async fn unsave_snippet(&self, id: i64) -> SnippetClientResult<()> {
        self.http.unsave_snippet(self.token.as_deref(), id).await
    }

    /// Проверяет, сохранён ли сниппет текущим пользователем.
    pub async fn is_snippet_saved(&self, id: i64) -> SnippetClientResult<bool> {
        self.http.is_snippet_saved(self.token.as_deref(), id).await
    }
}
