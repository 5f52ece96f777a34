use reqwest::{Client, Method, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use validator::Validate;

use crate::error::{SnippetClientError, SnippetClientResult};
use crate::models::{
    ALL_LANGUAGES, Attachment, AuthSession, NewAccount, PaginationMeta, Snippet, SnippetDraft,
    SnippetPage, SnippetQuery, Tag, User,
};

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnippetDraftDto<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    content: &'a str,
    tags: &'a [String],
    programming_language: &'a str,
    is_public: bool,
}

impl<'a> From<&'a SnippetDraft> for SnippetDraftDto<'a> {
    fn from(draft: &'a SnippetDraft) -> Self {
        Self {
            title: &draft.title,
            description: draft.description.as_deref(),
            content: &draft.content,
            tags: &draft.tags,
            programming_language: &draft.programming_language,
            is_public: draft.is_public,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
    message: Option<String>,
    errors: Option<Vec<String>>,
}

impl ErrorResponseDto {
    /// Достаёт человекочитаемое сообщение из тела ошибки.
    ///
    /// Сервер отдаёт либо `errors: [..]`, либо `error`/`message`.
    fn into_message(self) -> Option<String> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            return Some(errors.join(", "));
        }
        self.error.or(self.message)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    username: String,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    company_website: Option<String>,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct TagDto {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnippetDto {
    id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    content: String,
    #[serde(default)]
    tags: Vec<TagDto>,
    programming_language: String,
    user_id: i64,
    user: UserDto,
    is_public: bool,
    #[serde(default)]
    view_count: u64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationDto {
    total: u64,
    page: u32,
    limit: u32,
    total_pages: u32,
    has_next_page: bool,
    has_prev_page: bool,
}

#[derive(Debug, Deserialize)]
struct SnippetPageDto {
    snippets: Vec<SnippetDto>,
    pagination: PaginationDto,
}

#[derive(Debug, Deserialize)]
struct AuthResponseDto {
    access_token: String,
    user: UserDto,
}

#[derive(Debug, Deserialize)]
struct MeResponseDto {
    user: UserDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IsSavedDto {
    is_saved: bool,
}

impl From<UserDto> for User {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            username: value.username,
            position: value.position,
            company_name: value.company_name,
            company_website: value.company_website,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<TagDto> for Tag {
    fn from(value: TagDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<SnippetDto> for Snippet {
    fn from(value: SnippetDto) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            content: value.content,
            tags: value.tags.into_iter().map(Tag::from).collect(),
            programming_language: value.programming_language,
            user_id: value.user_id,
            user: value.user.into(),
            is_public: value.is_public,
            view_count: value.view_count,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<PaginationDto> for PaginationMeta {
    fn from(value: PaginationDto) -> Self {
        // Флаги берём с сервера как есть, без пересчёта по page/total_pages.
        Self {
            total: value.total,
            page: value.page,
            limit: value.limit,
            total_pages: value.total_pages,
            has_next_page: value.has_next_page,
            has_prev_page: value.has_prev_page,
        }
    }
}

impl From<SnippetPageDto> for SnippetPage {
    fn from(value: SnippetPageDto) -> Self {
        Self {
            snippets: value.snippets.into_iter().map(Snippet::from).collect(),
            pagination: value.pagination.into(),
        }
    }
}

impl From<AuthResponseDto> for AuthSession {
    fn from(value: AuthResponseDto) -> Self {
        Self {
            access_token: value.access_token,
            user: value.user.into(),
        }
    }
}

/// Собирает query-параметры списка: `page`/`limit` всегда, фильтры — только
/// когда заданы; язык `"all"` означает отсутствие фильтра.
fn list_query_params(query: &SnippetQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.max(1).to_string()),
        ("limit", query.limit.to_string()),
    ];

    if let Some(search) = query.search.as_deref()
        && !search.is_empty()
    {
        params.push(("search", search.to_string()));
    }
    if let Some(language) = query.programming_language.as_deref()
        && !language.is_empty()
        && language != ALL_LANGUAGES
    {
        params.push(("programmingLanguage", language.to_string()));
    }
    if !query.tags.is_empty() {
        params.push(("tags", query.tags.join(",")));
    }

    params
}

fn multipart_form(draft: &SnippetDraft, attachment: &Attachment) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new()
        .text("title", draft.title.clone())
        .text("content", draft.content.clone())
        .text("programmingLanguage", draft.programming_language.clone())
        .text("isPublic", draft.is_public.to_string());

    if let Some(description) = &draft.description {
        form = form.text("description", description.clone());
    }
    if !draft.tags.is_empty() {
        form = form.text("tags", draft.tags.join(","));
    }

    let part =
        reqwest::multipart::Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
    form.part("file", part)
}

#[derive(Debug, Clone)]
/// HTTP-клиент для работы с REST API сервиса сниппетов.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт новый HTTP-клиент с базовым URL сервера.
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn decode_error(response: reqwest::Response) -> SnippetClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.into_message(),
            Err(_) => None,
        };
        SnippetClientError::from_http_status(status, message)
    }

    /// универсальный helper: отправляет запрос и декодирует JSON-ответ
    async fn execute<TRes>(&self, request: reqwest::RequestBuilder) -> SnippetClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(SnippetClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(SnippetClientError::from_reqwest)
    }

    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> SnippetClientResult<()> {
        let response = request
            .send()
            .await
            .map_err(SnippetClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(())
    }

    pub(crate) async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> SnippetClientResult<AuthSession> {
        let payload = LoginRequestDto { email, password };
        let dto: AuthResponseDto = self
            .execute(self.request(Method::POST, "/auth/login", None).json(&payload))
            .await?;
        Ok(dto.into())
    }

    pub(crate) async fn register(&self, account: &NewAccount) -> SnippetClientResult<AuthSession> {
        account.validate()?;
        let dto: AuthResponseDto = self
            .execute(
                self.request(Method::POST, "/auth/register", None)
                    .json(account),
            )
            .await?;
        Ok(dto.into())
    }

    pub(crate) async fn me(&self, token: Option<&str>) -> SnippetClientResult<User> {
        let dto: MeResponseDto = self.execute(self.request(Method::GET, "/me", token)).await?;
        Ok(dto.user.into())
    }

    pub(crate) async fn list_snippets(
        &self,
        token: Option<&str>,
        query: &SnippetQuery,
    ) -> SnippetClientResult<SnippetPage> {
        let dto: SnippetPageDto = self
            .execute(
                self.request(Method::GET, "/snippets", token)
                    .query(&list_query_params(query)),
            )
            .await?;
        Ok(dto.into())
    }

    pub(crate) async fn list_my_snippets(
        &self,
        token: Option<&str>,
        query: &SnippetQuery,
    ) -> SnippetClientResult<SnippetPage> {
        let dto: SnippetPageDto = self
            .execute(
                self.request(Method::GET, "/me/snippets", token)
                    .query(&list_query_params(query)),
            )
            .await?;
        Ok(dto.into())
    }

    pub(crate) async fn list_saved_snippets(
        &self,
        token: Option<&str>,
        page: u32,
        limit: u32,
    ) -> SnippetClientResult<SnippetPage> {
        let params = [
            ("page", page.max(1).to_string()),
            ("limit", limit.to_string()),
        ];
        let dto: SnippetPageDto = self
            .execute(
                self.request(Method::GET, "/saved-snippets", token)
                    .query(&params),
            )
            .await?;
        Ok(dto.into())
    }

    pub(crate) async fn get_snippet(
        &self,
        token: Option<&str>,
        id: i64,
    ) -> SnippetClientResult<Snippet> {
        let dto: SnippetDto = self
            .execute(self.request(Method::GET, &format!("/me/snippets/{id}"), token))
            .await?;
        Ok(dto.into())
    }

    pub(crate) async fn create_snippet(
        &self,
        token: Option<&str>,
        draft: &SnippetDraft,
        attachment: Option<&Attachment>,
    ) -> SnippetClientResult<Snippet> {
        draft.validate()?;

        let request = self.request(Method::POST, "/me/snippets", token);
        let request = match attachment {
            Some(attachment) => request.multipart(multipart_form(draft, attachment)),
            None => request.json(&SnippetDraftDto::from(draft)),
        };

        let dto: SnippetDto = self.execute(request).await?;
        Ok(dto.into())
    }

    pub(crate) async fn update_snippet(
        &self,
        token: Option<&str>,
        id: i64,
        draft: &SnippetDraft,
        attachment: Option<&Attachment>,
    ) -> SnippetClientResult<Snippet> {
        draft.validate()?;

        // Обновление идёт тем же POST, что и у сервера-прототипа, не PUT.
        let request = self.request(Method::POST, &format!("/me/snippets/{id}"), token);
        let request = match attachment {
            Some(attachment) => request.multipart(multipart_form(draft, attachment)),
            None => request.json(&SnippetDraftDto::from(draft)),
        };

        let dto: SnippetDto = self.execute(request).await?;
        Ok(dto.into())
    }

    pub(crate) async fn delete_snippet(
        &self,
        token: Option<&str>,
        id: i64,
    ) -> SnippetClientResult<()> {
        self.execute_empty(self.request(Method::DELETE, &format!("/me/snippets/{id}"), token))
            .await
    }

    pub(crate) async fn save_snippet(
        &self,
        token: Option<&str>,
        id: i64,
    ) -> SnippetClientResult<()> {
        self.execute_empty(self.request(Method::POST, &format!("/saved-snippets/{id}"), token))
            .await
    }

    pub(crate) async fn unsave_snippet(
        &self,
        token: Option<&str>,
        id: i64,
    ) -> SnippetClientResult<()> {
        self.execute_empty(self.request(Method::DELETE, &format!("/saved-snippets/{id}"), token))
            .await
    }

    pub(crate) async fn is_snippet_saved(
        &self,
        token: Option<&str>,
        id: i64,
    ) -> SnippetClientResult<bool> {
        let dto: IsSavedDto = self
            .execute(self.request(Method::GET, &format!("/saved-snippets/{id}/is-saved"), token))
            .await?;
        Ok(dto.is_saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = HttpClient::new("http://localhost:8080/");
        let full = client.endpoint("/snippets");
        assert_eq!(full, "http://localhost:8080/snippets");
    }

    #[test]
    fn default_query_sends_only_page_and_limit() {
        let params = list_query_params(&SnippetQuery::default());
        assert_eq!(
            params,
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn all_language_is_not_a_filter() {
        let query = SnippetQuery {
            programming_language: Some(ALL_LANGUAGES.to_string()),
            ..SnippetQuery::default()
        };
        let params = list_query_params(&query);
        assert!(params.iter().all(|(key, _)| *key != "programmingLanguage"));
    }

    #[test]
    fn full_query_joins_tags_with_comma() {
        let query = SnippetQuery {
            search: Some("hooks".to_string()),
            programming_language: Some("python".to_string()),
            tags: vec!["React".to_string(), "Hooks".to_string()],
            page: 2,
            limit: 20,
        };
        let params = list_query_params(&query);
        assert_eq!(
            params,
            vec![
                ("page", "2".to_string()),
                ("limit", "20".to_string()),
                ("search", "hooks".to_string()),
                ("programmingLanguage", "python".to_string()),
                ("tags", "React,Hooks".to_string()),
            ]
        );
    }

    #[test]
    fn zero_page_is_clamped_to_first() {
        let query = SnippetQuery {
            page: 0,
            ..SnippetQuery::default()
        };
        let params = list_query_params(&query);
        assert_eq!(params[0], ("page", "1".to_string()));
    }

    #[test]
    fn pagination_flags_are_passed_through_unmodified() {
        // Сервер — источник истины: даже противоречивые флаги не пересчитываются.
        let dto = PaginationDto {
            total: 42,
            page: 2,
            limit: 10,
            total_pages: 5,
            has_next_page: false,
            has_prev_page: false,
        };

        let mapped = PaginationMeta::from(dto);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.total_pages, 5);
        assert!(!mapped.has_next_page);
        assert!(!mapped.has_prev_page);
    }

    #[test]
    fn error_body_joins_errors_list() {
        let dto = ErrorResponseDto {
            error: None,
            message: None,
            errors: Some(vec!["title is required".to_string(), "content is required".to_string()]),
        };
        assert_eq!(
            dto.into_message().as_deref(),
            Some("title is required, content is required")
        );
    }

    #[test]
    fn error_body_falls_back_to_single_error_field() {
        let dto = ErrorResponseDto {
            error: Some("snippet not found".to_string()),
            message: None,
            errors: Some(vec![]),
        };
        assert_eq!(dto.into_message().as_deref(), Some("snippet not found"));
    }

    #[test]
    fn snippet_page_decodes_from_api_json() {
        let raw = r#"{
            "snippets": [{
                "id": 7,
                "title": "Debounce hook",
                "description": null,
                "content": "const useDebounce = () => {}",
                "tags": [{"id": 1, "name": "React"}, {"id": 2, "name": "Hooks"}],
                "programmingLanguage": "javascript",
                "userId": 3,
                "user": {
                    "id": 3,
                    "firstName": "Ivan",
                    "lastName": "Petrov",
                    "email": "dev@example.com",
                    "username": "ivanp",
                    "isActive": true,
                    "createdAt": "2026-01-01T00:00:00Z",
                    "updatedAt": "2026-01-01T00:00:00Z"
                },
                "isPublic": true,
                "viewCount": 12,
                "createdAt": "2026-01-02T00:00:00Z",
                "updatedAt": "2026-01-03T00:00:00Z"
            }],
            "pagination": {
                "total": 1,
                "page": 1,
                "limit": 10,
                "totalPages": 1,
                "hasNextPage": false,
                "hasPrevPage": false
            }
        }"#;

        let dto: SnippetPageDto = serde_json::from_str(raw).expect("page should decode");
        let page = SnippetPage::from(dto);

        assert!(page.snippets.len() <= page.pagination.limit as usize);
        assert_eq!(page.snippets[0].id, 7);
        assert_eq!(page.snippets[0].programming_language, "javascript");
        assert_eq!(page.snippets[0].tags[1].name, "Hooks");
        assert_eq!(page.snippets[0].user.username, "ivanp");
        assert_eq!(page.pagination.page, 1);
    }
}
