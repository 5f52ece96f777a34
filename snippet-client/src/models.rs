use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Язык-сентинел «без фильтра по языку».
pub const ALL_LANGUAGES: &str = "all";

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Имя.
    pub first_name: String,
    /// Фамилия.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Логин.
    pub username: String,
    /// Должность.
    pub position: Option<String>,
    /// Название компании.
    pub company_name: Option<String>,
    /// Сайт компании.
    pub company_website: Option<String>,
    /// Подтверждён ли аккаунт.
    pub is_active: bool,
    /// Дата и время создания пользователя (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления профиля (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Метка сниппета. Идентификаторы назначает сервер, порядок меток не значим.
pub struct Tag {
    /// Идентификатор метки.
    pub id: i64,
    /// Имя метки.
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель сниппета.
pub struct Snippet {
    /// Идентификатор сниппета.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Описание.
    pub description: Option<String>,
    /// Текст сниппета.
    pub content: String,
    /// Метки.
    pub tags: Vec<Tag>,
    /// Язык программирования.
    pub programming_language: String,
    /// Идентификатор владельца.
    pub user_id: i64,
    /// Владелец сниппета.
    pub user: User,
    /// Доступен ли сниппет в публичной ленте.
    pub is_public: bool,
    /// Счётчик просмотров.
    pub view_count: u64,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Метаданные пагинации, вычисленные сервером.
///
/// Флаги `has_next_page`/`has_prev_page` передаются как есть: клиент не
/// пересчитывает их по `page`/`total_pages`.
pub struct PaginationMeta {
    /// Общее количество элементов в выборке.
    pub total: u64,
    /// Номер текущей страницы (с единицы).
    pub page: u32,
    /// Размер страницы.
    pub limit: u32,
    /// Количество страниц.
    pub total_pages: u32,
    /// Есть ли следующая страница.
    pub has_next_page: bool,
    /// Есть ли предыдущая страница.
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Одна страница списка сниппетов вместе с метаданными пагинации.
pub struct SnippetPage {
    /// Сниппеты текущей страницы.
    pub snippets: Vec<Snippet>,
    /// Метаданные пагинации.
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthSession {
    /// Bearer-токен сессии.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Validate, Serialize)]
#[serde(rename_all = "camelCase")]
/// Данные для регистрации нового аккаунта.
///
/// Проверяются локально перед отправкой запроса.
pub struct NewAccount {
    /// Email.
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    /// Пароль (не короче 8 символов).
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    /// Имя.
    #[validate(length(min = 1, message = "first name must not be empty"))]
    pub first_name: String,
    /// Фамилия.
    #[validate(length(min = 1, message = "last name must not be empty"))]
    pub last_name: String,
    /// Логин.
    #[validate(length(min = 3, max = 30, message = "username must be 3..=30 characters"))]
    pub username: String,
    /// Должность.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Название компании.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Сайт компании.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "company website must be a valid url"))]
    pub company_website: Option<String>,
}

#[derive(Debug, Clone, Validate)]
/// Полная запись сниппета для создания или обновления.
///
/// Обновление всегда отправляет запись целиком, без частичного merge.
pub struct SnippetDraft {
    /// Заголовок.
    #[validate(length(min = 1, max = 150, message = "title must be 1..=150 characters"))]
    pub title: String,
    /// Описание.
    pub description: Option<String>,
    /// Текст сниппета.
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    /// Имена меток.
    pub tags: Vec<String>,
    /// Язык программирования.
    #[validate(length(min = 1, message = "programming language must not be empty"))]
    pub programming_language: String,
    /// Показывать ли сниппет в публичной ленте.
    pub is_public: bool,
}

#[derive(Debug, Clone)]
/// Файл, прикладываемый к сниппету при создании или обновлении.
///
/// С вложением запрос уходит в multipart-кодировке вместо JSON.
pub struct Attachment {
    /// Имя файла.
    pub file_name: String,
    /// Содержимое файла.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
/// Параметры поиска и пагинации для списков сниппетов.
///
/// `page` и `limit` отправляются всегда; `search`, язык и метки — только
/// когда заданы. `programming_language == "all"` означает «без фильтра».
pub struct SnippetQuery {
    /// Строка поиска.
    pub search: Option<String>,
    /// Фильтр по языку программирования.
    pub programming_language: Option<String>,
    /// Фильтр по именам меток.
    pub tags: Vec<String>,
    /// Номер страницы (с единицы).
    pub page: u32,
    /// Размер страницы.
    pub limit: u32,
}

impl Default for SnippetQuery {
    fn default() -> Self {
        Self {
            search: None,
            programming_language: None,
            tags: Vec::new(),
            page: 1,
            limit: 10,
        }
    }
}

impl SnippetQuery {
    /// Возвращает копию запроса с другим номером страницы.
    ///
    /// Остальные фильтры сохраняются без изменений.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_account() -> NewAccount {
        NewAccount {
            email: "dev@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            username: "ivanp".to_string(),
            position: None,
            company_name: None,
            company_website: None,
        }
    }

    fn valid_draft() -> SnippetDraft {
        SnippetDraft {
            title: "Debounce hook".to_string(),
            description: None,
            content: "const useDebounce = () => {}".to_string(),
            tags: vec!["React".to_string(), "Hooks".to_string()],
            programming_language: "javascript".to_string(),
            is_public: true,
        }
    }

    #[test]
    fn new_account_validates() {
        assert!(valid_account().validate().is_ok());
    }

    #[test]
    fn new_account_rejects_bad_email() {
        let mut account = valid_account();
        account.email = "not-an-email".to_string();
        assert!(account.validate().is_err());
    }

    #[test]
    fn new_account_rejects_short_password() {
        let mut account = valid_account();
        account.password = "1234567".to_string();
        assert!(account.validate().is_err());
    }

    #[test]
    fn new_account_rejects_bad_company_website() {
        let mut account = valid_account();
        account.company_website = Some("not a url".to_string());
        assert!(account.validate().is_err());
    }

    #[test]
    fn snippet_draft_validates() {
        assert!(valid_draft().validate().is_ok());
    }

    #[test]
    fn snippet_draft_rejects_empty_title() {
        let mut draft = valid_draft();
        draft.title = String::new();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn snippet_draft_rejects_empty_content() {
        let mut draft = valid_draft();
        draft.content = String::new();
        assert!(draft.validate().is_err());
    }

    #[test]
    fn with_page_clamps_to_one() {
        let query = SnippetQuery::default().with_page(0);
        assert_eq!(query.page, 1);
    }
}
