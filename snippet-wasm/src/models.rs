use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) position: Option<String>,
    #[serde(default)]
    pub(crate) company_name: Option<String>,
    #[serde(default)]
    pub(crate) company_website: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Tag {
    pub(crate) id: i64,
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    pub(crate) id: i64,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) tags: Vec<Tag>,
    pub(crate) programming_language: String,
    pub(crate) user_id: i64,
    pub(crate) user: User,
    pub(crate) is_public: bool,
    #[serde(default)]
    pub(crate) view_count: u64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

/// Метаданные пагинации приходят с сервера и передаются дальше как есть,
/// без пересчёта `has_next_page`/`has_prev_page` на клиенте.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaginationMeta {
    pub(crate) total: u64,
    pub(crate) page: u32,
    pub(crate) limit: u32,
    pub(crate) total_pages: u32,
    pub(crate) has_next_page: bool,
    pub(crate) has_prev_page: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SnippetPage {
    pub(crate) snippets: Vec<Snippet>,
    pub(crate) pagination: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponse {
    pub(crate) access_token: String,
    pub(crate) user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MeResponse {
    pub(crate) user: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IsSavedResponse {
    pub(crate) is_saved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
}

/// Полная запись сниппета: и создание, и обновление отправляют её целиком.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SnippetDraft {
    pub(crate) title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) content: String,
    pub(crate) tags: Vec<String>,
    pub(crate) programming_language: String,
    pub(crate) is_public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_decodes_from_api_json() {
        let raw = r#"{
            "id": 7,
            "title": "Debounce hook",
            "content": "const useDebounce = () => {}",
            "tags": [{"id": 1, "name": "React"}],
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
        }"#;

        let snippet: Snippet = serde_json::from_str(raw).expect("snippet should decode");
        assert_eq!(snippet.id, 7);
        assert_eq!(snippet.programming_language, "javascript");
        assert_eq!(snippet.tags[0].name, "React");
        assert!(snippet.description.is_none());
        assert_eq!(snippet.user.username, "ivanp");
    }

    #[test]
    fn pagination_meta_decodes_camel_case() {
        let raw = r#"{
            "total": 42,
            "page": 2,
            "limit": 10,
            "totalPages": 5,
            "hasNextPage": true,
            "hasPrevPage": true
        }"#;

        let meta: PaginationMeta = serde_json::from_str(raw).expect("meta should decode");
        assert_eq!(meta.total, 42);
        assert_eq!(meta.total_pages, 5);
        assert!(meta.has_next_page);
    }

    #[test]
    fn snippet_draft_serializes_camel_case() {
        let draft = SnippetDraft {
            title: "t".to_string(),
            description: None,
            content: "c".to_string(),
            tags: vec!["React".to_string()],
            programming_language: "javascript".to_string(),
            is_public: true,
        };

        let json = serde_json::to_string(&draft).expect("draft should serialize");
        assert!(json.contains("\"programmingLanguage\":\"javascript\""));
        assert!(json.contains("\"isPublic\":true"));
        assert!(!json.contains("description"));
    }
}
