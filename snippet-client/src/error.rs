use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `snippet-client`.
pub enum SnippetClientError {
    /// Ошибка HTTP-транспорта (`reqwest`), включая таймауты.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Авторизация истекла или токен недействителен (HTTP 401).
    ///
    /// Клиент только сообщает об этом; удалить сохранённый токен должен
    /// владелец сессии (store во фронтенде, файл токена в CLI).
    #[error("authorization expired")]
    AuthorizationExpired,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос или бизнес-ошибка (остальные 4xx/5xx).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Локальная валидация не прошла; запрос на сервер не отправлялся.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Результат операций `snippet-client`.
pub type SnippetClientResult<T> = Result<T, SnippetClientError>;

impl SnippetClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::AuthorizationExpired,
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }

    /// Возвращает `true`, если ошибка означает истёкшую авторизацию.
    pub fn is_authorization_expired(&self) -> bool {
        matches!(self, Self::AuthorizationExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_authorization_expired() {
        let err = SnippetClientError::from_http_status(reqwest::StatusCode::UNAUTHORIZED, None);
        assert!(err.is_authorization_expired());
    }

    #[test]
    fn status_404_maps_to_not_found() {
        let err = SnippetClientError::from_http_status(reqwest::StatusCode::NOT_FOUND, None);
        assert!(matches!(err, SnippetClientError::NotFound));
    }

    #[test]
    fn status_403_keeps_server_message() {
        let err = SnippetClientError::from_http_status(
            reqwest::StatusCode::FORBIDDEN,
            Some("snippet belongs to another user".to_string()),
        );
        match err {
            SnippetClientError::InvalidRequest(message) => {
                assert_eq!(message, "snippet belongs to another user");
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn status_500_without_body_uses_fallback() {
        let err = SnippetClientError::from_http_status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            None,
        );
        match err {
            SnippetClientError::InvalidRequest(message) => {
                assert_eq!(message, "http status 500 Internal Server Error");
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }
}
