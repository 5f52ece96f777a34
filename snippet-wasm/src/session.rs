//! Состояние сессии пользователя.
//!
//! `user` и `token` выставляются только вместе при успешном входе и
//! сбрасываются вместе при выходе или истечении авторизации, поэтому
//! `user != None` всегда влечёт `token != None`.

use crate::models::User;

/// Фиксированный текст ошибки входа.
pub(crate) const LOGIN_FAILED: &str = "Не удалось войти. Проверьте email и пароль.";
/// Фиксированный текст ошибки регистрации.
pub(crate) const REGISTER_FAILED: &str = "Не удалось зарегистрироваться. Проверьте данные формы.";

#[derive(Debug, Clone, Default)]
pub(crate) struct Session {
    user: Option<User>,
    token: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

impl Session {
    /// Восстанавливает токен из cookie при старте приложения.
    ///
    /// Пользователь пока неизвестен: его вернёт `refresh_self`.
    pub(crate) fn restore_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Начало входа/регистрации/обновления.
    pub(crate) fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Успешный вход или регистрация.
    pub(crate) fn authenticated(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.is_loading = false;
        self.error = None;
    }

    /// Неудачный вход или регистрация: `user`/`token` не меняются.
    pub(crate) fn failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    /// Ответ «кто я» по сохранённому токену.
    pub(crate) fn refreshed(&mut self, user: User) {
        if self.token.is_some() {
            self.user = Some(user);
        }
        self.is_loading = false;
        self.error = None;
    }

    /// Локальный выход: достаточно забыть токен.
    pub(crate) fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.is_loading = false;
        self.error = None;
    }

    /// Авторизация истекла (401): сессия завершена.
    pub(crate) fn expired(&mut self) {
        self.user = None;
        self.token = None;
        self.is_loading = false;
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.is_loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            email: "dev@example.com".to_string(),
            username: "ivanp".to_string(),
            position: None,
            company_name: None,
            company_website: None,
            is_active: true,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn login_success_sets_user_and_token_together() {
        let mut session = Session::default();
        session.begin();
        session.authenticated(sample_user(), "token".to_string());

        assert!(session.is_authenticated());
        assert!(session.user().is_some());
        assert!(session.error().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn login_failure_keeps_user_and_sets_error() {
        let mut session = Session::default();
        session.begin();
        session.failed(LOGIN_FAILED);

        assert!(session.user().is_none());
        assert!(session.token().is_none());
        assert_eq!(session.error(), Some(LOGIN_FAILED));
    }

    #[test]
    fn logout_clears_everything() {
        let mut session = Session::default();
        session.authenticated(sample_user(), "token".to_string());
        session.logout();

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn expired_clears_user_with_token() {
        let mut session = Session::default();
        session.authenticated(sample_user(), "token".to_string());
        session.expired();

        // user != None влечёт token != None — обе части сброшены вместе
        assert!(session.user().is_none());
        assert!(session.token().is_none());
    }

    #[test]
    fn refreshed_without_token_does_not_attach_user() {
        let mut session = Session::default();
        session.refreshed(sample_user());

        assert!(session.user().is_none());
    }

    #[test]
    fn last_response_wins() {
        let mut session = Session::default();
        session.begin();
        session.begin();
        session.failed(LOGIN_FAILED);
        session.authenticated(sample_user(), "token".to_string());

        // store не дедуплицирует параллельные запросы: применяется последний ответ
        assert!(session.is_authenticated());
        assert!(session.error().is_none());
    }
}
