use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::actions;
use crate::models::RegisterRequest;
use crate::state::AppState;

#[component]
pub(crate) fn AuthPanel() -> impl IntoView {
    let state = AppState::expect();

    let login_email = RwSignal::new(String::new());
    let login_password = RwSignal::new(String::new());

    let reg_email = RwSignal::new(String::new());
    let reg_password = RwSignal::new(String::new());
    let reg_first_name = RwSignal::new(String::new());
    let reg_last_name = RwSignal::new(String::new());
    let reg_username = RwSignal::new(String::new());

    // ошибки валидации формы не доходят до store
    let form_error = RwSignal::new(None::<&'static str>);

    let on_login = move |ev: SubmitEvent| {
        ev.prevent_default();
        form_error.set(None);

        let email = login_email.get().trim().to_string();
        let password = login_password.get();

        if email.is_empty() || password.is_empty() {
            form_error.set(Some("Заполните email и пароль"));
            return;
        }

        actions::login(state, email, password);
    };

    let on_register = move |ev: SubmitEvent| {
        ev.prevent_default();
        form_error.set(None);

        let payload = RegisterRequest {
            email: reg_email.get().trim().to_string(),
            password: reg_password.get(),
            first_name: reg_first_name.get().trim().to_string(),
            last_name: reg_last_name.get().trim().to_string(),
            username: reg_username.get().trim().to_string(),
        };

        if payload.email.is_empty()
            || payload.password.is_empty()
            || payload.first_name.is_empty()
            || payload.last_name.is_empty()
            || payload.username.is_empty()
        {
            form_error.set(Some("Заполните все поля регистрации"));
            return;
        }

        actions::register(state, payload);
    };

    let session_error = move || {
        state
            .session
            .with(|session| session.error().map(str::to_string))
    };
    let is_loading = move || state.session.with(|session| session.is_loading());

    view! {
        <Show when=move || state.is_authenticated()>
            <button on:click=move |_| actions::logout(state) disabled=is_loading>
                "Выйти"
            </button>
        </Show>

        <Show when=move || !state.is_authenticated()>
            <h2>"Вход"</h2>
            <form on:submit=on_login>
                <input
                    placeholder="email"
                    on:input=move |ev| login_email.set(event_target_value(&ev))
                />
                <input
                    placeholder="пароль"
                    type="password"
                    on:input=move |ev| login_password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=is_loading>"Войти"</button>
            </form>

            <h2 style="margin-top: 1rem;">"Регистрация"</h2>
            <form on:submit=on_register>
                <input
                    placeholder="email"
                    on:input=move |ev| reg_email.set(event_target_value(&ev))
                />
                <input
                    placeholder="пароль"
                    type="password"
                    on:input=move |ev| reg_password.set(event_target_value(&ev))
                />
                <input
                    placeholder="имя"
                    on:input=move |ev| reg_first_name.set(event_target_value(&ev))
                />
                <input
                    placeholder="фамилия"
                    on:input=move |ev| reg_last_name.set(event_target_value(&ev))
                />
                <input
                    placeholder="логин"
                    on:input=move |ev| reg_username.set(event_target_value(&ev))
                />
                <button type="submit" disabled=is_loading>"Зарегистрироваться"</button>
            </form>
        </Show>

        // ошибки аутентификации показываются рядом с формой, не тостом
        <Show when=move || form_error.get().is_some() || session_error().is_some()>
            <div class="error-banner">
                <strong>"Ошибка: "</strong>
                {move || {
                    form_error
                        .get()
                        .map(str::to_string)
                        .or_else(session_error)
                        .unwrap_or_default()
                }}
            </div>
        </Show>

        <hr style="margin: 1rem 0;" />
    }
}
