use wasm_bindgen::JsCast;

const TOKEN_COOKIE: &str = "snippet_token";
// токен сессии живёт 7 дней
const TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn cookie_value(raw: &str, name: &str) -> Option<String> {
    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name { parse_token(value) } else { None }
    })
}

fn html_document() -> Option<web_sys::HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
}

pub(crate) fn load_token() -> Option<String> {
    let document = html_document()?;
    let raw = document.cookie().ok()?;
    cookie_value(&raw, TOKEN_COOKIE)
}

pub(crate) fn save_token(token: &str) -> Result<(), String> {
    let document = html_document().ok_or_else(|| "document is not available".to_string())?;

    document
        .set_cookie(&format!(
            "{TOKEN_COOKIE}={token}; Max-Age={TOKEN_TTL_SECONDS}; Path=/; SameSite=Lax"
        ))
        .map_err(|_| "failed to save token cookie".to_string())
}

pub(crate) fn clear_token() -> Result<(), String> {
    let document = html_document().ok_or_else(|| "document is not available".to_string())?;

    document
        .set_cookie(&format!("{TOKEN_COOKIE}=; Max-Age=0; Path=/"))
        .map_err(|_| "failed to clear token cookie".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_trims_and_returns_value() {
        let token = parse_token("  abc.def.ghi  ");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_rejects_blank() {
        assert!(parse_token("   ").is_none());
    }

    #[test]
    fn cookie_value_finds_named_cookie() {
        let raw = "theme=dark; snippet_token=abc.def.ghi; lang=ru";
        let token = cookie_value(raw, TOKEN_COOKIE);
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_value_returns_none_for_missing_cookie() {
        let raw = "theme=dark; lang=ru";
        assert!(cookie_value(raw, TOKEN_COOKIE).is_none());
    }

    #[test]
    fn cookie_value_ignores_empty_value() {
        let raw = "snippet_token=; theme=dark";
        assert!(cookie_value(raw, TOKEN_COOKIE).is_none());
    }
}
