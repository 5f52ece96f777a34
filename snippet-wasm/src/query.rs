//! Фильтры поиска и их отображение в query-строку адресной строки.

/// Язык-сентинел «без фильтра по языку».
pub(crate) const ALL_LANGUAGES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchFilters {
    pub(crate) search: String,
    pub(crate) programming_language: String,
    pub(crate) tags: Vec<String>,
    pub(crate) page: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            programming_language: ALL_LANGUAGES.to_string(),
            tags: Vec::new(),
            page: 1,
        }
    }
}

impl SearchFilters {
    /// Сабмит поиска всегда начинается с первой страницы.
    pub(crate) fn first_page(mut self) -> Self {
        self.page = 1;
        self
    }

    /// Смена страницы с сохранением остальных фильтров.
    pub(crate) fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    fn has_language_filter(&self) -> bool {
        !self.programming_language.is_empty() && self.programming_language != ALL_LANGUAGES
    }

    /// Query-строка для адресной строки.
    ///
    /// Дефолтные значения опускаются: пустой поиск, язык `all`, пустые
    /// метки. `page` присутствует всегда.
    pub(crate) fn to_query_string(&self) -> String {
        let mut parts = Vec::new();

        if !self.search.is_empty() {
            parts.push(format!("search={}", encode_component(&self.search)));
        }
        if self.has_language_filter() {
            parts.push(format!(
                "programmingLanguage={}",
                encode_component(&self.programming_language)
            ));
        }
        if !self.tags.is_empty() {
            let tags = self
                .tags
                .iter()
                .map(|tag| encode_component(tag))
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("tags={tags}"));
        }
        parts.push(format!("page={}", self.page.max(1)));

        format!("?{}", parts.join("&"))
    }

    /// Query-строка запроса к API: те же правила опускания плюс `limit`.
    pub(crate) fn to_api_query(&self, limit: u32) -> String {
        let mut query = self.to_query_string();
        query.push_str(&format!("&limit={limit}"));
        query
    }

    /// Восстанавливает фильтры из query-строки (`location.search`).
    ///
    /// Неизвестные ключи игнорируются, битые значения заменяются дефолтами.
    pub(crate) fn from_query_string(raw: &str) -> Self {
        let mut filters = Self::default();

        for pair in raw.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            match key {
                "search" => filters.search = value,
                "programmingLanguage" => {
                    if !value.is_empty() {
                        filters.programming_language = value;
                    }
                }
                "tags" => {
                    filters.tags = value
                        .split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "page" => filters.page = value.parse().unwrap_or(1).max(1),
                _ => {}
            }
        }

        filters
    }
}

/// Разбирает пользовательский ввод «метки через запятую» в список имён.
pub(crate) fn parse_tags_input(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Экранирует символы, ломающие query-строку. Запятая остаётся как есть:
/// ею склеиваются метки в `tags=React,Hooks`.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '#' => out.push_str("%23"),
            '+' => out.push_str("%2B"),
            '?' => out.push_str("%3F"),
            _ => out.push(ch),
        }
    }
    out
}

fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hex = |byte: u8| (byte as char).to_digit(16);
                match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi * 16 + lo) as u8);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_only_produces_search_and_page() {
        let filters = SearchFilters {
            search: "hooks".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(filters.to_query_string(), "?search=hooks&page=1");
    }

    #[test]
    fn language_and_tags_keep_literal_commas() {
        let filters = SearchFilters {
            programming_language: "python".to_string(),
            tags: vec!["React".to_string(), "Hooks".to_string()],
            ..SearchFilters::default()
        };
        assert_eq!(
            filters.to_query_string(),
            "?programmingLanguage=python&tags=React,Hooks&page=1"
        );
    }

    #[test]
    fn all_language_is_omitted() {
        let filters = SearchFilters {
            programming_language: ALL_LANGUAGES.to_string(),
            page: 3,
            ..SearchFilters::default()
        };
        assert_eq!(filters.to_query_string(), "?page=3");
    }

    #[test]
    fn search_text_is_escaped() {
        let filters = SearchFilters {
            search: "debounce hook".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(filters.to_query_string(), "?search=debounce%20hook&page=1");
    }

    #[test]
    fn api_query_appends_limit() {
        let filters = SearchFilters {
            search: "hooks".to_string(),
            ..SearchFilters::default()
        };
        assert_eq!(filters.to_api_query(10), "?search=hooks&page=1&limit=10");
    }

    #[test]
    fn round_trip_restores_filters() {
        let filters = SearchFilters {
            search: "debounce hook".to_string(),
            programming_language: "javascript".to_string(),
            tags: vec!["React".to_string(), "Hooks".to_string()],
            page: 4,
        };

        let restored = SearchFilters::from_query_string(&filters.to_query_string());
        assert_eq!(restored, filters);
    }

    #[test]
    fn from_query_string_ignores_unknown_keys() {
        let filters = SearchFilters::from_query_string("?utm_source=x&page=2");
        assert_eq!(filters.page, 2);
        assert_eq!(filters.search, "");
        assert_eq!(filters.programming_language, ALL_LANGUAGES);
    }

    #[test]
    fn from_query_string_defaults_bad_page() {
        let filters = SearchFilters::from_query_string("?page=zero");
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn first_page_resets_page_only() {
        let filters = SearchFilters {
            search: "hooks".to_string(),
            page: 7,
            ..SearchFilters::default()
        }
        .first_page();
        assert_eq!(filters.page, 1);
        assert_eq!(filters.search, "hooks");
    }

    #[test]
    fn parse_tags_input_trims_and_drops_empty() {
        assert_eq!(parse_tags_input("React, Hooks ,,"), vec!["React", "Hooks"]);
        assert!(parse_tags_input("  ").is_empty());
    }

    #[test]
    fn decode_handles_percent_and_plus() {
        assert_eq!(decode_component("debounce%20hook"), "debounce hook");
        assert_eq!(decode_component("a+b"), "a b");
        assert_eq!(decode_component("100%25"), "100%");
        // обрезанный escape не должен паниковать
        assert_eq!(decode_component("%2"), "%2");
    }
}
