use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use snippet_client::{
    Attachment, AuthSession, NewAccount, Snippet, SnippetClient, SnippetClientError, SnippetDraft,
    SnippetPage, SnippetQuery, User,
};
use tracing_subscriber::{EnvFilter, fmt};

const TOKEN_FILE: &str = ".snippet_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "snippet-cli", version, about = "CLI клиент сервиса сниппетов")]
struct Cli {
    /// Адрес API-сервера (иначе SNIPPET_API_URL или значение по умолчанию).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Подробный лог запросов.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация аккаунта.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        company_website: Option<String>,
    },
    /// Вход по email и паролю.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: забыть сохранённый токен.
    Logout,
    /// Текущий пользователь.
    Me,
    /// Публичная лента сниппетов.
    List {
        #[arg(long)]
        search: Option<String>,
        /// Фильтр по языку; `all` — без фильтра.
        #[arg(long)]
        language: Option<String>,
        /// Метка; можно повторять или перечислять через запятую.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Сниппеты текущего пользователя (требует токен).
    Mine {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Сохранённые сниппеты (требует токен).
    Saved {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Получение сниппета по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Создание сниппета (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        content: String,
        #[arg(long)]
        language: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Показывать сниппет в публичной ленте.
        #[arg(long)]
        public: bool,
        /// Приложить файл: запрос уйдёт как multipart-форма.
        #[arg(long)]
        attach: Option<String>,
    },
    /// Обновление сниппета (требует токен).
    ///
    /// Не указанные поля берутся из текущей версии сниппета.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        public: Option<bool>,
        #[arg(long)]
        attach: Option<String>,
    },
    /// Удаление сниппета (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Добавить сниппет в сохранённые.
    Save {
        #[arg(long)]
        id: i64,
    },
    /// Убрать сниппет из сохранённых.
    Unsave {
        #[arg(long)]
        id: i64,
    },
    /// Проверить, сохранён ли сниппет.
    IsSaved {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let base_url = resolve_base_url(cli.server);
    tracing::debug!("base_url = {base_url}");

    let mut client = SnippetClient::new(base_url);

    if let Some(token) = load_token().context("не удалось прочитать .snippet_token")? {
        client.set_token(token);
    }

    match cli.command {
        Command::Register {
            email,
            password,
            first_name,
            last_name,
            username,
            position,
            company_name,
            company_website,
        } => {
            let account = NewAccount {
                email,
                password,
                first_name,
                last_name,
                username,
                position,
                company_name,
                company_website,
            };
            let auth = client
                .register(&account)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Регистрация успешна", &auth);
        }
        Command::Login { email, password } => {
            let auth = client
                .login(&email, &password)
                .await
                .map_err(map_client_error)?;
            persist_token(&client).context("не удалось сохранить токен")?;
            print_auth("Вход выполнен", &auth);
        }
        Command::Logout => {
            client.logout();
            clear_token_file().context("не удалось удалить .snippet_token")?;
            println!("Токен удалён");
        }
        Command::Me => {
            let user = client.me().await.map_err(map_client_error)?;
            print_user(&user);
        }
        Command::List {
            search,
            language,
            tags,
            page,
            limit,
        } => {
            let query = build_query(search, language, tags, page, limit);
            let page = client
                .list_snippets(&query)
                .await
                .map_err(map_client_error)?;
            print_page("Публичная лента", &page);
        }
        Command::Mine {
            search,
            language,
            tags,
            page,
            limit,
        } => {
            let query = build_query(search, language, tags, page, limit);
            let page = client
                .list_my_snippets(&query)
                .await
                .map_err(map_client_error)?;
            print_page("Мои сниппеты", &page);
        }
        Command::Saved { page, limit } => {
            let page = client
                .list_saved_snippets(page, limit)
                .await
                .map_err(map_client_error)?;
            print_page("Сохранённые сниппеты", &page);
        }
        Command::Get { id } => {
            let snippet = client.get_snippet(id).await.map_err(map_client_error)?;
            print_snippet("Сниппет", &snippet);
        }
        Command::Create {
            title,
            description,
            content,
            language,
            tags,
            public,
            attach,
        } => {
            let draft = SnippetDraft {
                title,
                description,
                content,
                tags: normalize_tags(tags),
                programming_language: language,
                is_public: public,
            };
            let attachment = load_attachment(attach.as_deref())?;
            let snippet = client
                .create_snippet(&draft, attachment.as_ref())
                .await
                .map_err(map_client_error)?;
            print_snippet("Сниппет создан", &snippet);
        }
        Command::Update {
            id,
            title,
            description,
            content,
            language,
            tags,
            public,
            attach,
        } => {
            // Не заданные поля берём из текущей версии: обновление всегда
            // отправляет запись целиком.
            let current = client.get_snippet(id).await.map_err(map_client_error)?;
            let tags = normalize_tags(tags);
            let draft = SnippetDraft {
                title: title.unwrap_or(current.title),
                description: description.or(current.description),
                content: content.unwrap_or(current.content),
                tags: if tags.is_empty() {
                    current.tags.into_iter().map(|tag| tag.name).collect()
                } else {
                    tags
                },
                programming_language: language.unwrap_or(current.programming_language),
                is_public: public.unwrap_or(current.is_public),
            };
            let attachment = load_attachment(attach.as_deref())?;
            let snippet = client
                .update_snippet(id, &draft, attachment.as_ref())
                .await
                .map_err(map_client_error)?;
            print_snippet("Сниппет обновлён", &snippet);
        }
        Command::Delete { id } => {
            client.delete_snippet(id).await.map_err(map_client_error)?;
            println!("Сниппет удалён: id={id}");
        }
        Command::Save { id } => {
            client.save_snippet(id).await.map_err(map_client_error)?;
            println!("Сниппет сохранён: id={id}");
        }
        Command::Unsave { id } => {
            client.unsave_snippet(id).await.map_err(map_client_error)?;
            println!("Сниппет убран из сохранённых: id={id}");
        }
        Command::IsSaved { id } => {
            let saved = client
                .is_snippet_saved(id)
                .await
                .map_err(map_client_error)?;
            println!("id={id} сохранён: {}", if saved { "да" } else { "нет" });
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn resolve_base_url(server: Option<String>) -> String {
    let raw = server
        .or_else(|| std::env::var("SNIPPET_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn build_query(
    search: Option<String>,
    language: Option<String>,
    tags: Vec<String>,
    page: u32,
    limit: u32,
) -> SnippetQuery {
    SnippetQuery {
        search,
        programming_language: language,
        tags: normalize_tags(tags),
        page,
        limit,
    }
}

/// Разворачивает `--tag a,b --tag c` в плоский список имён меток.
fn normalize_tags(raw: Vec<String>) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_attachment(path: Option<&str>) -> Result<Option<Attachment>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let bytes = fs::read(path).with_context(|| format!("не удалось прочитать файл {path}"))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("attachment")
        .to_string();

    Ok(Some(Attachment { file_name, bytes }))
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn persist_token(client: &SnippetClient) -> io::Result<()> {
    if let Some(token) = client.token() {
        fs::write(TOKEN_FILE, token)?;
    }
    Ok(())
}

fn clear_token_file() -> io::Result<()> {
    if Path::new(TOKEN_FILE).exists() {
        fs::remove_file(TOKEN_FILE)?;
    }
    Ok(())
}

fn map_client_error(err: SnippetClientError) -> anyhow::Error {
    let message = match err {
        SnippetClientError::AuthorizationExpired => {
            // Сессия закончилась: CLI владеет токеном и сам его забывает.
            if let Err(io_err) = clear_token_file() {
                tracing::warn!("не удалось удалить .snippet_token: {io_err}");
            }
            "сессия истекла: выполните `snippet-cli login ...` заново".to_string()
        }
        SnippetClientError::NotFound => "ресурс не найден".to_string(),
        SnippetClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        SnippetClientError::Validation(errors) => format!("данные не прошли проверку: {errors}"),
        SnippetClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_auth(title: &str, auth: &AuthSession) {
    println!("{title}");
    println!("token: {}", auth.access_token);
    print_user(&auth.user);
}

fn print_user(user: &User) {
    println!("user:");
    println!("  id: {}", user.id);
    println!("  name: {} {}", user.first_name, user.last_name);
    println!("  username: {}", user.username);
    println!("  email: {}", user.email);
    if let Some(position) = &user.position {
        println!("  position: {position}");
    }
    if let Some(company) = &user.company_name {
        println!("  company: {company}");
    }
    println!("  active: {}", user.is_active);
    println!("  created_at: {}", user.created_at);
}

fn print_snippet(title: &str, snippet: &Snippet) {
    println!("{title}");
    println!("id: {}", snippet.id);
    println!("title: {}", snippet.title);
    if let Some(description) = &snippet.description {
        println!("description: {description}");
    }
    println!("language: {}", snippet.programming_language);
    println!(
        "tags: {}",
        snippet
            .tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("public: {}", snippet.is_public);
    println!("views: {}", snippet.view_count);
    println!("author: {} (id={})", snippet.user.username, snippet.user_id);
    println!("updated_at: {}", snippet.updated_at);
    println!("---");
    println!("{}", snippet.content);
}

fn print_page(title: &str, page: &SnippetPage) {
    let pagination = &page.pagination;
    println!(
        "{title}: {} из {} (страница {}/{}, limit={})",
        page.snippets.len(),
        pagination.total,
        pagination.page,
        pagination.total_pages,
        pagination.limit
    );

    for snippet in &page.snippets {
        println!(
            "- [{}] {} ({}, автор {})",
            snippet.id, snippet.title, snippet.programming_language, snippet.user.username
        );
    }

    if pagination.has_next_page {
        println!("... есть следующая страница: --page {}", pagination.page + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8080".to_string());
        assert_eq!(s, "http://127.0.0.1:8080");
    }

    #[test]
    fn normalize_tags_splits_commas_and_trims() {
        let tags = normalize_tags(vec!["React, Hooks".to_string(), "Python".to_string()]);
        assert_eq!(tags, vec!["React", "Hooks", "Python"]);
    }

    #[test]
    fn normalize_tags_drops_empty_entries() {
        let tags = normalize_tags(vec![" ,,".to_string()]);
        assert!(tags.is_empty());
    }

    #[test]
    fn build_query_keeps_filters() {
        let query = build_query(
            Some("hooks".to_string()),
            Some("python".to_string()),
            vec!["React,Hooks".to_string()],
            2,
            20,
        );
        assert_eq!(query.search.as_deref(), Some("hooks"));
        assert_eq!(query.programming_language.as_deref(), Some("python"));
        assert_eq!(query.tags, vec!["React", "Hooks"]);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 20);
    }

    #[test]
    fn parse_token_content_trims_whitespace() {
        let token = parse_token_content("  abc.def.ghi  ");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        let token = parse_token_content("   ");
        assert!(token.is_none());
    }
}
