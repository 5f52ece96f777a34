use std::time::{SystemTime, UNIX_EPOCH};

use snippet_client::{
    NewAccount, SnippetClient, SnippetClientError, SnippetDraft, SnippetQuery,
};

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock must be after unix epoch")
        .as_nanos();
    format!("{nanos}")
}

fn account(suffix: &str) -> NewAccount {
    NewAccount {
        email: format!("smoke_{suffix}@example.com"),
        password: "password123".to_string(),
        first_name: "Smoke".to_string(),
        last_name: "Test".to_string(),
        username: format!("smoke_{suffix}"),
        position: None,
        company_name: None,
        company_website: None,
    }
}

fn draft(title: &str) -> SnippetDraft {
    SnippetDraft {
        title: title.to_string(),
        description: Some("smoke test snippet".to_string()),
        content: "fn main() { println!(\"hello\"); }".to_string(),
        tags: vec!["Rust".to_string(), "Smoke".to_string()],
        programming_language: "rust".to_string(),
        is_public: true,
    }
}

#[tokio::test]
#[ignore = "requires running HTTP API"]
async fn http_smoke_flow() {
    let base_url =
        std::env::var("SNIPPET_HTTP_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let mut client = SnippetClient::new(base_url);

    let suffix = unique_suffix();
    let new_account = account(&suffix);

    let register = client
        .register(&new_account)
        .await
        .expect("register must succeed");
    assert!(!register.access_token.is_empty());
    assert_eq!(register.user.email, new_account.email);
    assert!(client.is_authenticated());

    let login = client
        .login(&new_account.email, &new_account.password)
        .await
        .expect("login must succeed");
    assert!(!login.access_token.is_empty());
    assert_eq!(login.user.username, new_account.username);

    let me = client.me().await.expect("me must succeed");
    assert_eq!(me.id, login.user.id);

    let created = client
        .create_snippet(&draft("smoke title"), None)
        .await
        .expect("create_snippet must succeed");
    assert_eq!(created.title, "smoke title");
    assert_eq!(created.user_id, me.id);

    let fetched = client
        .get_snippet(created.id)
        .await
        .expect("get_snippet must succeed");
    assert_eq!(fetched.id, created.id);

    let mine = client
        .list_my_snippets(&SnippetQuery::default())
        .await
        .expect("list_my_snippets must succeed");
    assert!(mine.snippets.len() <= mine.pagination.limit as usize);
    assert!(mine.pagination.page >= 1);
    assert!(mine.snippets.iter().any(|snippet| snippet.id == created.id));

    let searched = client
        .list_my_snippets(&SnippetQuery {
            search: Some("smoke".to_string()),
            ..SnippetQuery::default()
        })
        .await
        .expect("search must succeed");
    assert!(
        searched
            .snippets
            .iter()
            .any(|snippet| snippet.id == created.id)
    );

    let updated = client
        .update_snippet(created.id, &draft("smoke title updated"), None)
        .await
        .expect("update_snippet must succeed");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "smoke title updated");

    client
        .save_snippet(created.id)
        .await
        .expect("save_snippet must succeed");
    assert!(
        client
            .is_snippet_saved(created.id)
            .await
            .expect("is_snippet_saved must succeed")
    );

    let saved = client
        .list_saved_snippets(1, 10)
        .await
        .expect("list_saved_snippets must succeed");
    assert!(saved.snippets.iter().any(|snippet| snippet.id == created.id));

    client
        .unsave_snippet(created.id)
        .await
        .expect("unsave_snippet must succeed");
    assert!(
        !client
            .is_snippet_saved(created.id)
            .await
            .expect("is_snippet_saved must succeed")
    );

    client
        .delete_snippet(created.id)
        .await
        .expect("delete_snippet must succeed");

    // Повторная выборка после удаления уже не содержит сниппет.
    let after_delete = client
        .list_my_snippets(&SnippetQuery::default())
        .await
        .expect("list_my_snippets must succeed");
    assert!(
        after_delete
            .snippets
            .iter()
            .all(|snippet| snippet.id != created.id)
    );

    let missing = client.get_snippet(created.id).await;
    assert!(matches!(missing, Err(SnippetClientError::NotFound)));
}

#[tokio::test]
#[ignore = "requires running HTTP API"]
async fn expired_token_maps_to_authorization_expired() {
    let base_url =
        std::env::var("SNIPPET_HTTP_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let mut client = SnippetClient::new(base_url);
    client.set_token("definitely-not-a-valid-token");

    let result = client.me().await;
    match result {
        Err(err) => assert!(err.is_authorization_expired()),
        Ok(_) => panic!("me with a bogus token must fail"),
    }
}
