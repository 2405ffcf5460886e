//! PostgreSQL repository tests. Run with `DATABASE_URL` set and `--ignored`.

use shortener_gateway::domain::entities::NewShortLink;
use shortener_gateway::domain::repositories::LinkRepository;
use shortener_gateway::error::StoreError;
use shortener_gateway::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

async fn create_test_link(pool: &PgPool, code: &str, url: &str) {
    sqlx::query("INSERT INTO short_links (code, long_url) VALUES ($1, $2)")
        .bind(code)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_insert_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo
        .insert(NewShortLink::new("test123", "https://example.com"))
        .await;

    assert!(result.is_ok());
    let link = result.unwrap();
    assert_eq!(link.code, "test123");
    assert_eq!(link.long_url, "https://example.com");
    assert!(link.id > 0);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_insert_duplicate_code(pool: PgPool) {
    create_test_link(&pool, "taken1", "https://example.com/1").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo
        .insert(NewShortLink::new("taken1", "https://example.com/2"))
        .await;

    match result {
        Err(StoreError::Duplicate { code }) => assert_eq!(code, "taken1"),
        other => panic!("expected duplicate, got {:?}", other),
    }
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_find_by_code(pool: PgPool) {
    create_test_link(&pool, "abc123", "https://example.com").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_code("abc123").await.unwrap();

    assert!(link.is_some());
    assert_eq!(link.unwrap().long_url, "https://example.com");
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_find_by_code_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_code("notfound").await.unwrap();

    assert!(link.is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_list_window(pool: PgPool) {
    for i in 1..=5 {
        create_test_link(&pool, &format!("code{}", i), "https://example.com").await;
    }
    let repo = PgLinkRepository::new(Arc::new(pool));

    let links = repo.list(1, 2).await.unwrap();

    let codes: Vec<_> = links.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["code2", "code3"]);
    assert_eq!(repo.count().await.unwrap(), 5);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_health_check(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.health_check().await);
}
