use reqwest::StatusCode;
use serde_json::{Value, json};
use userdesk::domain::readers::Reader;

use crate::helpers::{TestApp, error_code, json_body, seed, spawn_app};

async fn seed_library(app: &TestApp) {
    seed(
        app,
        &json!({
            "accounts": [
                {"username": "ann", "email": "ann@example.com", "password": "pw"},
                {"username": "bob", "email": "bob@example.com", "password": "pw"}
            ],
            "author_profiles": [
                {"username": "ann", "bio": "Writes novels", "website": "https://ann.example"},
                {"username": "bob", "bio": "Poet"}
            ],
            "books": [
                {"title": "First Light", "author": "ann"},
                {"title": "Second Wind", "author": "ann"},
                {"title": "Verses", "author": "bob"}
            ],
            "readers": [
                {"name": "Rita", "books": ["First Light", "Verses", "First Light"]},
                {"name": "Sam", "books": ["Second Wind"]},
                {"name": "Tess"}
            ]
        }),
    )
    .await;
}

#[tokio::test]
async fn empty_listings_are_empty_arrays() {
    let app = spawn_app().await;

    for path in ["/profiles", "/books", "/readers"] {
        let body: Value = json_body(app.get(path).await).await;
        assert_eq!(body, json!([]), "{path}");
    }
}

#[tokio::test]
async fn profiles_embed_their_account() {
    let app = spawn_app().await;
    seed_library(&app).await;

    let profiles: Value = json_body(app.get("/profiles").await).await;
    let profiles = profiles.as_array().unwrap();

    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0]["bio"], "Writes novels");
    assert_eq!(profiles[0]["website"], "https://ann.example");
    assert_eq!(profiles[0]["author"]["username"], "ann");
    assert_eq!(profiles[0]["author"]["email"], "ann@example.com");
    assert!(profiles[0]["author"].get("password").is_none());
    assert!(profiles[1]["website"].is_null());
    assert_eq!(profiles[1]["author"]["username"], "bob");
}

#[tokio::test]
async fn books_embed_author_profile_and_account() {
    let app = spawn_app().await;
    seed_library(&app).await;

    let books: Value = json_body(app.get("/books").await).await;
    let books = books.as_array().unwrap();

    assert_eq!(books.len(), 3);
    assert_eq!(books[0]["title"], "First Light");
    assert_eq!(books[0]["author"]["bio"], "Writes novels");
    assert_eq!(books[0]["author"]["author"]["username"], "ann");
    assert_eq!(books[2]["author"]["author"]["email"], "bob@example.com");
}

#[tokio::test]
async fn readers_embed_books_without_duplicates() {
    let app = spawn_app().await;
    seed_library(&app).await;

    let readers: Vec<Reader> = json_body(app.get("/readers").await).await;

    assert_eq!(readers.len(), 3);
    let titles: Vec<_> = readers[0].books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["First Light", "Verses"]);
    assert_eq!(readers[1].books.len(), 1);
    assert!(readers[2].books.is_empty());
    assert_eq!(app.count("reader_books").await, 3);
}

#[tokio::test]
async fn detail_endpoints_return_single_records() {
    let app = spawn_app().await;
    seed_library(&app).await;

    let profiles: Value = json_body(app.get("/profiles").await).await;
    let profile_id = &profiles[0]["id"];
    let profile: Value = json_body(app.get(&format!("/profiles/{profile_id}")).await).await;
    assert_eq!(profile, profiles[0]);

    let books: Value = json_body(app.get("/books").await).await;
    let book_id = &books[1]["id"];
    let book: Value = json_body(app.get(&format!("/books/{book_id}")).await).await;
    assert_eq!(book["title"], "Second Wind");

    let readers: Value = json_body(app.get("/readers").await).await;
    let reader_id = &readers[0]["id"];
    let reader: Value = json_body(app.get(&format!("/readers/{reader_id}")).await).await;
    assert_eq!(reader, readers[0]);
}

#[tokio::test]
async fn unknown_detail_ids_are_not_found() {
    let app = spawn_app().await;

    for path in ["/profiles/42", "/books/42", "/readers/42", "/books/nope"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(error_code(response).await, "not_found");
    }
}

#[tokio::test]
async fn deleting_an_account_cascades_to_its_library_records() {
    let app = spawn_app().await;
    seed_library(&app).await;

    sqlx::query("DELETE FROM accounts WHERE username = 'ann'")
        .execute(&app.pool)
        .await
        .unwrap();

    assert_eq!(app.count("author_profiles").await, 1);
    assert_eq!(app.count("books").await, 1);
    let readers: Vec<Reader> = json_body(app.get("/readers").await).await;
    let titles: Vec<_> = readers
        .iter()
        .flat_map(|r| r.books.iter().map(|b| b.title.clone()))
        .collect();
    assert_eq!(titles, vec!["Verses".to_string()]);
}

#[tokio::test]
async fn reader_listing_scales_past_sqlite_bind_limit() {
    let app = spawn_app().await;
    seed_library(&app).await;

    sqlx::query(
        r"WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 33000)
          INSERT INTO readers (name) SELECT 'bulk ' || i FROM n",
    )
    .execute(&app.pool)
    .await
    .unwrap();
    sqlx::query(
        r"INSERT INTO reader_books (reader_id, book_id)
          SELECT r.id, b.id FROM readers r, books b
          WHERE r.name LIKE 'bulk %' AND b.title = 'Verses'",
    )
    .execute(&app.pool)
    .await
    .unwrap();

    let response = app.get("/readers").await;
    assert_eq!(response.status(), StatusCode::OK);
    let readers: Vec<Reader> = json_body(response).await;

    assert_eq!(readers.len(), 33003);
    let titles: Vec<_> = readers[0].books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["First Light", "Verses"]);
    assert!(readers[2].books.is_empty());
    assert!(
        readers[3..]
            .iter()
            .all(|r| r.books.len() == 1 && r.books[0].title == "Verses")
    );
}
