use reqwest::StatusCode;
use serde_json::{Value, json};
use userdesk::domain::users::Account;

use crate::helpers::{
    PASSWORD, create_account, error_code, json_body, logged_in_account, login, spawn_app,
};

#[tokio::test]
async fn create_returns_account_without_password() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/users",
            &json!({"username": "  ann ", "email": " Ann@Example.COM", "password": PASSWORD}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = json_body(response).await;
    assert_eq!(body["username"], "ann");
    assert_eq!(body["email"], "ann@example.com");
    assert_eq!(body["is_active"], true);
    assert!(body.get("password").is_none());
    assert!(!body.to_string().contains(PASSWORD));
}

#[tokio::test]
async fn duplicate_email_is_a_validation_error() {
    let app = spawn_app().await;
    create_account(&app, "ann").await;

    let response = app
        .post_json(
            "/users",
            &json!({"username": "other", "email": "ANN@example.com", "password": "pw"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");
    assert_eq!(app.count("accounts").await, 1);
}

#[tokio::test]
async fn duplicate_username_is_a_validation_error() {
    let app = spawn_app().await;
    create_account(&app, "ann").await;

    let response = app
        .post_json(
            "/users",
            &json!({"username": "ann", "email": "new@example.com", "password": "pw"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = spawn_app().await;

    let cases = [
        json!({"username": "ann", "email": "not-an-email", "password": "pw"}),
        json!({"username": "", "email": "ann@example.com", "password": "pw"}),
        json!({"username": "ann smith", "email": "ann@example.com", "password": "pw"}),
        json!({"username": "ann", "email": "ann@example.com", "password": ""}),
        json!({"username": "ann", "email": "ann@example.com"}),
    ];
    for payload in cases {
        let response = app.post_json("/users", &payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(error_code(response).await, "validation_error");
    }

    let response = app
        .client
        .post(app.api_url("/users"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");
    assert_eq!(app.count("accounts").await, 0);
}

#[tokio::test]
async fn list_is_ordered_by_id() {
    let app = spawn_app().await;
    let first = create_account(&app, "zed").await;
    let second = create_account(&app, "amy").await;

    let accounts: Vec<Account> = json_body(app.get("/users").await).await;

    let ids: Vec<_> = accounts.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[tokio::test]
async fn retrieve_unknown_or_malformed_id_is_not_found() {
    let app = spawn_app().await;
    let account = create_account(&app, "ann").await;

    let found: Account = json_body(app.get(&format!("/users/{}", account.id)).await).await;
    assert_eq!(found, account);

    let response = app.get("/users/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(response).await, "not_found");

    let response = app.get("/users/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_requires_authentication() {
    let app = spawn_app().await;
    let account = create_account(&app, "ann").await;

    let response = app
        .client
        .put(app.api_url(&format!("/users/{}", account.id)))
        .json(&json!({"username": "ann2", "email": "ann2@example.com", "password": "pw"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "unauthorized");
}

#[tokio::test]
async fn update_replaces_fields_and_rehashes_password() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;

    let response = app
        .client
        .put(app.api_url(&format!("/users/{}", account.id)))
        .bearer_auth(&access)
        .json(&json!({"username": "annie", "email": "annie@example.com", "password": "new-pass"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Account = json_body(response).await;
    assert_eq!(updated.id, account.id);
    assert_eq!(updated.username, "annie");
    assert_eq!(updated.email, "annie@example.com");

    assert_eq!(login(&app, "annie", PASSWORD).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(login(&app, "annie", "new-pass").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_may_keep_own_email_but_not_take_another() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;
    create_account(&app, "bob").await;

    let response = app
        .client
        .put(app.api_url(&format!("/users/{}", account.id)))
        .bearer_auth(&access)
        .json(&json!({"username": "ann", "email": "ann@example.com", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .client
        .put(app.api_url(&format!("/users/{}", account.id)))
        .bearer_auth(&access)
        .json(&json!({"username": "ann", "email": "bob@example.com", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");
}

#[tokio::test]
async fn update_of_unknown_account_is_not_found() {
    let app = spawn_app().await;
    let (_, access, _) = logged_in_account(&app, "ann").await;

    let response = app
        .client
        .put(app.api_url("/users/999"))
        .bearer_auth(&access)
        .json(&json!({"username": "x", "email": "x@example.com", "password": "pw"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_account() {
    let app = spawn_app().await;
    let (_, access, _) = logged_in_account(&app, "ann").await;
    let bob = create_account(&app, "bob").await;

    let response = app
        .client
        .delete(app.api_url(&format!("/users/{}", bob.id)))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body, json!({"message": "User deleted successfully"}));
    assert_eq!(
        app.get(&format!("/users/{}", bob.id)).await.status(),
        StatusCode::NOT_FOUND
    );

    let response = app
        .client
        .delete(app.api_url(&format!("/users/{}", bob.id)))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_requires_authentication() {
    let app = spawn_app().await;
    let account = create_account(&app, "ann").await;

    let response = app
        .client
        .delete(app.api_url(&format!("/users/{}", account.id)))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.count("accounts").await, 1);
}

#[tokio::test]
async fn activate_is_idempotent() {
    let app = spawn_app().await;
    let (_, access, _) = logged_in_account(&app, "ann").await;
    let bob = create_account(&app, "bob").await;
    sqlx::query("UPDATE accounts SET is_active = 0 WHERE id = ?")
        .bind(bob.id.into_inner())
        .execute(&app.pool)
        .await
        .unwrap();

    for _ in 0..2 {
        let response = app
            .client
            .post(app.api_url(&format!("/users/{}/activate", bob.id)))
            .bearer_auth(&access)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_body(response).await;
        assert_eq!(body, json!({"status": "User activated"}));
    }

    let bob: Account = json_body(app.get(&format!("/users/{}", bob.id)).await).await;
    assert!(bob.is_active);
}

#[tokio::test]
async fn activate_unknown_account_is_not_found() {
    let app = spawn_app().await;
    let (_, access, _) = logged_in_account(&app, "ann").await;

    let response = app
        .client
        .post(app.api_url("/users/999/activate"))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = spawn_app().await;

    let response = app.get("/users").await;

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
