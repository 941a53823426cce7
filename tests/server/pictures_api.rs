use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::helpers::{
    TestApp, create_account, error_code, json_body, logged_in_account, spawn_app, tiny_png,
};

async fn upload(
    app: &TestApp,
    id: impl std::fmt::Display,
    access: &str,
    form: Form,
) -> reqwest::Response {
    app.client
        .post(app.api_url(&format!("/users/{id}/upload_profile_pic")))
        .bearer_auth(access)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send upload")
}

fn picture_form(filename: &str, data: Vec<u8>) -> Form {
    Form::new().part("profile_pic", Part::bytes(data).file_name(filename.to_string()))
}

#[tokio::test]
async fn download_before_upload_is_not_found() {
    let app = spawn_app().await;
    let account = create_account(&app, "ann").await;

    let response = app
        .get(&format!("/users/{}/download_profile_pic", account.id))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(response).await, "not_found");
}

#[tokio::test]
async fn upload_creates_profile_and_download_returns_bytes() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;
    let png = tiny_png();
    assert_eq!(app.count("account_profiles").await, 0);

    let response = upload(&app, account.id, &access, picture_form("me.png", png.clone())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = json_body(response).await;
    assert_eq!(profile["account_id"], account.id.into_inner());
    assert_eq!(profile["picture"]["filename"], "me.png");
    assert_eq!(profile["picture"]["content_type"], "image/png");
    assert_eq!(app.count("account_profiles").await, 1);

    let response = app
        .get(&format!("/users/{}/download_profile_pic", account.id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"me.png\""
    );
    let bytes = response.bytes().await.unwrap();
    assert_eq!(bytes.as_ref(), png.as_slice());
}

#[tokio::test]
async fn second_upload_overwrites_the_first() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;

    let first = upload(&app, account.id, &access, picture_form("one.png", tiny_png())).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = json_body(first).await;

    let second = upload(&app, account.id, &access, picture_form("two.png", tiny_png())).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second: Value = json_body(second).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["picture"]["filename"], "two.png");
    assert_eq!(app.count("account_profiles").await, 1);

    let stored = app.stored_pictures();
    assert_eq!(stored.len(), 1, "old picture should be removed: {stored:?}");
    assert!(stored[0].ends_with("-two.png"));
}

#[tokio::test]
async fn client_filename_is_sanitised() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;

    let response = upload(
        &app,
        account.id,
        &access,
        picture_form("../../etc/me.png", tiny_png()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = json_body(response).await;
    assert_eq!(profile["picture"]["filename"], "me.png");
    let path = profile["picture"]["path"].as_str().unwrap();
    assert!(path.starts_with("profile_pics/"));
    assert!(!path.contains(".."));
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;

    let response = upload(
        &app,
        account.id,
        &access,
        picture_form("notes.png", b"definitely not an image".to_vec()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");
    assert_eq!(app.count("account_profiles").await, 0);
    assert!(app.stored_pictures().is_empty());
}

#[tokio::test]
async fn missing_or_empty_field_is_rejected() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;

    let wrong_field = Form::new().part("avatar", Part::bytes(tiny_png()).file_name("me.png"));
    let response = upload(&app, account.id, &access, wrong_field).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");

    let response = upload(&app, account.id, &access, picture_form("me.png", Vec::new())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");
}

#[tokio::test]
async fn upload_for_unknown_account_is_not_found() {
    let app = spawn_app().await;
    let (_, access, _) = logged_in_account(&app, "ann").await;

    let response = upload(&app, 999, &access, picture_form("me.png", tiny_png())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.stored_pictures().is_empty());
}

#[tokio::test]
async fn upload_requires_authentication() {
    let app = spawn_app().await;
    let account = create_account(&app, "ann").await;

    let response = app
        .client
        .post(app.api_url(&format!("/users/{}/upload_profile_pic", account.id)))
        .multipart(picture_form("me.png", tiny_png()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleting_account_removes_profile_and_picture() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;
    let response = upload(&app, account.id, &access, picture_form("me.png", tiny_png())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.stored_pictures().len(), 1);

    let response = app
        .client
        .delete(app.api_url(&format!("/users/{}", account.id)))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.count("account_profiles").await, 0);
    assert!(app.stored_pictures().is_empty());
}

#[tokio::test]
async fn missing_stored_file_is_not_found() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;
    upload(&app, account.id, &access, picture_form("me.png", tiny_png())).await;
    std::fs::remove_dir_all(app.media_root().join("profile_pics")).unwrap();

    let response = app
        .get(&format!("/users/{}/download_profile_pic", account.id))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn padded_png(len: usize) -> Vec<u8> {
    let mut data = tiny_png();
    data.resize(len, 0);
    data
}

#[tokio::test]
async fn upload_route_accepts_pictures_above_the_json_body_limit() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;

    let response = upload(
        &app,
        account.id,
        &access,
        picture_form("large.png", padded_png(2 * 1024 * 1024)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = json_body(response).await;
    assert_eq!(profile["picture"]["filename"], "large.png");
    assert_eq!(app.stored_pictures().len(), 1);
}

#[tokio::test]
async fn picture_over_ten_mebibytes_is_rejected() {
    let app = spawn_app().await;
    let (account, access, _) = logged_in_account(&app, "ann").await;

    let response = upload(
        &app,
        account.id,
        &access,
        picture_form("huge.png", padded_png(10 * 1024 * 1024 + 1)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, "validation_error");
    assert!(app.stored_pictures().is_empty());
    assert_eq!(app.count("account_profiles").await, 0);
}
