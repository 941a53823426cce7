use userdesk::application::routes::support::MessageResponse;
use userdesk::domain::users::AccountSubmission;
use userdesk::infrastructure::client::UserdeskClient;

use crate::helpers::{PASSWORD, logged_in_account, spawn_app};

fn submission(username: &str) -> AccountSubmission {
    AccountSubmission {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: PASSWORD.to_string(),
    }
}

#[tokio::test]
async fn client_covers_account_crud() {
    let app = spawn_app().await;
    let (_, access, _) = logged_in_account(&app, "admin").await;
    let client = UserdeskClient::from_base_url(&app.address)
        .unwrap()
        .with_token(access);
    let accounts = client.accounts();

    let created = accounts.create(&submission("ann")).await.unwrap();
    assert_eq!(created.username, "ann");

    let fetched = accounts.get(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = accounts
        .update(created.id, &submission("annie"))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.email, "annie@example.com");

    let deleted = accounts.delete(created.id).await.unwrap();
    assert_eq!(deleted, MessageResponse::new("User deleted successfully"));

    let err = accounts.get(created.id).await.unwrap_err();
    assert!(err.to_string().contains("404"), "{err}");
}
