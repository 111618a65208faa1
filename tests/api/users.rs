use crate::helpers::*;
use serde_json::json;
use wiremock::{matchers, Mock, ResponseTemplate};

#[tokio::test]
async fn saving_an_unseen_user_creates_them_and_sends_a_welcome_email() {
    // Arrange
    let app = TestApp::spawn().await;
    Mock::given(matchers::path("/email"))
        .and(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let resp = app
        .put_user(&json!({ "email": "ann@example.com", "name": "Ann", "role": "resident" }))
        .await;

    // Assert
    assert_eq!(200, resp.status().as_u16());
    let result = json_body(resp).await;
    assert_eq!(result["upsertedCount"], 1);
    assert!(result["upsertedId"].is_string());

    let saved = json_body(app.get("/user/ann@example.com").await).await;
    assert_eq!(saved["name"], "Ann");
    assert_eq!(saved["role"], "resident");
    assert!(saved["timestamp"].is_i64());
    assert_eq!(saved["_id"], result["upsertedId"]);

    assert_eq!(app.email_recipients().await, vec!["ann@example.com"]);
}

#[tokio::test]
async fn saving_a_known_user_returns_the_stored_document_without_emailing() {
    // Arrange
    let app = TestApp::spawn().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    let body = json!({ "email": "ann@example.com", "name": "Ann", "role": "resident" });
    app.put_user(&body).await;

    // Act
    let resp = app
        .put_user(&json!({ "email": "ann@example.com", "role": "admin" }))
        .await;

    // Assert
    assert_eq!(200, resp.status().as_u16());
    let stored = json_body(resp).await;
    assert_eq!(stored["email"], "ann@example.com");
    assert_eq!(stored["role"], "resident");
}

#[tokio::test]
async fn a_role_request_only_updates_the_status() {
    // Arrange
    let app = TestApp::spawn().await;
    app.accept_emails().await;
    app.put_user(&json!({ "email": "ann@example.com", "role": "resident" }))
        .await;

    // Act
    let resp = app
        .put_user(&json!({ "email": "ann@example.com", "role": "admin", "status": "Requested" }))
        .await;

    // Assert
    let result = json_body(resp).await;
    assert_eq!(result["matchedCount"], 1);
    assert_eq!(result["modifiedCount"], 1);

    let saved = json_body(app.get("/user/ann@example.com").await).await;
    assert_eq!(saved["status"], "Requested");
    assert_eq!(saved["role"], "resident");
}

#[tokio::test]
async fn saving_a_user_requires_a_valid_email() {
    // Arrange
    let app = TestApp::spawn().await;
    let cases = vec![
        (json!({ "name": "Ann" }), "missing email"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": 42 }), "numeric email"),
        (json!("ann@example.com"), "not an object"),
    ];

    for (body, description) in cases {
        // Act
        let resp = app.put_user(&body).await;

        // Assert
        assert_eq!(
            400,
            resp.status().as_u16(),
            "The API did not return 400 Bad Request when the payload was {}.",
            description
        );
    }
}

#[tokio::test]
async fn an_unknown_user_is_null() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = app.get("/user/nobody@example.com").await;

    // Assert
    assert_eq!(200, resp.status().as_u16());
    assert!(json_body(resp).await.is_null());
}

#[tokio::test]
async fn listing_users_requires_a_token() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = app.get("/users").await;

    // Assert
    assert_unauthorized(&resp);
    assert_eq!(json_body(resp).await["message"], "unauthorized access");
}

#[tokio::test]
async fn listing_users_requires_the_admin_role() {
    // Arrange
    let app = TestApp::spawn().await;
    app.login_as_new("worker").await;

    // Act
    let resp = app.get("/users").await;

    // Assert
    assert_unauthorized(&resp);
    assert_eq!(json_body(resp).await["message"], "Unauthorized Access");
}

#[tokio::test]
async fn a_token_for_an_unregistered_email_grants_no_role() {
    // Arrange
    let app = TestApp::spawn().await;
    app.post_jwt(&json!({ "email": "ghost@example.com" })).await;

    // Act
    let resp = app.get("/users").await;

    // Assert
    assert_unauthorized(&resp);
}

#[tokio::test]
async fn admins_can_list_every_user() {
    // Arrange
    let app = TestApp::spawn().await;
    app.create_user("ann@example.com", "resident").await;
    app.create_user("bob@example.com", "worker").await;
    app.login_as_new("admin").await;

    // Act
    let resp = app.get("/users").await;

    // Assert
    assert_eq!(200, resp.status().as_u16());
    let users = json_body(resp).await;
    assert_eq!(users.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn admins_can_grant_a_requested_role() {
    // Arrange
    let app = TestApp::spawn().await;
    app.create_user("ann@example.com", "resident").await;
    app.login_as_new("admin").await;

    // Act
    let resp = app
        .patch_json(
            "/users/update/ann@example.com",
            &json!({ "role": "worker", "status": "Verified" }),
        )
        .await;

    // Assert
    assert_eq!(200, resp.status().as_u16());
    assert_eq!(json_body(resp).await["modifiedCount"], 1);

    let saved = json_body(app.get("/user/ann@example.com").await).await;
    assert_eq!(saved["role"], "worker");
    assert_eq!(saved["status"], "Verified");
    assert!(saved["timestamp"].is_i64());
}

#[tokio::test]
async fn updating_an_unknown_user_matches_nothing() {
    // Arrange
    let app = TestApp::spawn().await;
    app.login_as_new("admin").await;

    // Act
    let resp = app
        .patch_json("/users/update/nobody@example.com", &json!({ "role": "worker" }))
        .await;

    // Assert
    let result = json_body(resp).await;
    assert_eq!(result["matchedCount"], 0);
    assert_eq!(result["modifiedCount"], 0);
}

#[tokio::test]
async fn moving_a_user_onto_a_taken_email_is_a_conflict() {
    // Arrange
    let app = TestApp::spawn().await;
    app.create_user("ann@example.com", "resident").await;
    app.create_user("bob@example.com", "resident").await;
    app.login_as_new("admin").await;

    // Act
    let resp = app
        .patch_json(
            "/users/update/ann@example.com",
            &json!({ "email": "bob@example.com" }),
        )
        .await;

    // Assert
    assert_eq!(409, resp.status().as_u16());
    assert_eq!(
        json_body(resp).await["message"],
        "A user with this email already exists."
    );
    let ann = json_body(app.get("/user/ann@example.com").await).await;
    assert_eq!(ann["email"], "ann@example.com");
}

#[tokio::test]
async fn documents_with_nul_characters_are_rejected() {
    // Arrange
    let app = TestApp::spawn().await;
    app.create_user("ann@example.com", "resident").await;
    app.login_as_new("admin").await;

    // Act
    let saved = app
        .put_user(&json!({ "email": "cid@example.com", "name": "C\u{0}id" }))
        .await;
    let patched = app
        .patch_json("/users/update/ann@example.com", &json!({ "bio\u{0}": "hi" }))
        .await;

    // Assert
    assert_eq!(400, saved.status().as_u16());
    assert_eq!(400, patched.status().as_u16());
    assert!(json_body(app.get("/user/cid@example.com").await)
        .await
        .is_null());
}

#[tokio::test]
async fn residents_cannot_change_roles() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = app.login_as_new("resident").await;

    // Act
    let resp = app
        .patch_json(&format!("/users/update/{email}"), &json!({ "role": "admin" }))
        .await;

    // Assert
    assert_unauthorized(&resp);
}

#[tokio::test]
async fn admins_can_delete_users() {
    // Arrange
    let app = TestApp::spawn().await;
    let id = app.create_user("ann@example.com", "resident").await;
    app.login_as_new("admin").await;

    // Act
    let resp = app.delete(&format!("/users/{id}")).await;

    // Assert
    assert_eq!(json_body(resp).await["deletedCount"], 1);
    assert!(json_body(app.get("/user/ann@example.com").await)
        .await
        .is_null());
}

#[tokio::test]
async fn deleting_with_a_malformed_id_is_a_bad_request() {
    // Arrange
    let app = TestApp::spawn().await;
    app.login_as_new("admin").await;

    // Act
    let resp = app.delete("/users/not-an-id").await;

    // Assert
    assert_eq!(400, resp.status().as_u16());
}
