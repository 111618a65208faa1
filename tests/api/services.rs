use crate::helpers::*;
use serde_json::{json, Value};

fn service(worker_email: &str, category: &str) -> Value {
    json!({
        "title": format!("{category} at your door"),
        "category": category,
        "price": 40,
        "worker": { "email": worker_email, "name": "Bob" },
    })
}

#[tokio::test]
async fn workers_can_add_a_service() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = app.login_as_new("worker").await;

    // Act
    let resp = app.post_service(&service(&email, "Plumbing")).await;

    // Assert
    assert_eq!(200, resp.status().as_u16());
    let result = json_body(resp).await;
    assert_eq!(result["acknowledged"], true);
    let id = result["insertedId"].as_str().unwrap();

    let saved = json_body(app.get(&format!("/service/{id}")).await).await;
    assert_eq!(saved["_id"], id);
    assert_eq!(saved["category"], "Plumbing");
    assert_eq!(saved["worker"]["email"], email.as_str());
}

#[tokio::test]
async fn residents_cannot_add_services() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = app.login_as_new("resident").await;

    // Act
    let resp = app.post_service(&service(&email, "Plumbing")).await;

    // Assert
    assert_unauthorized(&resp);
    assert_eq!(json_body(resp).await["message"], "Unauthorized Access");
}

#[tokio::test]
async fn adding_a_service_requires_a_token() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = app.post_service(&service("bob@example.com", "Plumbing")).await;

    // Assert
    assert_unauthorized(&resp);
}

#[tokio::test]
async fn services_can_be_filtered_by_category() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = app.login_as_new("worker").await;
    for category in ["Plumbing", "Cleaning", "Plumbing"] {
        app.post_service(&service(&email, category)).await;
    }

    // Act
    let plumbing = json_body(app.get("/services?category=Plumbing").await).await;
    let everything = json_body(app.get("/services").await).await;
    let null_category = json_body(app.get("/services?category=null").await).await;

    // Assert
    assert_eq!(plumbing.as_array().unwrap().len(), 2);
    assert_eq!(everything.as_array().unwrap().len(), 3);
    assert_eq!(null_category, everything);
}

#[tokio::test]
async fn an_unknown_service_is_null() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = app
        .get("/service/3f1c9a52-4a64-4e36-8d2f-6a1b0f3f7e11")
        .await;

    // Assert
    assert_eq!(200, resp.status().as_u16());
    assert!(json_body(resp).await.is_null());
}

#[tokio::test]
async fn a_malformed_service_id_is_a_bad_request() {
    // Arrange
    let app = TestApp::spawn().await;

    // Act
    let resp = app.get("/service/663a1f0c9e1b2c3d4e5f6a7b").await;

    // Assert
    assert_eq!(400, resp.status().as_u16());
}

#[tokio::test]
async fn workers_see_only_their_own_listings() {
    // Arrange
    let app = TestApp::spawn().await;
    app.create_user("other@example.com", "worker").await;
    let email = app.login_as_new("worker").await;
    app.post_service(&service(&email, "Plumbing")).await;
    app.post_service(&service("other@example.com", "Cleaning"))
        .await;

    // Act
    let resp = app.get(&format!("/my-listings/{email}")).await;

    // Assert
    let listings = json_body(resp).await;
    let listings = listings.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["category"], "Plumbing");
}

#[tokio::test]
async fn workers_can_update_a_service() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = app.login_as_new("worker").await;
    let created = json_body(app.post_service(&service(&email, "Plumbing")).await).await;
    let id = created["insertedId"].as_str().unwrap();

    // Act
    let resp = app
        .put_json(&format!("/service/update/{id}"), &json!({ "price": 55 }))
        .await;

    // Assert
    let result = json_body(resp).await;
    assert_eq!(result["matchedCount"], 1);
    assert_eq!(result["modifiedCount"], 1);

    let saved = json_body(app.get(&format!("/service/{id}")).await).await;
    assert_eq!(saved["price"], 55);
    assert_eq!(saved["category"], "Plumbing");
}

#[tokio::test]
async fn an_update_that_changes_nothing_is_not_counted_as_modified() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = app.login_as_new("worker").await;
    let created = json_body(app.post_service(&service(&email, "Plumbing")).await).await;
    let id = created["insertedId"].as_str().unwrap();

    // Act
    let resp = app
        .put_json(&format!("/service/update/{id}"), &json!({ "price": 40 }))
        .await;

    // Assert
    let result = json_body(resp).await;
    assert_eq!(result["matchedCount"], 1);
    assert_eq!(result["modifiedCount"], 0);
}

#[tokio::test]
async fn workers_can_delete_a_service() {
    // Arrange
    let app = TestApp::spawn().await;
    let email = app.login_as_new("worker").await;
    let created = json_body(app.post_service(&service(&email, "Plumbing")).await).await;
    let id = created["insertedId"].as_str().unwrap();

    // Act
    let resp = app.delete(&format!("/service/{id}")).await;

    // Assert
    assert_eq!(json_body(resp).await["deletedCount"], 1);
    let again = app.delete(&format!("/service/{id}")).await;
    assert_eq!(json_body(again).await["deletedCount"], 0);
}
