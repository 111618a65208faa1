use super::now_millis;
use crate::{
    auth::reject_non_admins,
    documents::{self, Collection, Filter},
    domain::{Document, DocumentId, UserEmail},
    email_client::EmailClient,
    notifications::{notify, Notification},
    utils::ApiError,
};
use actix_web::{
    delete, get,
    middleware::from_fn,
    patch, put,
    web::{Data, Json, Path},
    HttpResponse,
};
use serde_json::Value;
use sqlx::PgPool;
use tracing::Span;

const EMAIL: [&str; 1] = ["email"];
const STATUS: [&str; 1] = ["status"];
/// Status a user sets when asking an admin for a different role.
const REQUESTED_STATUS: &str = "Requested";

/// Register a user on first login.
///
/// A returning user gets their stored document back, unless they are asking
/// for a role change, which only updates `status`.
#[put("/user")]
#[tracing::instrument(
    name = "Saving a user",
    skip(body, pool, email_client),
    fields(user_email = tracing::field::Empty)
)]
pub async fn save_user(
    body: Json<Value>,
    pool: Data<PgPool>,
    email_client: Data<EmailClient>,
) -> Result<HttpResponse, ApiError> {
    let mut user = Document::parse(body.into_inner()).map_err(ApiError::Validation)?;
    let email = user
        .str_at(&EMAIL)
        .ok_or_else(|| ApiError::Validation("A user needs an `email`.".into()))?;
    let email = UserEmail::parse(email.to_owned()).map_err(ApiError::Validation)?;
    Span::current().record("user_email", tracing::field::display(&email));

    let filter = Filter::field(&EMAIL, email.as_ref());
    if let Some(existing) = documents::find_one(pool.get_ref(), Collection::Users, &filter).await? {
        if user.str_at(&STATUS) != Some(REQUESTED_STATUS) {
            return Ok(HttpResponse::Ok().json(existing));
        }

        let mut patch = Document::default();
        patch.insert("status", REQUESTED_STATUS);
        let result = documents::update_one(pool.get_ref(), Collection::Users, &filter, patch).await?;
        return Ok(HttpResponse::Ok().json(result));
    }

    user.insert("timestamp", now_millis());
    let result = documents::upsert_user(pool.get_ref(), user).await?;
    if result.upserted_id.is_some() {
        notify(&email_client, &email, Notification::welcome()).await;
    }

    Ok(HttpResponse::Ok().json(result))
}

#[get("/user/{email}")]
#[tracing::instrument(name = "Get a user", skip(pool))]
pub async fn get_user(path: Path<String>, pool: Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();
    let user = documents::find_one(
        pool.get_ref(),
        Collection::Users,
        &Filter::field(&EMAIL, &email),
    )
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

#[get("/users", wrap = "from_fn(reject_non_admins)")]
#[tracing::instrument(name = "List users", skip(pool))]
pub async fn list_users(pool: Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let users = documents::find(pool.get_ref(), Collection::Users, &Filter::All).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Admins use this to settle role requests; `timestamp` is refreshed.
#[patch("/users/update/{email}", wrap = "from_fn(reject_non_admins)")]
#[tracing::instrument(name = "Update a user", skip(body, pool))]
pub async fn update_user(
    path: Path<String>,
    body: Json<Value>,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();
    let mut patch = Document::parse(body.into_inner()).map_err(ApiError::Validation)?;
    patch.insert("timestamp", now_millis());

    let result = documents::update_one(
        pool.get_ref(),
        Collection::Users,
        &Filter::field(&EMAIL, &email),
        patch,
    )
    .await?;

    Ok(HttpResponse::Ok().json(result))
}

#[delete("/users/{id}", wrap = "from_fn(reject_non_admins)")]
#[tracing::instrument(name = "Delete a user", skip(pool))]
pub async fn delete_user(path: Path<String>, pool: Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let id = DocumentId::parse(&path.into_inner()).map_err(ApiError::Validation)?;
    let result = documents::delete_one(pool.get_ref(), Collection::Users, &Filter::Id(id)).await?;

    Ok(HttpResponse::Ok().json(result))
}
