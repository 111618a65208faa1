use crate::{
    auth::{CookiePolicy, TokenKeys},
    domain::UserEmail,
    utils::ApiError,
};
use actix_web::{
    get, post,
    web::{Data, Json},
    HttpResponse,
};
use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

/// Any extra fields the client sends along with the email are ignored.
#[derive(Deserialize)]
pub struct TokenRequest {
    email: String,
}

#[post("/jwt")]
#[tracing::instrument(
    name = "Issuing an access token",
    skip(body, keys, cookies),
    fields(user_email = %body.email)
)]
pub async fn issue_token(
    body: Json<TokenRequest>,
    keys: Data<TokenKeys>,
    cookies: Data<CookiePolicy>,
) -> Result<HttpResponse, ApiError> {
    let email = UserEmail::parse(body.into_inner().email).map_err(ApiError::Validation)?;
    let token = keys
        .issue(&email)
        .context("Failed to sign an access token.")?;

    Ok(HttpResponse::Ok()
        .cookie(cookies.token_cookie(token))
        .json(json!({ "success": true })))
}

#[get("/logout")]
#[tracing::instrument(name = "Logging out", skip(cookies))]
pub async fn logout(cookies: Data<CookiePolicy>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cookies.removal_cookie())
        .json(json!({ "success": true }))
}
