use super::{TokenKeys, TOKEN_COOKIE};
use crate::{
    documents::{self, Collection, Filter},
    domain::Role,
    utils::error_chain_fmt,
};
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    middleware::Next,
    web::Data,
    HttpMessage, HttpResponse, ResponseError,
};
use anyhow::Context;
use serde_json::{json, Value};
use sqlx::{PgExecutor, PgPool};
use std::fmt::Debug;

/// The caller proven by a valid access token.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub email: String,
}

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("unauthorized access")]
    MissingToken,
    #[error("unauthorized access")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("The caller does not hold the `{0}` role.")]
    MissingRole(Role),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // The required role stays in the logs, never in the body.
        let message = match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => "unauthorized access",
            AuthError::MissingRole(_) => "Unauthorized Access",
            AuthError::UnexpectedError(_) => "Something went wrong",
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

pub async fn reject_anonymous_users(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let user = authenticate(&req)?;
    req.extensions_mut().insert(user);
    next.call(req).await
}

pub async fn reject_non_admins(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    require_role(req, next, Role::Admin).await
}

pub async fn reject_non_workers(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    require_role(req, next, Role::Worker).await
}

async fn require_role<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
    role: Role,
) -> Result<ServiceResponse<B>, actix_web::Error> {
    let user = authenticate(&req)?;
    let pool = req
        .app_data::<Data<PgPool>>()
        .context("The database pool is not registered.")
        .map_err(AuthError::UnexpectedError)?;

    let stored_role = get_user_role(pool.get_ref(), &user.email)
        .await
        .map_err(AuthError::UnexpectedError)?;
    if stored_role != Some(role) {
        return Err(AuthError::MissingRole(role).into());
    }

    req.extensions_mut().insert(user);
    next.call(req).await
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AuthError> {
    let token = req.cookie(TOKEN_COOKIE).ok_or(AuthError::MissingToken)?;
    let keys = req
        .app_data::<Data<TokenKeys>>()
        .context("The token keys are not registered.")?;

    let claims = keys
        .verify(token.value())
        .map_err(AuthError::InvalidToken)?;

    Ok(AuthenticatedUser {
        email: claims.email,
    })
}

/// Look up the role stored on the user document; unknown roles count as none.
#[tracing::instrument(name = "Get user role", skip(executor))]
async fn get_user_role(executor: impl PgExecutor<'_>, email: &str) -> anyhow::Result<Option<Role>> {
    let user = documents::find_one(executor, Collection::Users, &Filter::field(&["email"], email))
        .await?;

    let role = user
        .as_ref()
        .and_then(|u| u.get("role"))
        .and_then(Value::as_str)
        .and_then(|r| Role::try_from(r).ok());

    Ok(role)
}
