use crate::{
    auth::reject_non_workers,
    documents::{self, Collection, Filter},
    domain::{Document, DocumentId, WORKER_EMAIL},
    utils::ApiError,
};
use actix_web::{
    delete, get,
    middleware::from_fn,
    post, put,
    web::{Data, Json, Path, Query},
    HttpResponse,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

const CATEGORY: [&str; 1] = ["category"];

#[derive(Debug, Deserialize)]
pub struct ServicesQuery {
    category: Option<String>,
}

impl ServicesQuery {
    /// Browsers send the literal `"null"` when no category is picked.
    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != "null")
    }
}

#[post("/service", wrap = "from_fn(reject_non_workers)")]
#[tracing::instrument(name = "Adding a service", skip(body, pool))]
pub async fn create_service(
    body: Json<Value>,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let service = Document::parse(body.into_inner()).map_err(ApiError::Validation)?;
    let result = documents::insert_one(pool.get_ref(), Collection::Services, service).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[get("/services")]
#[tracing::instrument(name = "List services", skip(pool))]
pub async fn list_services(
    query: Query<ServicesQuery>,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let filter = match query.category() {
        Some(category) => Filter::field(&CATEGORY, category),
        None => Filter::All,
    };
    let services = documents::find(pool.get_ref(), Collection::Services, &filter).await?;

    Ok(HttpResponse::Ok().json(services))
}

#[get("/service/{id}")]
#[tracing::instrument(name = "Get a service", skip(pool))]
pub async fn get_service(path: Path<String>, pool: Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let id = DocumentId::parse(&path.into_inner()).map_err(ApiError::Validation)?;
    let service = documents::find_one(pool.get_ref(), Collection::Services, &Filter::Id(id)).await?;

    Ok(HttpResponse::Ok().json(service))
}

#[get("/my-listings/{email}", wrap = "from_fn(reject_non_workers)")]
#[tracing::instrument(name = "List a worker's services", skip(pool))]
pub async fn my_listings(path: Path<String>, pool: Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();
    let services = documents::find(
        pool.get_ref(),
        Collection::Services,
        &Filter::field(&WORKER_EMAIL, &email),
    )
    .await?;

    Ok(HttpResponse::Ok().json(services))
}

#[delete("/service/{id}", wrap = "from_fn(reject_non_workers)")]
#[tracing::instrument(name = "Delete a service", skip(pool))]
pub async fn delete_service(
    path: Path<String>,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let id = DocumentId::parse(&path.into_inner()).map_err(ApiError::Validation)?;
    let result = documents::delete_one(pool.get_ref(), Collection::Services, &Filter::Id(id)).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[put("/service/update/{id}", wrap = "from_fn(reject_non_workers)")]
#[tracing::instrument(name = "Update a service", skip(body, pool))]
pub async fn update_service(
    path: Path<String>,
    body: Json<Value>,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let id = DocumentId::parse(&path.into_inner()).map_err(ApiError::Validation)?;
    let patch = Document::parse(body.into_inner()).map_err(ApiError::Validation)?;
    let result =
        documents::update_one(pool.get_ref(), Collection::Services, &Filter::Id(id), patch)
            .await?;

    Ok(HttpResponse::Ok().json(result))
}
