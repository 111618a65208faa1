use crate::{
    auth::{reject_anonymous_users, reject_non_workers},
    documents::{self, Collection, Filter},
    domain::{Document, DocumentId, NewBooking, RESIDENT_EMAIL, SERVICE_WORKER_EMAIL},
    email_client::EmailClient,
    notifications::{notify, Notification},
    utils::ApiError,
};
use actix_web::{
    delete, get,
    middleware::from_fn,
    post,
    web::{Data, Json, Path},
    HttpResponse,
};
use serde_json::Value;
use sqlx::PgPool;

#[post("/booking", wrap = "from_fn(reject_anonymous_users)")]
#[tracing::instrument(
    name = "Booking a service",
    skip(body, pool, email_client),
    fields(
        resident_email = tracing::field::Empty,
        worker_email = tracing::field::Empty,
    )
)]
pub async fn create_booking(
    body: Json<Value>,
    pool: Data<PgPool>,
    email_client: Data<EmailClient>,
) -> Result<HttpResponse, ApiError> {
    let document = Document::parse(body.into_inner()).map_err(ApiError::Validation)?;
    let NewBooking {
        document,
        resident_email,
        resident_name,
        worker_email,
    } = NewBooking::try_from(document).map_err(ApiError::Validation)?;
    tracing::Span::current()
        .record("resident_email", tracing::field::display(&resident_email))
        .record("worker_email", tracing::field::display(&worker_email));

    let result = documents::insert_one(pool.get_ref(), Collection::Bookings, document).await?;

    notify(
        &email_client,
        &resident_email,
        Notification::booking_confirmed(),
    )
    .await;
    notify(
        &email_client,
        &worker_email,
        Notification::worker_booked(&resident_name),
    )
    .await;

    Ok(HttpResponse::Ok().json(result))
}

#[get("/my-bookings/{email}", wrap = "from_fn(reject_anonymous_users)")]
#[tracing::instrument(name = "List a resident's bookings", skip(pool))]
pub async fn my_bookings(path: Path<String>, pool: Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();
    let bookings = documents::find(
        pool.get_ref(),
        Collection::Bookings,
        &Filter::field(&RESIDENT_EMAIL, &email),
    )
    .await?;

    Ok(HttpResponse::Ok().json(bookings))
}

#[get("/manage-bookings/{email}", wrap = "from_fn(reject_non_workers)")]
#[tracing::instrument(name = "List a worker's bookings", skip(pool))]
pub async fn manage_bookings(
    path: Path<String>,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let email = path.into_inner();
    let bookings = documents::find(
        pool.get_ref(),
        Collection::Bookings,
        &Filter::field(&SERVICE_WORKER_EMAIL, &email),
    )
    .await?;

    Ok(HttpResponse::Ok().json(bookings))
}

#[delete("/booking/{id}", wrap = "from_fn(reject_anonymous_users)")]
#[tracing::instrument(name = "Cancel a booking", skip(pool))]
pub async fn delete_booking(
    path: Path<String>,
    pool: Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let id = DocumentId::parse(&path.into_inner()).map_err(ApiError::Validation)?;
    let result = documents::delete_one(pool.get_ref(), Collection::Bookings, &Filter::Id(id)).await?;

    Ok(HttpResponse::Ok().json(result))
}
