use actix_web::{get, HttpResponse, Responder};

#[get("/health_check")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().body("Your server is running...")
}
