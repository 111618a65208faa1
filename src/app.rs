use crate::{
    auth::{CookiePolicy, TokenKeys},
    config::Settings,
    email_client::EmailClient,
    routes::*,
    utils::ApiError,
};
use actix_cors::Cors;
use actix_web::{dev::Server, http::header, web, web::Data, HttpServer};
use core::net::SocketAddr;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct App {
    server: Server,
    socket_addr: SocketAddr,
}

impl App {
    pub async fn build(config: &Settings) -> anyhow::Result<Self> {
        // create the app dependencies
        let listener =
            TcpListener::bind((config.application.host.clone(), config.application.port))?;
        let socket_addr = listener.local_addr()?;
        let db_pool = config.database.get_db_pool();
        let email_client = config.email_client.client().map_err(anyhow::Error::msg)?;
        let token_keys = config.auth.keys();
        let cookie_policy = CookiePolicy {
            secure: config.application.secure_cookies,
        };

        // create the app runner
        let server = Self::get_server_runner(
            listener,
            db_pool,
            email_client,
            token_keys,
            cookie_policy,
            config.cors.allowed_origins.clone(),
        )?;

        Ok(Self {
            server,
            socket_addr,
        })
    }

    fn get_server_runner(
        listener: TcpListener,
        db_pool: PgPool,
        email_client: EmailClient,
        token_keys: TokenKeys,
        cookie_policy: CookiePolicy,
        allowed_origins: Vec<String>,
    ) -> anyhow::Result<Server> {
        let db_pool = Data::new(db_pool);
        let email_client = Data::new(email_client);
        let token_keys = Data::new(token_keys);
        let cookie_policy = Data::new(cookie_policy);
        let json_config = web::JsonConfig::default()
            .error_handler(|e, _req| ApiError::Validation(e.to_string()).into());

        let server = HttpServer::new(move || {
            actix_web::App::new()
                .wrap(cors(&allowed_origins))
                .wrap(TracingLogger::default())
                .service(home)
                .service(health_check)
                .service(issue_token)
                .service(logout)
                .service(save_user)
                .service(get_user)
                .service(list_users)
                .service(update_user)
                .service(delete_user)
                .service(create_service)
                .service(list_services)
                .service(get_service)
                .service(my_listings)
                .service(delete_service)
                .service(update_service)
                .service(create_booking)
                .service(my_bookings)
                .service(manage_bookings)
                .service(delete_booking)
                .app_data(json_config.clone())
                .app_data(Data::clone(&db_pool))
                .app_data(Data::clone(&email_client))
                .app_data(Data::clone(&token_keys))
                .app_data(Data::clone(&cookie_policy))
        })
        .listen(listener)?
        .run();

        Ok(server)
    }

    pub fn addr(&self) -> SocketAddr {
        self.socket_addr
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        self.server.await?;
        Ok(())
    }
}

/// Front-ends on the allowed origins may call the API with the token cookie.
fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}
