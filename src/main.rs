use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use petcare_backend::auth::TokenVerifier;
use petcare_backend::config::AppConfig;
use petcare_backend::{create_pool, db, handlers};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        db::run_migrations(&db)
            .await
            .map_err(std::io::Error::other)?;
        tracing::info!("Migrations applied");
    }

    let db_data = web::Data::new(db);
    let verifier = web::Data::new(TokenVerifier::from_settings(&config.auth));

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(verifier.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
