use actix_web::{web, App, HttpRequest, HttpServer, Responder};
use diesel_migrations::MigrationHarness;
use tracing_subscriber::EnvFilter;

use gigboard::db::{build_pool, MIGRATIONS};
use gigboard::routes;

#[actix_web::get("/")]
async fn index(_req: HttpRequest) -> impl Responder {
    "Welcome!"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    // Setup DB pool from DATABASE_URL env
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "gigboard.db".to_string());
    let pool = build_pool(&database_url, 8).expect("Failed to create DB pool");

    {
        let mut conn = pool.get().expect("Failed to check out a connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
    }

    tracing::info!("Starting server on port {port}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .service(index)
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .workers(1)
    .run()
    .await
}
