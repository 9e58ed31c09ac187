mod config;
mod error;
mod pipeline;
mod services;
mod store;

use crate::config::{presence, AppConfig, DatastoreConfig};
use crate::store::postgrest::PostgrestStore;
use crate::store::sqlite::SqliteStore;
use crate::store::ContactStore;
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Serves the embedded dashboard. Unknown paths fall back to `index.html` so
/// the client-side router can resolve them.
async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

fn build_store(config: &DatastoreConfig) -> Result<Arc<dyn ContactStore>, store::DatastoreError> {
    let store: Arc<dyn ContactStore> = match config {
        DatastoreConfig::Sqlite { path } => Arc::new(SqliteStore::open(path)?),
        DatastoreConfig::Postgrest { url, service_key } => {
            Arc::new(PostgrestStore::new(url, service_key)?)
        }
    };
    Ok(store)
}

fn invalid_config(err: impl std::fmt::Display) -> std::io::Error {
    error!("{}", err);
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(invalid_config)?;
    info!("PORT: {}", config.port);
    let (supabase_url, supabase_key) = match &config.datastore {
        DatastoreConfig::Postgrest { url, service_key } => {
            (Some(url.as_str()), Some(service_key.as_str()))
        }
        DatastoreConfig::Sqlite { .. } => (None, None),
    };
    info!("SUPABASE_URL: {}", presence(supabase_url));
    info!("SUPABASE_SERVICE_KEY: {}", presence(supabase_key));

    let store = build_store(&config.datastore).map_err(invalid_config)?;
    info!(
        "Using {} datastore, import batch size {}, strict dates {}",
        store.backend_tag(),
        config.import.batch_size,
        config.import.strict_dates
    );

    let url = format!("http://{}:{}", config.host, config.port);
    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    info!("Server running at {}", url);

    let store = web::Data::from(store);
    let import_settings = web::Data::new(config.import.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(services::json_config())
            .app_data(store.clone())
            .app_data(import_settings.clone())
            .service(services::contacts::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
