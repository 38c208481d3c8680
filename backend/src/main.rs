mod archive;
mod config;
mod db;
mod error;
mod services;

use crate::archive::state::{start_archive_worker, ArchiveState};
use crate::config::Config;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{error, info};
use mime_guess::from_path;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

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
        // Client-side routes such as /sign/{id} fall back to the app shell
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();
    let url = config.url();

    // Fail fast on an unusable database instead of on the first request
    if let Err(e) = db::open(&config.database_path) {
        error!("cannot open database {}: {}", config.database_path.display(), e);
        return Err(std::io::Error::other(e));
    }
    std::fs::create_dir_all(&config.storage_dir)?;
    std::fs::create_dir_all(&config.archive_dir)?;

    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&url_clone);
        });
    }

    let (archive_state, rx) = ArchiveState::new();
    let statuses = archive_state.statuses.clone();
    let database_path = config.database_path.clone();
    let archive_dir = config.archive_dir.clone();
    tokio::spawn(async move {
        start_archive_worker(statuses, database_path, archive_dir, rx).await;
    });

    info!("Server running at {}", url);
    let bind = (config.host.clone(), config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(archive_state.clone()))
            .service(services::templates::configure_routes())
            .service(services::documents::configure_routes())
            .service(services::sessions::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
    .bind(bind)?
    .run()
    .await
}
