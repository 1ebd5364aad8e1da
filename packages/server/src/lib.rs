#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web upload server for bank statement extraction.
//!
//! Exposes `POST /upload`, which accepts a multipart form with a PDF in the
//! `file` field and responds with the parsed transactions as JSON. Every
//! response carries `Access-Control-Allow-Origin: *` and `OPTIONS` requests
//! on any path are answered as CORS preflights.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use bank_statement_parser::{PageTextSource, StatementExtractor, StatementLayout};
use bank_statement_pdf::{PdfError, PdfTextSource};

/// Default cap on the size of an uploaded statement.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Text source shared by all workers.
pub type SharedTextSource = Arc<dyn PageTextSource<Error = PdfError> + Send + Sync>;

/// Shared application state.
pub struct AppState {
    /// Statement parser configured with the active layout.
    pub extractor: Arc<StatementExtractor>,
    /// PDF text extraction backend.
    pub text_source: SharedTextSource,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Creates state backed by the `pdf_extract` text source.
    #[must_use]
    pub fn new(extractor: StatementExtractor, max_upload_bytes: usize) -> Self {
        Self::with_text_source(extractor, Arc::new(PdfTextSource::new()), max_upload_bytes)
    }

    /// Creates state with a custom text source.
    #[must_use]
    pub fn with_text_source(
        extractor: StatementExtractor,
        text_source: SharedTextSource,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            extractor: Arc::new(extractor),
            text_source,
            max_upload_bytes,
        }
    }
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Optional TOML statement layout replacing the built-in one.
    pub layout_path: Option<PathBuf>,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            layout_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `STATEMENT_LAYOUT` and
    /// `MAX_UPLOAD_BYTES`, falling back to defaults for unset or invalid
    /// values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            layout_path: std::env::var_os("STATEMENT_LAYOUT").map(PathBuf::from),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    /// Loads the configured layout, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns a [`bank_statement_parser::LayoutError`] if the layout file
    /// cannot be read or parsed.
    pub fn layout(&self) -> Result<StatementLayout, bank_statement_parser::LayoutError> {
        self.layout_path
            .as_deref()
            .map_or_else(|| Ok(StatementLayout::default()), StatementLayout::load)
    }
}

/// Registers the server's routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/upload")
            .route(web::post().to(handlers::upload))
            .default_service(web::route().to(handlers::fallback)),
    )
    .default_service(web::route().to(handlers::fallback));
}

/// Middleware adding the CORS origin header to every response.
#[must_use]
pub fn cors_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
}

/// Starts the statement upload server.
///
/// Loads the statement layout and starts the Actix-Web HTTP server. This
/// is a regular async function; the caller provides the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the layout cannot be loaded, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let layout = config.layout().map_err(std::io::Error::other)?;

    match &config.layout_path {
        Some(path) => log::info!("Using statement layout from {}", path.display()),
        None => log::info!("Using built-in statement layout"),
    }

    let state = web::Data::new(AppState::new(
        StatementExtractor::new(layout),
        config.max_upload_bytes,
    ));

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
