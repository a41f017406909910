//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, web};
use tracing::info;

/// HTTP server wrapping the shared application state
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Bind and run until shutdown.
    pub async fn start(self) -> Result<()> {
        let state = web::Data::new(self.state);
        let cors_enabled = self.config.cors_enabled;

        info!(
            "Starting HTTP server on {}:{}",
            self.config.host, self.config.port
        );

        let mut server = ActixHttpServer::new(move || {
            let cors = if cors_enabled {
                Cors::permissive()
            } else {
                Cors::default()
            };
            App::new()
                .app_data(state.clone())
                .wrap(cors)
                .configure(routes::configure)
        })
        .bind((self.config.host.clone(), self.config.port))?;

        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        server.run().await?;
        Ok(())
    }
}

/// Build and run the server from configuration.
pub async fn run_server(config: Config) -> Result<()> {
    HttpServer::new(&config)?.start().await
}
