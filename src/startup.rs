use std::sync::Arc;
use std::{io, net};

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::root_path::RootPath;
use crate::routes::{healthcheck, logout, LogoutHandler};
use crate::session::TokenVerifier;
use crate::settings_store::SettingsStore;

/// Application
pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    /// Build an application based on settings
    pub fn build(config: Settings) -> anyhow::Result<Self> {
        let settings_store = Arc::new(config.application.settings_store());
        let verifier = Arc::new(config.session.verifier());

        Self::build_with_collaborators(config, settings_store, verifier)
    }

    /// Build an application based on settings, a settings store and a token verifier
    pub fn build_with_collaborators(
        config: Settings,
        settings_store: Arc<dyn SettingsStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> anyhow::Result<Self> {
        let handler = LogoutHandler::new(
            settings_store,
            verifier,
            config.application.root_path(),
        );

        // Run the HTTP server and return its data
        let listener = net::TcpListener::bind(format!(
            "{}:{}",
            config.application.app_host, config.application.app_port
        ))?;
        let port = listener.local_addr()?.port();
        let server = run_server(listener, config.application.root_path(), handler)?;
        Ok(Self { server, port })
    }

    /// Get application port
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Run application until it is stopped
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server.await
    }
}

/// Run the HTTP server
pub fn run_server(
    listener: net::TcpListener,
    root_path: RootPath,
    handler: LogoutHandler,
) -> anyhow::Result<Server> {
    // Prepare data to be added the application context
    let handler = web::Data::new(handler);
    let scope = root_path.scope();

    // Start the HTTP server
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/healthcheck", web::get().to(healthcheck))
            .service(
                web::scope(&scope)
                    .route("/api/logout", web::get().to(logout))
                    .route("/api/logout", web::post().to(logout)),
            )
            .app_data(handler.clone())
    })
    .listen(listener)?
    .run())
}
