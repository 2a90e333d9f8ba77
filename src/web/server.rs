//! Web server for formbridge.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::auth::SessionManager;
use crate::config::Config;
use crate::db::Database;
use crate::mail::Mailer;
use crate::relay::{FixedWindowLimiter, RateLimitConfig};
use crate::{BridgeError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// The API server.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    limiter: Arc<FixedWindowLimiter>,
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Assemble a server from configuration and its collaborators.
    pub fn new(config: &Config, db: Database, mailer: Mailer) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| BridgeError::Config(format!("invalid server address: {e}")))?;

        let sessions =
            SessionManager::new(&config.auth.jwt_secret, config.auth.session_ttl_days);

        let app_state = Arc::new(AppState::new(
            db,
            sessions,
            mailer,
            config.mail.frontend_url.clone(),
            config.auth.secure_cookies,
        ));

        let limiter = Arc::new(FixedWindowLimiter::new(RateLimitConfig::new(
            config.relay.rate_limit_max_requests,
            config.relay.rate_limit_window_secs,
        )));

        Ok(Self {
            addr,
            app_state,
            limiter,
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<()> {
        self.limiter.clone().start_cleanup_task();

        let router = create_router(self.app_state, self.limiter, &self.cors_origins);
        let listener = TcpListener::bind(self.addr).await?;
        info!("API server listening on {}", self.addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}
