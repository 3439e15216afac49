//! Reusable server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, store
//! selection and migrations, the REST API listener, and graceful shutdown.
//! The CLI binaries only parse arguments and call into this.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::{FileExporter, SharedUserService, UserService};
use crate::config::AppConfig;
use crate::domain::UserRepositoryInterface;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryUserRepository, SeaOrmUserRepository};
use crate::interfaces::http::create_api_router;
use crate::interfaces::http::modules::metrics::describe_user_metrics;
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running service.
///
/// # Examples
///
/// ```rust,no_run
/// use oib_users::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub user_service: SharedUserService,
    /// The configuration the server was started with.
    pub config: AppConfig,

    local_addr: SocketAddr,
    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service:
    ///
    /// 1. Install the Prometheus recorder
    /// 2. Open the user store (SQLite via SeaORM, or in-memory) and migrate
    /// 3. Bind and serve the REST API with Swagger UI
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting OIB user service...");

        let prometheus_handle = prometheus_handle();

        // ── User store ─────────────────────────────────────────
        let (repo, db): (Arc<dyn UserRepositoryInterface>, Option<DatabaseConnection>) =
            if app_cfg.database.in_memory {
                info!("Using in-memory user store; data is lost on exit");
                (Arc::new(InMemoryUserRepository::new()), None)
            } else {
                let db = init_database(&app_cfg.database.to_database_config()).await?;
                if opts.auto_migrate {
                    info!("Running database migrations...");
                    Migrator::up(&db, None).await?;
                    info!("Migrations completed");
                }
                (Arc::new(SeaOrmUserRepository::new(db.clone())), Some(db))
            };

        // ── Services ───────────────────────────────────────────
        let exporter = FileExporter::new(app_cfg.export.directory.clone());
        if !exporter.directory().is_dir() {
            warn!(
                directory = %exporter.directory().display(),
                "Export directory does not exist; file generation will fail until it is created"
            );
        }
        let user_service: SharedUserService = Arc::new(UserService::new(repo, exporter));

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(user_service.clone(), prometheus_handle);

        let api_addr = app_cfg.api_address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            user_service,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Address the API actually bound to (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// In-flight requests get `shutdown_timeout` seconds to finish before the
    /// task is aborted.
    pub async fn wait(self) {
        info!("Waiting for server tasks to complete...");

        let mut api_task = self.api_task;
        let drained = self
            .shutdown
            .run_with_timeout(async {
                match (&mut api_task).await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;
        if !drained {
            api_task.abort();
        }

        if let Some(db) = self.db {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        }

        info!("OIB user service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down OIB user service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can only be installed once per process, so restarts
/// within the same process reuse the first handle. If another recorder is
/// already installed the service falls back to a detached one.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                describe_user_metrics();
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!("Could not install Prometheus recorder, metrics will be empty: {}", e);
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

/// Initialize tracing from the logging config.
///
/// `RUST_LOG` wins over the configured level when set. Call once at startup,
/// before [`ServerHandle::start`].
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn in_memory_config(export_dir: &std::path::Path) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 0;
        cfg.server.shutdown_timeout = 5;
        cfg.database.in_memory = true;
        cfg.export.directory = export_dir.to_path_buf();
        cfg
    }

    async fn raw_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let req = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(req.as_bytes()).await.unwrap();
        let mut buf = String::new();
        stream.read_to_string(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn starts_serves_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let handle = ServerHandle::start(ServerOptions {
            config: in_memory_config(dir.path()),
            auto_migrate: true,
        })
        .await
        .unwrap();

        assert!(handle.is_running());
        let response = raw_get(handle.local_addr(), "/health").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);

        let response = raw_get(handle.local_addr(), "/api/user/17748241351").await;
        assert!(response.starts_with("HTTP/1.1 404"), "{}", response);

        tokio::time::timeout(std::time::Duration::from_secs(10), handle.shutdown())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sqlite_memory_store_is_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = in_memory_config(dir.path());
        cfg.database.in_memory = false;
        cfg.database.url = "sqlite::memory:".into();
        cfg.database.max_connections = 1;

        let handle = ServerHandle::start(ServerOptions {
            config: cfg,
            auto_migrate: true,
        })
        .await
        .unwrap();

        let user = crate::domain::User::new("Darko", "Kozul", "17748241351", "1");
        let saved = handle.user_service.save(user).await.unwrap();
        assert!(saved.id > 0);

        handle.shutdown().await;
    }
}
