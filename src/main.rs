//!
//! Fund disbursement tracking REST service.
//! Reads configuration from TOML file (~/.config/fundtrack/config.toml).

use std::sync::Arc;
use std::time::Duration;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use fundtrack::application::services::{DisbursementService, ReportService};
use fundtrack::application::session::SessionStore;
use fundtrack::auth::jwt::JwtConfig;
use fundtrack::config::AppConfig;
use fundtrack::infrastructure::database::migrator::Migrator;
use fundtrack::shared::shutdown::ShutdownCoordinator;
use fundtrack::{
    create_api_router, default_config_path, init_database, DatabaseConfig, DbAuthProvider,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("FUNDTRACK_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Fund Disbursement Tracking Service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "fundtrack".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Initialize repository provider
    let repos: Arc<dyn fundtrack::domain::RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Create default admin user if no users exist
    create_default_admin(repos.as_ref(), &app_cfg).await;

    // ── Session store with database-backed credential verification ──
    let auth_provider = Arc::new(DbAuthProvider::new(repos.clone()));
    let sessions = Arc::new(
        SessionStore::new(auth_provider)
            .with_verify_timeout(Duration::from_secs(app_cfg.security.auth_timeout_secs)),
    );

    // Initialize services
    let disbursement_service = Arc::new(DisbursementService::new(repos.clone()));
    let report_service = Arc::new(ReportService::new(repos.clone()));

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();

    // Start listening for shutdown signals (SIGTERM, SIGINT)
    shutdown.start_signal_listener();

    // Create REST API router
    let api_router = create_api_router(
        repos,
        sessions,
        disbursement_service,
        report_service,
        jwt_config,
        prometheus_handle,
    );

    // Start REST API server with graceful shutdown
    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("REST API server received shutdown signal");
    });

    if let Err(e) = api_server.await {
        error!("REST API server error: {}", e);
    }

    // Perform final cleanup
    info!("Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Fund Disbursement Tracking Service shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(
    repos: &dyn fundtrack::domain::RepositoryProvider,
    app_cfg: &AppConfig,
) {
    use fundtrack::auth::password::hash_password;
    use fundtrack::domain::access::Role;
    use fundtrack::domain::user::NewUser;

    let users_count = repos.users().count().await.unwrap_or(0);

    if users_count == 0 {
        info!("Creating default admin user...");

        let password_hash = match hash_password(&app_cfg.admin.password) {
            Ok(hash) => hash,
            Err(e) => {
                error!("Failed to hash admin password: {}", e);
                return;
            }
        };

        let admin = NewUser {
            email: app_cfg.admin.email.clone(),
            username: app_cfg.admin.username.clone(),
            first_name: app_cfg.admin.first_name.clone(),
            last_name: app_cfg.admin.last_name.clone(),
            password_hash,
            role: Role::Admin,
            department: None,
        };

        match repos.users().create(admin).await {
            Ok(user) => {
                info!("Default admin created: {}", user.email);
                warn!("Please change the admin password immediately!");
            }
            Err(e) => {
                error!("Failed to create admin user: {}", e);
            }
        }
    }
}
