use anyhow::{anyhow, Context, Result};
use axum::{middleware::from_fn, routing::get, Router};
use modkit::http::request_id::{self, MakeReqId};
use modkit::{ConfigProvider, DbModule, Module, ModuleCtxBuilder, RestfulModule};
use runtime::{AppConfig, CliArgs, DatabaseConfig, ServerConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

const MEMORY_DSN: &str = "sqlite::memory:";

/// Resolve the configured DSN: relative sqlite paths are anchored at `base_dir`
/// and opened in create mode.
pub fn database_url(cfg: &DatabaseConfig, base_dir: &Path, create_dirs: bool) -> Result<String> {
    let dsn = cfg.url.trim();
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let Some(rest) = dsn.strip_prefix("sqlite://") else {
        return Ok(dsn.to_string());
    };

    let (path_str, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path_str.is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    let mut path = PathBuf::from(path_str);
    if path.is_relative() {
        path = base_dir.join(path);
    }
    if create_dirs {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let mut out = format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

pub async fn connect(config: &AppConfig, mock: bool) -> Result<DatabaseConnection> {
    let (url, max_conns) = if mock {
        // one connection: every in-memory connection is its own database
        (MEMORY_DSN.to_string(), 1)
    } else {
        let db = config
            .database
            .as_ref()
            .ok_or_else(|| anyhow!("database section is required by the profiles module"))?;
        let url = database_url(db, Path::new(&config.server.home_dir), true)?;
        let max_conns = if url == MEMORY_DSN { 1 } else { db.max_conns.unwrap_or(10) };
        (url, max_conns)
    };
    let acquire_ms = config
        .database
        .as_ref()
        .and_then(|d| d.acquire_timeout_ms)
        .unwrap_or(5000);

    tracing::info!("Connecting to database: {}", url);
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_millis(acquire_ms))
        .sqlx_logging(false);
    let db = Database::connect(opts).await?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

/// Initialize modules, run their migrations and mount their routes behind the
/// shared middleware stack.
pub async fn build_router(
    config: &AppConfig,
    db: DatabaseConnection,
    cancel: CancellationToken,
) -> Result<Router> {
    let provider: Arc<dyn ConfigProvider> = Arc::new(config.modules.clone());
    let ctx = ModuleCtxBuilder::new(cancel)
        .with_db(db.clone())
        .with_config_provider(provider)
        .build();

    let profiles = profiles::Profiles::default();
    let profiles_ctx = ctx.clone().for_module(profiles.name());
    profiles.init(&profiles_ctx).await?;
    profiles.migrate(&db).await?;

    let mut router = Router::new().route("/healthz", get(|| async { "ok" }));
    router = profiles.register_rest(&profiles_ctx, router)?;

    Ok(with_middleware(router, &config.server))
}

/// Wrap `router` in the shared middleware stack.
///
/// Outermost to innermost:
/// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit
/// Later `layer` calls wrap earlier ones, so they are added innermost first.
pub fn with_middleware(mut router: Router, server: &ServerConfig) -> Router {
    router = router.layer(RequestBodyLimitLayer::new(server.body_limit_bytes));
    if server.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }
    if server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(server.timeout_sec)));
    }
    let x_request_id = request_id::header();
    router = router.layer(from_fn(request_id::push_req_id_to_extensions));
    router = router.layer(request_id::create_trace_layer("legalwatch"));
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router.layer(SetRequestIdLayer::new(x_request_id, MakeReqId))
}

pub async fn run(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let cancel = CancellationToken::new();
    let db = connect(&config, args.mock).await?;
    let router = build_router(&config, db, cancel.clone()).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);

    let shutdown = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = modkit::shutdown::wait_for_shutdown().await {
                tracing::warn!("Signal handler failed: {e}");
            }
            shutdown.cancel();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
