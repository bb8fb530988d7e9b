//! 쇼핑몰 API 서버.
//!
//! 설정을 로드하고 저장소를 연결한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use shop_api::bootstrap::ensure_admin;
use shop_api::metrics::setup_metrics_recorder;
use shop_api::middleware::metrics_layer;
use shop_api::openapi::{openapi_router, OPENAPI_JSON_PATH};
use shop_api::repository::{MemoryStore, PostgresStore, SharedStorage};
use shop_api::routes::create_api_router;
use shop_api::state::AppState;
use shop_core::{init_logging, AppConfig, DatabaseConfig, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 (서명 시크릿이 없으면 여기서 종료)
    let config = AppConfig::load().context("설정 로드 실패")?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    info!("Starting Shop API server...");
    info!(config = ?config, "Configuration loaded");

    // Prometheus 메트릭 레코더 설정
    let metrics_handle = setup_metrics_recorder().context("메트릭 레코더 설치 실패")?;
    info!("Prometheus metrics recorder initialized");

    let addr = config.server.socket_addr()?;

    let store = create_store(&config.database).await?;

    if let Some((username, password)) = config.auth.bootstrap_admin() {
        ensure_admin(store.as_ref(), username, password)
            .await
            .context("관리자 계정 생성 실패")?;
    }

    let state = Arc::new(AppState::from_config(store, &config)?);
    info!(
        version = %state.version,
        backend = state.store.backend(),
        token_ttl_secs = state.token_max_age_secs(),
        "Application state initialized"
    );

    let app = create_router(
        state,
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    info!(%addr, "API server listening");
    info!("OpenAPI spec at http://{}{}", addr, OPENAPI_JSON_PATH);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// 저장소 선택.
///
/// `database.url`이 있으면 PostgreSQL에 연결하고 스키마를 준비합니다.
/// 없으면 인메모리 저장소를 사용하며 재시작 시 데이터가 사라집니다.
async fn create_store(config: &DatabaseConfig) -> anyhow::Result<SharedStorage> {
    match config.url.as_deref() {
        Some(url) => {
            let store = PostgresStore::connect(url, config).await.map_err(|e| {
                error!(error = %e, "Database connection failed");
                e
            })?;
            store.init_schema().await.context("스키마 초기화 실패")?;
            info!(
                max_connections = config.max_connections,
                "Connected to PostgreSQL"
            );
            Ok(Arc::new(store))
        }
        None => {
            warn!("database.url not set, using in-memory store (data is lost on restart)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// 전체 라우터 조합.
fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    request_timeout: Duration,
) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let api_router = create_api_router(&state).with_state(state);

    Router::new()
        .merge(metrics_router)
        .merge(api_router)
        .merge(openapi_router())
        // 메트릭 미들웨어 (모든 요청에 적용)
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(cors_layer())
}

/// CORS 레이어.
///
/// 인증 쿠키를 주고받으려면 `CORS_ORIGINS`에 허용할 origin을 지정해야 합니다.
/// 지정하지 않으면 모든 origin을 허용하되 자격 증명은 허용하지 않습니다.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        warn!("CORS_ORIGINS not set, allowing any origin without credentials (development mode)");
        layer.allow_origin(AllowOrigin::any())
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// Graceful shutdown 시그널 대기.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
