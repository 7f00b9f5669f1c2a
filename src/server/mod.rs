pub mod config;
pub mod request_logger;

use crate::{
    auth::{JwtService, JwtServiceImpl, OAuthService, session_auth_middleware},
    books::BookService,
    config::Config,
    database::DatabaseManager,
    error::AppError,
    health::HealthService,
    jobs::{AuthCleanupJob, Job, JobScheduler},
    routes::{create_auth_routes, create_health_routes, create_protected_api_routes},
    server::request_logger::request_response_logger,
    shutdown::{ShutdownCoordinator, ShutdownManager},
    storage::{StorageFactory, Stores, factory::StorageHandles},
    utils::request_id::request_id_middleware,
};
use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use url::Url;

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub jwt_service: Arc<dyn JwtService>,
    pub oauth_service: Arc<OAuthService>,
    pub book_service: Arc<BookService>,
    pub stores: Stores,
    pub database: Option<Arc<dyn DatabaseManager>>,
    pub health_service: Arc<HealthService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
    pub job_scheduler: Arc<JobScheduler>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let storage = StorageFactory::create_from_config(&config).await?;
        Self::with_storage(config, storage).await
    }

    /// Wire every service on top of already opened storage
    pub async fn with_storage(config: Config, storage: StorageHandles) -> Result<Self, AppError> {
        let jwt_impl = Arc::new(JwtServiceImpl::from_config(&config.jwt).map_err(|e| {
            AppError::Config(::config::ConfigError::Message(format!(
                "Invalid JWT configuration: {}",
                e
            )))
        })?);
        let jwt_service: Arc<dyn JwtService> = jwt_impl.clone();

        let stores = storage.stores;

        let oauth_service = Arc::new(OAuthService::new(
            config.oauth.google.clone(),
            jwt_service.clone(),
            stores.states.clone(),
            stores.blacklist.clone(),
        )?);
        let book_service = Arc::new(BookService::new(stores.books.clone()));

        let health_service = Arc::new(HealthService::new());
        if let Some(database) = &storage.database {
            health_service.register(database.clone()).await;
        }
        health_service.register(jwt_impl.health_checker()).await;
        health_service
            .register(oauth_service.health_checker())
            .await;

        let shutdown_coordinator = Arc::new(ShutdownCoordinator::new());
        let job_scheduler = Arc::new(JobScheduler::with_shutdown_coordinator(
            config.jobs.clone(),
            shutdown_coordinator.subscribe(),
        ));

        let database = storage
            .database
            .map(|database| database as Arc<dyn DatabaseManager>);

        Ok(Self {
            config: Arc::new(config),
            jwt_service,
            oauth_service,
            book_service,
            stores,
            database,
            health_service,
            shutdown_coordinator,
            job_scheduler,
        })
    }

    /// Jobs run by the scheduler while the server is up
    pub fn background_jobs(&self) -> Vec<Arc<dyn Job>> {
        vec![Arc::new(AuthCleanupJob::new(
            self.stores.states.clone(),
            self.stores.blacklist.clone(),
            self.jwt_service.token_ttl(),
        ))]
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let mut shutdown_manager = ShutdownManager::new(Duration::from_secs(30));
        shutdown_manager.register_server_components(self);

        self.job_scheduler.start(self.background_jobs()).await?;

        let app = self.create_app();

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Server listening on http://{}", addr);

        let signal_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            signal_coordinator.wait_for_shutdown_signal().await;
        });

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_coordinator.wait_for_shutdown().await;
            info!("Graceful shutdown initiated");
        })
        .await;

        if let Err(e) = &result {
            error!("Server error: {}", e);
        }

        shutdown_manager.shutdown_all().await;
        info!("Server shutdown complete");

        result.map_err(|e| AppError::Internal(format!("Server error: {}", e)))
    }

    pub fn create_app(&self) -> Router {
        let app = Router::new()
            .nest("/auth", create_auth_routes())
            .nest("/api", self.protected_api_routes())
            .nest("/health", create_health_routes())
            .with_state(self.clone());

        self.add_conditional_middleware(app)
    }

    fn protected_api_routes(&self) -> Router<Server> {
        create_protected_api_routes().layer(middleware::from_fn_with_state(
            self.clone(),
            session_auth_middleware,
        ))
    }

    fn add_conditional_middleware(&self, mut app: Router) -> Router {
        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }
        // Outside the logger so every log line carries the id
        app = app.layer(middleware::from_fn(request_id_middleware));
        if let Some(cors) = self.cors_layer() {
            app = app.layer(cors);
        }
        app
    }

    /// CORS for the configured frontend origin, with credentials for the session cookie
    fn cors_layer(&self) -> Option<CorsLayer> {
        let frontend_url = self.config.frontend.url.as_deref()?;

        let origin = match Url::parse(frontend_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(e) => {
                warn!(url = %frontend_url, error = %e, "Invalid frontend url, CORS disabled");
                return None;
            }
        };
        let origin = HeaderValue::from_str(&origin).ok()?;

        Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestServerBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_without_token() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_books_require_token() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let response = app
            .oneshot(Request::builder().uri("/api/books").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_registered_health_checkers() {
        let server = TestServerBuilder::new().build().await;
        let mut checkers = server.health_service.registered_checkers().await;
        checkers.sort();
        assert_eq!(checkers, vec!["database", "jwt", "oauth"]);

        let server = TestServerBuilder::new().with_memory_storage().build().await;
        assert!(server.database.is_none());
        let mut checkers = server.health_service.registered_checkers().await;
        checkers.sort();
        assert_eq!(checkers, vec!["jwt", "oauth"]);
    }

    #[tokio::test]
    async fn test_cors_preflight_for_frontend_origin() {
        let server = TestServerBuilder::new()
            .with_memory_storage()
            .with_frontend_url("http://localhost:3000/library")
            .build()
            .await;
        let app = server.create_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/books")
                    .header("Origin", "http://localhost:3000")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_new_rejects_missing_jwt_secret() {
        let mut config = Config::default();
        config.storage.backend = "memory".to_string();

        let result = Server::new(config).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
