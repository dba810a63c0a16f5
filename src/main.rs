mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use crate::service::{
    engagement_service::EngagementService,
    identity::{CognitoIdentity, IdentityProvider},
    notification_service::NotificationService,
    payment_service::PaymentService,
    provider_service::ProviderService,
    report_service::ReportService,
    review_service::ReviewService,
    storage::{ObjectStorage, S3ObjectStorage},
};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub storage: Arc<dyn ObjectStorage>,
    // Services
    pub engagement_service: Arc<EngagementService>,
    pub review_service: Arc<ReviewService>,
    pub report_service: Arc<ReportService>,
    pub notification_service: Arc<NotificationService>,
    pub provider_service: Arc<ProviderService>,
    pub payment_service: Arc<PaymentService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("env", &self.env)
            .field("db_client", &self.db_client)
            .finish()
    }
}

impl AppState {
    pub fn new(
        db_client: DBClient,
        config: Config,
        storage: Arc<dyn ObjectStorage>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let db_client_arc = Arc::new(db_client);

        let notification_service = Arc::new(NotificationService::new(
            db_client_arc.clone(),
            storage.clone(),
            config.presign_ttl_secs,
        ));
        let engagement_service = Arc::new(EngagementService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(
            db_client_arc.clone(),
            storage.clone(),
            config.presign_ttl_secs,
        ));
        let report_service = Arc::new(ReportService::new(
            db_client_arc.clone(),
            config.admin_recipient_id,
        ));
        let provider_service = Arc::new(ProviderService::new(
            db_client_arc.clone(),
            storage.clone(),
            identity,
            config.cognito_provider_group.clone(),
            config.presign_ttl_secs,
        ));
        let payment_service = Arc::new(PaymentService::new(db_client_arc.clone(), &config));

        Self {
            env: config,
            db_client: db_client_arc,
            storage,
            engagement_service,
            review_service,
            report_service,
            notification_service,
            provider_service,
            payment_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let storage: Arc<dyn ObjectStorage> = Arc::new(S3ObjectStorage::new(
        config.s3_bucket.clone(),
        &aws_config,
    ));
    let identity: Arc<dyn IdentityProvider> = Arc::new(CognitoIdentity::new(
        config.cognito_user_pool_id.clone(),
        &aws_config,
    ));

    let allowed_origins = vec![
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone(), storage, identity));

    let app = create_router(app_state).layer(cors);

    println!("🚀 Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
