use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Object storage
    pub s3_bucket: String,
    pub presign_ttl_secs: u64,
    // Identity provider
    pub cognito_user_pool_id: String,
    pub cognito_provider_group: String,
    // Payment provider
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    // Recipient of report alerts
    pub admin_recipient_id: Uuid,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let s3_bucket = std::env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME must be set");
        let presign_ttl_secs = std::env::var("PRESIGN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3600);

        let cognito_user_pool_id = std::env::var("COGNITO_USER_POOL_ID")
            .unwrap_or_else(|_| "".to_string());
        let cognito_provider_group = std::env::var("COGNITO_PROVIDER_GROUP")
            .unwrap_or_else(|_| "Providers".to_string());

        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY")
            .unwrap_or_else(|_| "sk_test_placeholder".to_string());
        let stripe_webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .unwrap_or_else(|_| "whsec_placeholder".to_string());

        let admin_recipient_id = std::env::var("ADMIN_RECIPIENT_ID")
            .expect("ADMIN_RECIPIENT_ID must be set")
            .parse::<Uuid>()
            .expect("ADMIN_RECIPIENT_ID must be a valid UUID");

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: 8000,
            s3_bucket,
            presign_ttl_secs,
            cognito_user_pool_id,
            cognito_provider_group,
            stripe_secret_key,
            stripe_webhook_secret,
            admin_recipient_id,
        }
    }
}
