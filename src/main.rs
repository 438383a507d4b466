use std::sync::Arc;
use std::time::Duration;

use secure_login::config::{init_db, Config};
use secure_login::modules::auth::crud::{PgUserRepository, PgVerificationCodeRepository};
use secure_login::modules::auth::AuthService;
use secure_login::modules::products::crud::PgProductRepository;
use secure_login::modules::products::ProductService;
use secure_login::services::email::{DisabledTransport, EmailService, SmtpMailer};
use secure_login::services::jwt::JwtService;
use secure_login::workers::spawn_code_cleanup;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secure_login=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");
    tracing::info!("Connected to Postgres");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");

    let jwt_service = JwtService::new(
        config.jwt_access_secret.clone(),
        config.jwt_refresh_secret.clone(),
        &config.jwt_access_expiration,
        &config.jwt_refresh_expiration,
    )
    .expect("Invalid JWT configuration");

    let email_service = match &config.smtp {
        Some(smtp) => {
            let mailer = SmtpMailer::from_config(smtp).expect("Failed to build SMTP transport");
            EmailService::new(Arc::new(mailer), smtp.from.clone())
        }
        None => {
            tracing::warn!("SMTP configuration incomplete, email sending disabled");
            EmailService::new(Arc::new(DisabledTransport), "noreply@localhost")
        }
    };

    let code_repo = Arc::new(PgVerificationCodeRepository::new(db.clone()));

    let auth_service = AuthService::new(
        Arc::new(PgUserRepository::new(db.clone())),
        code_repo.clone(),
        email_service,
        Arc::new(jwt_service),
        config.mfa_code_expiration_minutes,
    );

    let product_service = ProductService::new(Arc::new(PgProductRepository::new(db.clone())));

    spawn_code_cleanup(code_repo, Duration::from_secs(3600));

    let app = secure_login::create_app(auth_service, product_service).await;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
