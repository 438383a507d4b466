use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};

use secure_login::modules::auth::interface::{
    Result as AuthResult, UserRepository, VerificationCodeRepository,
};
use secure_login::modules::auth::model::{CodeType, User, VerificationCode};
use secure_login::modules::auth::AuthService;
use secure_login::modules::products::interface::{ProductRepository, Result as ProductResult};
use secure_login::modules::products::model::Product;
use secure_login::modules::products::ProductService;
use secure_login::services::email::{EmailService, MailTransport, OutgoingEmail};
use secure_login::services::jwt::JwtService;

// =============================================================================
// IN-MEMORY REPOSITORIES
// =============================================================================

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[allow(dead_code)]
impl InMemoryUsers {
    pub fn deactivate(&self, email: &str) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(user) = rows.iter_mut().find(|u| u.email == email) {
            user.is_active = false;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: &User) -> AuthResult<()> {
        self.rows.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> AuthResult<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|u| u.email == email))
    }
}

#[derive(Default)]
pub struct InMemoryCodes {
    rows: Mutex<Vec<VerificationCode>>,
}

#[allow(dead_code)]
impl InMemoryCodes {
    /// Backdates every stored code, as if its expiry window had elapsed.
    pub fn expire_all(&self) {
        let mut rows = self.rows.lock().unwrap();
        for code in rows.iter_mut() {
            code.expires_at = Utc::now() - Duration::seconds(1);
        }
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl VerificationCodeRepository for InMemoryCodes {
    async fn replace_active(&self, code: &VerificationCode) -> AuthResult<()> {
        // Single locked section: invalidate + insert are atomic, matching the
        // SQL repository's transaction.
        let mut rows = self.rows.lock().unwrap();
        for row in rows.iter_mut() {
            if row.user_id == code.user_id
                && row.code_type == code.code_type
                && row.is_active(code.created_at)
            {
                row.is_used = true;
            }
        }
        rows.push(code.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        user_id: &str,
        code: &str,
        code_type: CodeType,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<VerificationCode>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| {
                row.user_id == user_id
                    && row.code == code
                    && row.code_type == code_type
                    && row.is_active(now)
            })
            .cloned())
    }

    async fn mark_used(&self, id: &str) -> AuthResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            row.is_used = true;
        }
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.expires_at >= now);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryProducts {
    rows: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn list(&self) -> ProductResult<Vec<Product>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create(&self, product: &Product) -> ProductResult<()> {
        self.rows.lock().unwrap().push(product.clone());
        Ok(())
    }
}

// =============================================================================
// RECORDING MAIL TRANSPORT
// =============================================================================

#[derive(Default)]
pub struct RecordingMailbox {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[allow(dead_code)]
impl RecordingMailbox {
    pub fn sent_to(&self, email: &str) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == email)
            .cloned()
            .collect()
    }

    /// Extracts the 6-digit code from the most recent email to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        let messages = self.sent_to(email);
        let html = &messages.last()?.html;
        extract_six_digits(html)
    }
}

#[async_trait]
impl MailTransport for RecordingMailbox {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), secure_login::services::email::EmailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

fn extract_six_digits(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut run_start = 0;
    let mut run_len = 0;

    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len == 6 && !bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
                return Some(text[run_start..=i].to_string());
            }
        } else {
            run_len = 0;
        }
    }

    None
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub auth: AuthService,
    pub users: Arc<InMemoryUsers>,
    pub codes: Arc<InMemoryCodes>,
    pub mailbox: Arc<RecordingMailbox>,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let codes = Arc::new(InMemoryCodes::default());
        let mailbox = Arc::new(RecordingMailbox::default());

        let jwt = JwtService::new(
            "test-access-secret".to_string(),
            "test-refresh-secret".to_string(),
            "15m",
            "7d",
        )
        .expect("valid jwt config");

        let email = EmailService::new(mailbox.clone(), "Secure Login <noreply@test.local>");

        let auth = AuthService::new(users.clone(), codes.clone(), email, Arc::new(jwt), 10);
        let products = ProductService::new(Arc::new(InMemoryProducts::default()));

        let app = secure_login::create_app(auth.clone(), products).await;
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            auth,
            users,
            codes,
            mailbox,
        }
    }

    /// Registers a user and completes both login steps, returning the issued
    /// token pair as (access, refresh).
    pub async fn register_and_authenticate(&self, email: &str) -> (String, String) {
        self.server
            .post("/auth/register")
            .json(&serde_json::json!({
                "email": email,
                "password": test_password(),
                "firstName": "Alice"
            }))
            .await;

        self.server
            .post("/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": test_password()
            }))
            .await;

        let code = self.mailbox.last_code_for(email).expect("mfa code emailed");

        let response = self
            .server
            .post("/auth/verify-mfa")
            .json(&serde_json::json!({ "email": email, "code": code }))
            .await;

        let body: serde_json::Value = response.json();
        (
            body["tokens"]["accessToken"].as_str().unwrap().to_string(),
            body["tokens"]["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}

// Helper to generate unique test email
#[allow(dead_code)]
pub fn test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

// Helper to generate test password
#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "TestPassword123!"
}
