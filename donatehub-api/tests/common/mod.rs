/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - Test database setup and per-test cleanup
/// - Test NGO and donor accounts with JWT tokens
/// - Helpers for driving the router and parsing the response envelope

use donatehub_api::app::{build_router, AppState};
use donatehub_api::config::Config;
use donatehub_shared::auth::jwt::{create_token, Claims, TokenType};
use donatehub_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub ngo: User,
    pub donor: User,
    pub ngo_token: String,
    pub donor_token: String,
}

impl TestContext {
    /// Creates a new test context with fresh users against the test database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to the crate manifest
        sqlx::migrate!("../migrations").run(&db).await?;

        let suffix = Uuid::new_v4().simple().to_string();

        let ngo = User::create(
            &db,
            CreateUser {
                username: format!("test-ngo-{}", suffix),
                email: format!("ngo-{}@example.com", suffix),
                full_name: "Test NGO".to_string(),
                password_hash: "$argon2id$test".to_string(), // not used in tests
                role: UserRole::Ngo,
            },
        )
        .await?;

        let donor = User::create(
            &db,
            CreateUser {
                username: format!("test-donor-{}", suffix),
                email: format!("donor-{}@example.com", suffix),
                full_name: "Test Donor".to_string(),
                password_hash: "$argon2id$test".to_string(),
                role: UserRole::Donor,
            },
        )
        .await?;

        let ngo_claims = Claims::new(ngo.id, UserRole::Ngo, TokenType::Access);
        let ngo_token = create_token(&ngo_claims, &config.jwt.secret)?;

        let donor_claims = Claims::new(donor.id, UserRole::Donor, TokenType::Access);
        let donor_token = create_token(&donor_claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            ngo,
            donor,
            ngo_token,
            donor_token,
        })
    }

    /// Authorization header value for the test NGO
    pub fn ngo_auth(&self) -> String {
        format!("Bearer {}", self.ngo_token)
    }

    /// Authorization header value for the test donor
    pub fn donor_auth(&self) -> String {
        format!("Bearer {}", self.donor_token)
    }

    /// Removes everything created by this context's users
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query(
            "DELETE FROM donations WHERE donor_id = $1 \
             OR campaign_id IN (SELECT id FROM campaigns WHERE created_by = $2)",
        )
        .bind(self.donor.id)
        .bind(self.ngo.id)
        .execute(&self.db)
        .await?;

        sqlx::query("DELETE FROM campaigns WHERE created_by = $1")
            .bind(self.ngo.id)
            .execute(&self.db)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = $1 OR id = $2")
            .bind(self.ngo.id)
            .bind(self.donor.id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

/// Sends a JSON request and returns (status, parsed body)
pub async fn request(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> anyhow::Result<(axum::http::StatusCode, serde_json::Value)> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);

    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(json.to_string()))?,
        None => builder.body(axum::body::Body::empty())?,
    };

    let response = ctx.app.clone().call(request).await?;
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, json))
}

/// Creates a campaign through the API, returning its ID
pub async fn create_test_campaign(
    ctx: &TestContext,
    title: &str,
    goal_amount: i64,
    category: &str,
) -> anyhow::Result<Uuid> {
    let (status, body) = request(
        ctx,
        "POST",
        "/v1/campaigns/create",
        Some(&ctx.ngo_auth()),
        Some(serde_json::json!({
            "title": title,
            "description": format!("Test campaign: {}", title),
            "category": category,
            "goalAmount": goal_amount,
        })),
    )
    .await?;

    anyhow::ensure!(
        status == axum::http::StatusCode::CREATED,
        "campaign creation failed: {} {}",
        status,
        body
    );

    Ok(Uuid::parse_str(body["data"]["id"].as_str().unwrap())?)
}

/// Makes a donation through the API, returning (status, body)
pub async fn donate(
    ctx: &TestContext,
    campaign_id: Uuid,
    amount: i64,
) -> anyhow::Result<(axum::http::StatusCode, serde_json::Value)> {
    request(
        ctx,
        "POST",
        "/v1/donations/donate",
        Some(&ctx.donor_auth()),
        Some(serde_json::json!({
            "campaignId": campaign_id.to_string(),
            "amount": amount,
        })),
    )
    .await
}

/// Fetches a campaign's public detail view
pub async fn get_campaign(
    ctx: &TestContext,
    campaign_id: Uuid,
) -> anyhow::Result<serde_json::Value> {
    let (status, body) = request(
        ctx,
        "GET",
        &format!("/v1/campaigns/{}", campaign_id),
        None,
        None,
    )
    .await?;

    anyhow::ensure!(
        status == axum::http::StatusCode::OK,
        "campaign fetch failed: {} {}",
        status,
        body
    );

    Ok(body["data"].clone())
}
