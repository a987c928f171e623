/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use donatehub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = donatehub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use donatehub_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /v1/
///     ├── /users/                    # Accounts and sessions
///     │   ├── POST /register         # public
///     │   ├── POST /login            # public
///     │   ├── POST /refresh          # public (refresh token)
///     │   ├── POST /logout           # authenticated
///     │   ├── GET  /me               # authenticated
///     │   ├── PUT  /me               # authenticated
///     │   └── POST /change-password  # authenticated
///     ├── /campaigns/
///     │   ├── GET    /               # public, paginated/filterable
///     │   ├── GET    /categories     # public
///     │   ├── GET    /my-campaigns   # ngo
///     │   ├── POST   /create         # ngo
///     │   ├── GET    /:id            # public
///     │   ├── PUT    /:id            # owning ngo
///     │   └── DELETE /:id            # owning ngo, zero donations
///     ├── /donations/
///     │   ├── POST /donate              # donor
///     │   ├── GET  /history             # donor
///     │   ├── GET  /supported-campaigns # donor
///     │   ├── GET  /campaign/:id        # authenticated (ngo must own)
///     │   └── GET  /:id                 # donor who gave or owning ngo
///     └── /dashboard/
///         ├── GET /ngo               # ngo
///         ├── GET /donor             # donor
///         └── GET /stats             # public
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public user/session endpoints
    let user_public = Router::new()
        .route("/register", post(routes::users::register))
        .route("/login", post(routes::users::login))
        .route("/refresh", post(routes::users::refresh));

    // Authenticated user endpoints
    let user_auth = Router::new()
        .route("/logout", post(routes::users::logout))
        .route("/me", get(routes::users::current_user))
        .route("/me", put(routes::users::update_profile))
        .route("/change-password", post(routes::users::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let user_routes = user_public.merge(user_auth);

    // Campaign endpoints; reads are public, mutations are role/ownership gated
    // inside the handlers
    let campaign_public = Router::new()
        .route("/", get(routes::campaigns::list_campaigns))
        .route("/categories", get(routes::campaigns::category_stats))
        .route("/:id", get(routes::campaigns::campaign_detail));

    let campaign_auth = Router::new()
        .route("/create", post(routes::campaigns::create_campaign))
        .route("/my-campaigns", get(routes::campaigns::my_campaigns))
        .route("/:id", put(routes::campaigns::update_campaign))
        .route("/:id", delete(routes::campaigns::delete_campaign))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let campaign_routes = campaign_auth.merge(campaign_public);

    // Donation endpoints (all authenticated)
    let donation_routes = Router::new()
        .route("/donate", post(routes::donations::make_donation))
        .route("/history", get(routes::donations::donation_history))
        .route(
            "/supported-campaigns",
            get(routes::donations::supported_campaigns),
        )
        .route("/campaign/:id", get(routes::donations::campaign_donations))
        .route("/:id", get(routes::donations::donation_detail))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Dashboards; platform stats are public
    let dashboard_auth = Router::new()
        .route("/ngo", get(routes::dashboard::ngo_dashboard))
        .route("/donor", get(routes::dashboard::donor_dashboard))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let dashboard_routes =
        dashboard_auth.merge(Router::new().route("/stats", get(routes::dashboard::platform_stats)));

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/campaigns", campaign_routes)
        .nest("/donations", donation_routes)
        .nest("/dashboard", dashboard_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(axum::middleware::from_fn(move |req, next| {
            crate::middleware::security::security_headers(production, req, next)
        }))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token, then injects the request
/// principal (`AuthContext`) into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::new(claims.sub, claims.role);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
