/// Integration tests for the DonateHub API
///
/// These tests drive the axum router end-to-end against a live Postgres
/// (DATABASE_URL) and verify:
/// - The ledger invariant: raisedAmount equals the sum of committed donations
/// - Donation rejection against closed campaigns leaves totals untouched
/// - The zero-donations precondition on campaign deletion
/// - Pagination arithmetic on the public campaign listing
/// - Role and authentication gating

mod common;

use axum::http::StatusCode;
use common::TestContext;
use donatehub_shared::models::donation::Donation;
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

/// Scenario: goal 1000, donate 250 twice -> raised 500, progress 50%
#[tokio::test]
async fn test_donations_update_raised_amount() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Well construction", 1000, "others")
        .await
        .unwrap();

    let (status, _) = common::donate(&ctx, campaign_id, 250).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = common::donate(&ctx, campaign_id, 250).await.unwrap();
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let campaign = common::get_campaign(&ctx, campaign_id).await.unwrap();
    assert_eq!(campaign["raisedAmount"], 500);
    assert_eq!(campaign["progressPercentage"], 50);
    assert_eq!(campaign["isGoalReached"], false);
    assert_eq!(campaign["donationsCount"], 2);

    // Ledger invariant: the materialized total equals the committed sum
    let sum: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM donations WHERE campaign_id = $1",
    )
    .bind(campaign_id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(sum, 500);

    ctx.cleanup().await.unwrap();
}

/// Scenario: donating the full goal flips isGoalReached at exactly 100%
#[tokio::test]
async fn test_goal_reached() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "School supplies", 1000, "education")
        .await
        .unwrap();

    let (status, _) = common::donate(&ctx, campaign_id, 1000).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let campaign = common::get_campaign(&ctx, campaign_id).await.unwrap();
    assert_eq!(campaign["isGoalReached"], true);
    assert_eq!(campaign["progressPercentage"], 100);

    ctx.cleanup().await.unwrap();
}

/// Scenario: a closed campaign rejects donations and totals stay unchanged
#[tokio::test]
async fn test_donation_to_closed_campaign_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Closing soon", 1000, "health")
        .await
        .unwrap();
    let (status, _) = common::donate(&ctx, campaign_id, 100).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    // Close the campaign
    let (status, _) = common::request(
        &ctx,
        "PUT",
        &format!("/v1/campaigns/{}", campaign_id),
        Some(&ctx.ngo_auth()),
        Some(json!({ "status": "closed" })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    // Donation now conflicts with the campaign state
    let (status, body) = common::donate(&ctx, campaign_id, 100).await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Cannot donate to a closed campaign");

    // No partial effect: neither a donation row nor a changed total
    let campaign = common::get_campaign(&ctx, campaign_id).await.unwrap();
    assert_eq!(campaign["raisedAmount"], 100);
    let count = Donation::count_for_campaign(&ctx.db, campaign_id)
        .await
        .unwrap();
    assert_eq!(count, 1);

    ctx.cleanup().await.unwrap();
}

/// Scenario: deleting a campaign with donations is a state conflict
#[tokio::test]
async fn test_delete_campaign_with_donations_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Sticky campaign", 1000, "disaster")
        .await
        .unwrap();
    let (status, _) = common::donate(&ctx, campaign_id, 50).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::request(
        &ctx,
        "DELETE",
        &format!("/v1/campaigns/{}", campaign_id),
        Some(&ctx.ngo_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // Campaign still present
    let campaign = common::get_campaign(&ctx, campaign_id).await.unwrap();
    assert_eq!(campaign["raisedAmount"], 50);

    ctx.cleanup().await.unwrap();
}

/// A campaign with zero donations can be deleted by its owner
#[tokio::test]
async fn test_delete_empty_campaign() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Short lived", 500, "others")
        .await
        .unwrap();

    let (status, _) = common::request(
        &ctx,
        "DELETE",
        &format!("/v1/campaigns/{}", campaign_id),
        Some(&ctx.ngo_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &ctx,
        "GET",
        &format!("/v1/campaigns/{}", campaign_id),
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// A closed campaign cannot be reopened through the API
#[tokio::test]
async fn test_reopen_closed_campaign_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "One way door", 1000, "health")
        .await
        .unwrap();

    let (status, _) = common::request(
        &ctx,
        "PUT",
        &format!("/v1/campaigns/{}", campaign_id),
        Some(&ctx.ngo_auth()),
        Some(json!({ "status": "closed" })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &ctx,
        "PUT",
        &format!("/v1/campaigns/{}", campaign_id),
        Some(&ctx.ngo_auth()),
        Some(json!({ "status": "active" })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

/// Scenario: 25 matching campaigns, page 2 with limit 10
#[tokio::test]
async fn test_campaign_list_pagination() {
    let ctx = TestContext::new().await.unwrap();

    // Unique marker keeps this test independent of other rows in the table
    let marker = Uuid::new_v4().simple().to_string();
    for i in 0..25 {
        common::create_test_campaign(&ctx, &format!("pagetest-{} {}", marker, i), 1000, "health")
            .await
            .unwrap();
    }

    let (status, body) = common::request(
        &ctx,
        "GET",
        &format!(
            "/v1/campaigns?category=health&search=pagetest-{}&page=2&limit=10",
            marker
        ),
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["items"].as_array().unwrap().len(), 10);
    assert_eq!(data["pagination"]["totalItems"], 25);
    assert_eq!(data["pagination"]["totalPages"], 3);
    assert_eq!(data["pagination"]["currentPage"], 2);
    assert_eq!(data["pagination"]["hasNext"], true);
    assert_eq!(data["pagination"]["hasPrev"], true);

    // Pagination law: page sizes sum to the match count
    let mut seen = 0;
    for page in 1..=3 {
        let (_, body) = common::request(
            &ctx,
            "GET",
            &format!(
                "/v1/campaigns?category=health&search=pagetest-{}&page={}&limit=10",
                marker, page
            ),
            None,
            None,
        )
        .await
        .unwrap();
        seen += body["data"]["items"].as_array().unwrap().len();
    }
    assert_eq!(seen, 25);

    ctx.cleanup().await.unwrap();
}

/// Only donors may donate
#[tokio::test]
async fn test_donation_requires_donor_role() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Role gated", 1000, "others")
        .await
        .unwrap();

    let (status, body) = common::request(
        &ctx,
        "POST",
        "/v1/donations/donate",
        Some(&ctx.ngo_auth()),
        Some(json!({ "campaignId": campaign_id.to_string(), "amount": 100 })),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only donors can make donations");

    ctx.cleanup().await.unwrap();
}

/// Non-positive amounts are rejected before any effect
#[tokio::test]
async fn test_donation_amount_validation() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Validated", 1000, "others")
        .await
        .unwrap();

    let (status, _) = common::donate(&ctx, campaign_id, 0).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::donate(&ctx, campaign_id, -50).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let campaign = common::get_campaign(&ctx, campaign_id).await.unwrap();
    assert_eq!(campaign["raisedAmount"], 0);

    ctx.cleanup().await.unwrap();
}

/// Unknown campaign IDs: malformed -> 400, absent -> 404
#[tokio::test]
async fn test_donation_campaign_lookup_errors() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = common::request(
        &ctx,
        "POST",
        "/v1/donations/donate",
        Some(&ctx.donor_auth()),
        Some(json!({ "campaignId": "not-a-uuid", "amount": 100 })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::donate(&ctx, Uuid::new_v4(), 100).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Donation history reflects committed donations and totals
#[tokio::test]
async fn test_donation_history() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "History source", 1000, "education")
        .await
        .unwrap();
    common::donate(&ctx, campaign_id, 100).await.unwrap();
    common::donate(&ctx, campaign_id, 150).await.unwrap();

    let (status, body) = common::request(
        &ctx,
        "GET",
        "/v1/donations/history",
        Some(&ctx.donor_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
    assert_eq!(data["stats"]["totalDonated"], 250);
    assert_eq!(data["stats"]["campaignsSupported"], 1);
    assert_eq!(data["pagination"]["totalItems"], 2);

    ctx.cleanup().await.unwrap();
}

/// NGO dashboard merges campaign and donation aggregates
#[tokio::test]
async fn test_ngo_dashboard() {
    let ctx = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Dashboard data", 1000, "health")
        .await
        .unwrap();
    common::donate(&ctx, campaign_id, 400).await.unwrap();

    let (status, body) = common::request(
        &ctx,
        "GET",
        "/v1/dashboard/ngo",
        Some(&ctx.ngo_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    let stats = &body["data"]["overallStats"];
    assert_eq!(stats["totalCampaigns"], 1);
    assert_eq!(stats["activeCampaigns"], 1);
    assert_eq!(stats["totalRaisedAmount"], 400);
    assert_eq!(stats["totalDonations"], 1);
    assert_eq!(stats["uniqueDonors"], 1);
    assert_eq!(stats["progressPercentage"], 40);

    assert_eq!(body["data"]["recentCampaigns"].as_array().unwrap().len(), 1);
    let performance = &body["data"]["campaignPerformance"][0];
    assert_eq!(performance["donationsCount"], 1);
    assert_eq!(performance["progressPercentage"], 40.0);

    // Dashboards are role-gated: the donor token gets a 403
    let (status, _) = common::request(
        &ctx,
        "GET",
        "/v1/dashboard/ngo",
        Some(&ctx.donor_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

/// Donor dashboard aggregates the donor's own ledger slice
#[tokio::test]
async fn test_donor_dashboard() {
    let ctx = TestContext::new().await.unwrap();

    let first = common::create_test_campaign(&ctx, "Impact one", 200, "health")
        .await
        .unwrap();
    let second = common::create_test_campaign(&ctx, "Impact two", 1000, "education")
        .await
        .unwrap();
    common::donate(&ctx, first, 200).await.unwrap(); // completes the goal
    common::donate(&ctx, second, 100).await.unwrap();

    let (status, body) = common::request(
        &ctx,
        "GET",
        "/v1/dashboard/donor",
        Some(&ctx.donor_auth()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);

    let stats = &body["data"]["stats"];
    assert_eq!(stats["totalDonations"], 2);
    assert_eq!(stats["totalDonated"], 300);
    assert_eq!(stats["campaignsSupported"], 2);
    assert_eq!(stats["campaignsHelpedComplete"], 1);
    assert_eq!(stats["activeCampaignsSupported"], 2);

    assert_eq!(body["data"]["recentDonations"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["data"]["supportedCampaigns"].as_array().unwrap().len(),
        2
    );
    // Top supported campaigns rank by this donor's contribution
    assert_eq!(body["data"]["supportedCampaigns"][0]["totalDonated"], 200);

    ctx.cleanup().await.unwrap();
}

/// Platform stats are public and always well-formed
#[tokio::test]
async fn test_platform_stats_public() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = common::request(&ctx, "GET", "/v1/dashboard/stats", None, None)
        .await
        .unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["users"]["total"].is_i64());
    assert!(body["data"]["campaigns"]["total"].is_i64());
    assert!(body["data"]["donations"]["totalAmount"].is_i64());
    assert!(body["data"]["categories"].is_array());

    ctx.cleanup().await.unwrap();
}

/// Mutation endpoints require authentication
#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/v1/donations/donate")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(
            json!({ "campaignId": Uuid::new_v4().to_string(), "amount": 100 }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Only the campaign's owner may update it
#[tokio::test]
async fn test_update_requires_ownership() {
    let ctx = TestContext::new().await.unwrap();
    let other = TestContext::new().await.unwrap();

    let campaign_id = common::create_test_campaign(&ctx, "Owned", 1000, "others")
        .await
        .unwrap();

    let (status, _) = common::request(
        &other,
        "PUT",
        &format!("/v1/campaigns/{}", campaign_id),
        Some(&other.ngo_auth()),
        Some(json!({ "title": "Hijacked" })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
    other.cleanup().await.unwrap();
}

/// Register and login round trip through the API
#[tokio::test]
async fn test_register_and_login() {
    let ctx = TestContext::new().await.unwrap();

    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("flow-{}", suffix);

    let (status, body) = common::request(
        &ctx,
        "POST",
        "/v1/users/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("flow-{}@example.com", suffix),
            "fullName": "Flow Test",
            "password": "Str0ng!Pass",
            "role": "donor",
        })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    // Credentials never leak into responses
    assert!(body["data"].get("passwordHash").is_none());

    // Duplicate registration conflicts
    let (status, _) = common::request(
        &ctx,
        "POST",
        "/v1/users/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("flow-{}@example.com", suffix),
            "fullName": "Flow Test",
            "password": "Str0ng!Pass",
        })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = common::request(
        &ctx,
        "POST",
        "/v1/users/login",
        None,
        Some(json!({ "username": username, "password": "Str0ng!Pass" })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["accessToken"].is_string());
    assert!(body["data"]["refreshToken"].is_string());

    // Wrong password is a 401
    let (status, _) = common::request(
        &ctx,
        "POST",
        "/v1/users/login",
        None,
        Some(json!({ "username": username, "password": "WrongPass1!" })),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(&username)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}
