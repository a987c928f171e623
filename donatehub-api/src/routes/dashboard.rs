/// Dashboard and statistics endpoints
///
/// Each dashboard fans out over several independent read-only aggregate
/// queries; they run concurrently and join before the combined response is
/// returned. Their relative completion order does not matter.
///
/// # Endpoints
///
/// - `GET /v1/dashboard/ngo` - NGO dashboard (ngo)
/// - `GET /v1/dashboard/donor` - Donor dashboard (donor)
/// - `GET /v1/dashboard/stats` - Platform-wide statistics (public)

use axum::{extract::State, Extension};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use donatehub_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::{
        campaign::{
            progress_percentage, progress_percentage_1dp, Campaign, CampaignCategory,
            CampaignPerformance, CampaignStatus, CategoryStats, RecentCampaign,
        },
        donation::{CategoryDonations, Donation, MonthlyDonations, RecentDonation},
        user::{User, UserCounts, UserRole},
    },
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    routes::donations::SupportedCampaignItem,
};

/// NGO dashboard payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NgoDashboard {
    pub overall_stats: NgoOverallStats,
    pub recent_campaigns: Vec<RecentCampaign>,
    pub campaign_performance: Vec<PerformanceItem>,
    pub monthly_donations: Vec<MonthlyDonations>,
}

/// Merged campaign-side and donation-side aggregates for one NGO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NgoOverallStats {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub closed_campaigns: i64,
    pub total_goal_amount: i64,
    pub total_raised_amount: i64,
    pub total_donations: i64,
    pub total_donation_amount: i64,
    pub unique_donors: i64,
    pub avg_donation: f64,

    /// Overall progress across all campaigns, integer percent
    pub progress_percentage: i64,
}

/// Performance-ranking row with one-decimal progress
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceItem {
    pub id: Uuid,
    pub title: String,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub donations_count: i64,
    pub progress_percentage: f64,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

impl From<CampaignPerformance> for PerformanceItem {
    fn from(row: CampaignPerformance) -> Self {
        Self {
            progress_percentage: progress_percentage_1dp(row.raised_amount, row.goal_amount),
            id: row.id,
            title: row.title,
            goal_amount: row.goal_amount,
            raised_amount: row.raised_amount,
            donations_count: row.donations_count,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Donor dashboard payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorDashboard {
    pub stats: DonorStats,
    pub recent_donations: Vec<RecentDonationItem>,
    pub supported_campaigns: Vec<SupportedCampaignItem>,
    pub donations_by_category: Vec<CategoryDonations>,
    pub monthly_donations: Vec<MonthlyDonations>,
}

/// Donation totals merged with impact counts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorStats {
    pub total_donations: i64,
    pub total_donated: i64,
    pub avg_donation: f64,
    pub campaigns_supported: i64,
    pub campaigns_helped_complete: i64,
    pub active_campaigns_supported: i64,
}

/// Recent donation with campaign display fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDonationItem {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub campaign: RecentDonationCampaign,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentDonationCampaign {
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub status: CampaignStatus,
}

impl From<RecentDonation> for RecentDonationItem {
    fn from(row: RecentDonation) -> Self {
        Self {
            id: row.id,
            campaign_id: row.campaign_id,
            amount: row.amount,
            donated_at: row.donated_at,
            campaign: RecentDonationCampaign {
                title: row.campaign_title,
                description: row.campaign_description,
                category: row.campaign_category,
                status: row.campaign_status,
            },
        }
    }
}

/// Platform-wide statistics payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub users: UserCounts,
    pub campaigns: PlatformCampaignStats,
    pub donations: PlatformDonationStats,

    /// Per-category breakdown, sorted by campaign count descending
    pub categories: Vec<CategoryStats>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCampaignStats {
    pub total: i64,
    pub active: i64,
    pub closed: i64,
    pub total_goal: i64,
    pub total_raised: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDonationStats {
    pub total: i64,
    pub total_amount: i64,
    pub avg_amount: i64,
}

/// NGO dashboard: campaign aggregates, donation aggregates scoped to the
/// NGO's campaigns, recent campaigns, performance ranking, and a 12-month
/// trailing time series
pub async fn ngo_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<NgoDashboard>> {
    require_role(&auth, &[UserRole::Ngo])
        .map_err(|_| ApiError::Forbidden("Only NGOs can access this dashboard".to_string()))?;

    let ngo_id = auth.user_id;

    let (campaign_stats, donation_stats, recent_campaigns, performance, monthly_donations) =
        tokio::try_join!(
            Campaign::stats_for_owner(&state.db, ngo_id),
            Donation::stats_for_ngo(&state.db, ngo_id),
            Campaign::recent_for_owner(&state.db, ngo_id, 5),
            Campaign::performance_for_owner(&state.db, ngo_id, 10),
            Donation::monthly_for_ngo(&state.db, ngo_id),
        )?;

    let overall_stats = NgoOverallStats {
        total_campaigns: campaign_stats.total_campaigns,
        active_campaigns: campaign_stats.active_campaigns,
        closed_campaigns: campaign_stats.closed_campaigns,
        total_goal_amount: campaign_stats.total_goal_amount,
        total_raised_amount: campaign_stats.total_raised_amount,
        total_donations: donation_stats.total_donations,
        total_donation_amount: donation_stats.total_donation_amount,
        unique_donors: donation_stats.unique_donors,
        avg_donation: donation_stats.avg_donation,
        progress_percentage: progress_percentage(
            campaign_stats.total_raised_amount,
            campaign_stats.total_goal_amount,
        ),
    };

    Ok(ApiResponse::ok(
        "NGO dashboard data fetched successfully",
        NgoDashboard {
            overall_stats,
            recent_campaigns,
            campaign_performance: performance.into_iter().map(PerformanceItem::from).collect(),
            monthly_donations,
        },
    ))
}

/// Donor dashboard: totals, recent donations, top supported campaigns,
/// per-category rollup, a 12-month series, and impact counts
pub async fn donor_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<ApiResponse<DonorDashboard>> {
    require_role(&auth, &[UserRole::Donor])
        .map_err(|_| ApiError::Forbidden("Only donors can access this dashboard".to_string()))?;

    let donor_id = auth.user_id;

    let (stats, impact, recent, supported, by_category, monthly_donations) = tokio::try_join!(
        Donation::stats_for_donor(&state.db, donor_id),
        Donation::impact_for_donor(&state.db, donor_id),
        Donation::recent_for_donor(&state.db, donor_id, 5),
        Donation::top_supported_for_donor(&state.db, donor_id, 10),
        Donation::by_category_for_donor(&state.db, donor_id),
        Donation::monthly_for_donor(&state.db, donor_id),
    )?;

    Ok(ApiResponse::ok(
        "Donor dashboard data fetched successfully",
        DonorDashboard {
            stats: DonorStats {
                total_donations: stats.total_donations,
                total_donated: stats.total_donated,
                avg_donation: stats.avg_donation,
                campaigns_supported: stats.campaigns_supported,
                campaigns_helped_complete: impact.campaigns_helped_complete,
                active_campaigns_supported: impact.active_campaigns_supported,
            },
            recent_donations: recent.into_iter().map(RecentDonationItem::from).collect(),
            supported_campaigns: supported
                .into_iter()
                .map(SupportedCampaignItem::from)
                .collect(),
            donations_by_category: by_category,
            monthly_donations,
        },
    ))
}

/// Public platform statistics: users by role, campaigns by status,
/// donation totals, and the per-category breakdown
pub async fn platform_stats(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<PlatformStats>> {
    let (users, campaign_totals, donation_stats, categories) = tokio::try_join!(
        User::counts_by_role(&state.db),
        Campaign::totals(&state.db),
        Donation::global_stats(&state.db),
        Campaign::category_breakdown(&state.db),
    )?;

    Ok(ApiResponse::ok(
        "General statistics fetched successfully",
        PlatformStats {
            users,
            campaigns: PlatformCampaignStats {
                total: campaign_totals.total,
                active: campaign_totals.active,
                closed: campaign_totals.closed,
                total_goal: campaign_totals.total_goal,
                total_raised: campaign_totals.total_raised,
            },
            donations: PlatformDonationStats {
                total: donation_stats.total,
                total_amount: donation_stats.total_amount,
                avg_amount: donation_stats.avg_amount,
            },
            categories,
        },
    ))
}
