/// Donation endpoints
///
/// The donate endpoint is the write path of the ledger: it is invoked by the
/// client only after the external payment simulation reports success, and it
/// trusts the caller that a charge occurred. Everything else here is
/// read-only.
///
/// # Endpoints
///
/// - `POST /v1/donations/donate` - Record a donation (donor)
/// - `GET  /v1/donations/history` - The donor's donation history
/// - `GET  /v1/donations/supported-campaigns` - The donor's campaigns, grouped
/// - `GET  /v1/donations/campaign/:id` - Donations to one campaign
/// - `GET  /v1/donations/:id` - Single donation (donor or owning NGO)

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use donatehub_shared::{
    auth::{
        authorization::{require_any_identity, require_ownership, require_role},
        middleware::AuthContext,
    },
    models::{
        campaign::{progress_percentage, Campaign, CampaignCategory, CampaignStatus},
        donation::{
            CampaignDonation, CampaignDonationStats, Donation, DonationDetail,
            DonationHistoryEntry, DonationReceipt, DonationSortKey, DonorTotals, SupportedCampaign,
        },
        user::UserRole,
    },
    pagination::{PageParams, Pagination, SortOrder},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};

/// Donation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateRequest {
    pub campaign_id: Option<String>,
    pub amount: Option<i64>,
}

/// Party display info in donation responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInfo {
    pub full_name: String,
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Committed donation enriched for immediate display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub donor: PartyInfo,
    pub campaign: CampaignSummary,
}

/// Compact campaign display fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub title: String,
    pub description: String,
}

impl From<DonationReceipt> for DonationView {
    fn from(row: DonationReceipt) -> Self {
        Self {
            id: row.id,
            campaign_id: row.campaign_id,
            amount: row.amount,
            donated_at: row.donated_at,
            donor: PartyInfo {
                full_name: row.donor_full_name,
                username: row.donor_username,
                email: None,
            },
            campaign: CampaignSummary {
                title: row.campaign_title,
                description: row.campaign_description,
            },
        }
    }
}

/// Query parameters for the donation history listing
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// History entry with campaign and NGO display fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub campaign: HistoryCampaign,
    pub ngo: PartyInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryCampaign {
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub status: CampaignStatus,
}

impl From<DonationHistoryEntry> for HistoryItem {
    fn from(row: DonationHistoryEntry) -> Self {
        Self {
            id: row.id,
            campaign_id: row.campaign_id,
            amount: row.amount,
            donated_at: row.donated_at,
            campaign: HistoryCampaign {
                title: row.campaign_title,
                description: row.campaign_description,
                category: row.campaign_category,
                goal_amount: row.campaign_goal_amount,
                raised_amount: row.campaign_raised_amount,
                status: row.campaign_status,
            },
            ngo: PartyInfo {
                full_name: row.ngo_full_name,
                username: row.ngo_username,
                email: None,
            },
        }
    }
}

/// Donation history response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub items: Vec<HistoryItem>,
    pub stats: DonorTotals,
    pub pagination: Pagination,
}

/// Donation row for per-campaign listings
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDonationItem {
    pub id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub donor: PartyInfo,
}

impl From<CampaignDonation> for CampaignDonationItem {
    fn from(row: CampaignDonation) -> Self {
        Self {
            id: row.id,
            amount: row.amount,
            donated_at: row.donated_at,
            donor: PartyInfo {
                full_name: row.donor_full_name,
                username: row.donor_username,
                email: None,
            },
        }
    }
}

/// Campaign progress header on the per-campaign donation listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProgressHeader {
    pub title: String,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub progress_percentage: i64,
}

/// Per-campaign donation listing response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDonationsResponse {
    pub items: Vec<CampaignDonationItem>,
    pub stats: CampaignDonationStats,
    pub campaign: CampaignProgressHeader,
    pub pagination: Pagination,
}

/// Query parameters for the supported-campaigns listing
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SupportedCampaignsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// Supported-campaign item: the donor's per-campaign rollup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedCampaignItem {
    pub campaign_id: Uuid,
    pub total_donated: i64,
    pub donation_count: i64,
    pub last_donation: DateTime<Utc>,
    pub campaign: SupportedCampaignInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedCampaignInfo {
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub status: CampaignStatus,
    pub progress_percentage: i64,
    pub creator: PartyInfo,
}

impl From<SupportedCampaign> for SupportedCampaignItem {
    fn from(row: SupportedCampaign) -> Self {
        Self {
            campaign_id: row.campaign_id,
            total_donated: row.total_donated,
            donation_count: row.donation_count,
            last_donation: row.last_donation,
            campaign: SupportedCampaignInfo {
                progress_percentage: progress_percentage(row.raised_amount, row.goal_amount),
                title: row.title,
                description: row.description,
                category: row.category,
                goal_amount: row.goal_amount,
                raised_amount: row.raised_amount,
                status: row.status,
                creator: PartyInfo {
                    full_name: row.creator_full_name,
                    username: row.creator_username,
                    email: None,
                },
            },
        }
    }
}

/// Full donation detail for the single-donation view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationDetailView {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub donor: PartyInfo,
    pub campaign: DonationDetailCampaign,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationDetailCampaign {
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub status: CampaignStatus,
    pub creator: PartyInfo,
}

impl From<DonationDetail> for DonationDetailView {
    fn from(row: DonationDetail) -> Self {
        Self {
            id: row.id,
            campaign_id: row.campaign_id,
            amount: row.amount,
            donated_at: row.donated_at,
            donor: PartyInfo {
                full_name: row.donor_full_name,
                username: row.donor_username,
                email: Some(row.donor_email),
            },
            campaign: DonationDetailCampaign {
                title: row.campaign_title,
                description: row.campaign_description,
                category: row.campaign_category,
                goal_amount: row.campaign_goal_amount,
                raised_amount: row.campaign_raised_amount,
                status: row.campaign_status,
                creator: PartyInfo {
                    full_name: row.ngo_full_name,
                    username: row.ngo_username,
                    email: None,
                },
            },
        }
    }
}

fn parse_id(raw: &str, what: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {} ID", what)))
}

/// Records a donation and atomically updates the campaign's raised total
///
/// Both the ledger insert and the campaign increment commit together or not
/// at all; a failure reports a transaction error with no partial effect.
///
/// # Errors
///
/// - `400 Bad Request`: Missing/malformed campaign ID or non-positive amount
/// - `403 Forbidden`: Caller is not a donor
/// - `404 Not Found`: No such campaign
/// - `409 Conflict`: The campaign is closed
/// - `500 Internal Server Error`: The transaction could not be committed
pub async fn make_donation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<DonateRequest>,
) -> ApiResult<ApiResponse<DonationView>> {
    require_role(&auth, &[UserRole::Donor])
        .map_err(|_| ApiError::Forbidden("Only donors can make donations".to_string()))?;

    let campaign_id = req
        .campaign_id
        .as_deref()
        .ok_or_else(|| {
            ApiError::BadRequest("Campaign ID and donation amount are required".to_string())
        })
        .and_then(|raw| parse_id(raw, "campaign"))?;

    let amount = req.amount.ok_or_else(|| {
        ApiError::BadRequest("Campaign ID and donation amount are required".to_string())
    })?;

    let donation = Donation::record(&state.db, auth.user_id, campaign_id, amount).await?;

    // Enrichment read after commit; not part of the atomic unit
    let receipt = Donation::find_receipt(&state.db, donation.id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Committed donation not readable".to_string()))?;

    Ok(ApiResponse::created(
        "Donation made successfully",
        DonationView::from(receipt),
    ))
}

/// The authenticated donor's donation history with running totals
pub async fn donation_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<ApiResponse<HistoryResponse>> {
    require_role(&auth, &[UserRole::Donor])
        .map_err(|_| ApiError::Forbidden("Only donors can access donation history".to_string()))?;

    let sort = params
        .sort_by
        .as_deref()
        .map(DonationSortKey::parse)
        .unwrap_or_default();
    let order = match params.sort_order.as_deref() {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    };
    let page = PageParams::new(params.page, params.limit);

    let (entries, total, stats) = tokio::try_join!(
        Donation::history_for_donor(&state.db, auth.user_id, sort, order, page),
        Donation::count_for_donor(&state.db, auth.user_id),
        Donation::totals_for_donor(&state.db, auth.user_id),
    )?;

    let items: Vec<HistoryItem> = entries.into_iter().map(HistoryItem::from).collect();

    Ok(ApiResponse::ok(
        "Donation history fetched successfully",
        HistoryResponse {
            items,
            stats,
            pagination: Pagination::new(page.page, page.limit, total),
        },
    ))
}

/// Donations to one campaign with summary statistics
///
/// NGOs may only view donations to their own campaigns; donors may view any
/// campaign's donation list (public progress display).
pub async fn campaign_donations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<ApiResponse<CampaignDonationsResponse>> {
    let campaign_id = parse_id(&id, "campaign")?;

    let campaign = Campaign::find_by_id(&state.db, campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    if auth.role == UserRole::Ngo {
        require_ownership(&auth, campaign.created_by).map_err(|_| {
            ApiError::Forbidden("You can only view donations for your own campaigns".to_string())
        })?;
    }

    let page = PageParams::new(params.page, params.limit);

    let (donations, total, stats) = tokio::try_join!(
        Donation::list_for_campaign(&state.db, campaign_id, page),
        Donation::count_for_campaign(&state.db, campaign_id),
        Donation::stats_for_campaign(&state.db, campaign_id),
    )?;

    let items: Vec<CampaignDonationItem> = donations
        .into_iter()
        .map(CampaignDonationItem::from)
        .collect();

    Ok(ApiResponse::ok(
        "Campaign donations fetched successfully",
        CampaignDonationsResponse {
            items,
            stats,
            campaign: CampaignProgressHeader {
                progress_percentage: campaign.progress_percentage(),
                title: campaign.title,
                goal_amount: campaign.goal_amount,
                raised_amount: campaign.raised_amount,
            },
            pagination: Pagination::new(page.page, page.limit, total),
        },
    ))
}

/// The donor's supported campaigns, grouped and sorted by most recent gift
pub async fn supported_campaigns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SupportedCampaignsParams>,
) -> ApiResult<ApiResponse<SupportedCampaignsResponse>> {
    require_role(&auth, &[UserRole::Donor]).map_err(|_| {
        ApiError::Forbidden("Only donors can access supported campaigns".to_string())
    })?;

    let status = match params.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(CampaignStatus::parse(raw).ok_or_else(|| {
            ApiError::BadRequest("Status must be active or closed".to_string())
        })?),
    };

    let page = PageParams::new(params.page, params.limit);

    let (campaigns, total) = tokio::try_join!(
        Donation::supported_campaigns_for_donor(&state.db, auth.user_id, status, page),
        Donation::count_supported_campaigns(&state.db, auth.user_id, status),
    )?;

    let items: Vec<SupportedCampaignItem> = campaigns
        .into_iter()
        .map(SupportedCampaignItem::from)
        .collect();

    Ok(ApiResponse::ok(
        "Supported campaigns fetched successfully",
        SupportedCampaignsResponse {
            items,
            pagination: Pagination::new(page.page, page.limit, total),
        },
    ))
}

/// Supported-campaigns response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedCampaignsResponse {
    pub items: Vec<SupportedCampaignItem>,
    pub pagination: Pagination,
}

/// Single donation detail
///
/// Visible to the donor who made it or the NGO owning the campaign.
pub async fn donation_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<DonationDetailView>> {
    let donation_id = parse_id(&id, "donation")?;

    let detail = Donation::find_detail(&state.db, donation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Donation not found".to_string()))?;

    require_any_identity(&auth, &[detail.donor_id, detail.campaign_created_by]).map_err(|_| {
        ApiError::Forbidden(
            "You can only view your own donations or donations to your campaigns".to_string(),
        )
    })?;

    Ok(ApiResponse::ok(
        "Donation details fetched successfully",
        DonationDetailView::from(detail),
    ))
}
