/// Campaign endpoints
///
/// # Endpoints
///
/// - `POST   /v1/campaigns/create` - Create a campaign (ngo)
/// - `GET    /v1/campaigns` - Public listing, paginated/filterable/sortable
/// - `GET    /v1/campaigns/categories` - Per-category statistics (public)
/// - `GET    /v1/campaigns/my-campaigns` - The NGO's own campaigns
/// - `GET    /v1/campaigns/:id` - Campaign detail with donation count (public)
/// - `PUT    /v1/campaigns/:id` - Update, owner only
/// - `DELETE /v1/campaigns/:id` - Delete, owner only, zero donations

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use donatehub_shared::{
    auth::{
        authorization::{require_ownership, require_role},
        middleware::AuthContext,
    },
    models::{
        campaign::{
            progress_percentage, Campaign, CampaignCategory, CampaignDetail, CampaignListQuery,
            CampaignSortKey, CampaignStatus, CampaignWithCreator, CategoryStats, CreateCampaign,
            OwnedCampaign, UpdateCampaign,
        },
        donation::Donation,
        user::UserRole,
    },
    pagination::{Page, PageParams, SortOrder},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
};

/// Creator display info embedded in campaign responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorInfo {
    pub full_name: String,
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Campaign annotated for listings and detail views
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub created_by: Uuid,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub progress_percentage: i64,
    pub is_goal_reached: bool,
    pub creator: CreatorInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub donations_count: Option<i64>,
}

impl From<CampaignWithCreator> for CampaignView {
    fn from(row: CampaignWithCreator) -> Self {
        Self {
            progress_percentage: progress_percentage(row.raised_amount, row.goal_amount),
            is_goal_reached: row.raised_amount >= row.goal_amount,
            creator: CreatorInfo {
                full_name: row.creator_full_name,
                username: row.creator_username,
                email: None,
            },
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            goal_amount: row.goal_amount,
            raised_amount: row.raised_amount,
            created_by: row.created_by,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            donations_count: None,
        }
    }
}

impl CampaignView {
    fn from_detail(row: CampaignDetail, donations_count: i64) -> Self {
        Self {
            progress_percentage: progress_percentage(row.raised_amount, row.goal_amount),
            is_goal_reached: row.raised_amount >= row.goal_amount,
            creator: CreatorInfo {
                full_name: row.creator_full_name,
                username: row.creator_username,
                email: Some(row.creator_email),
            },
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            goal_amount: row.goal_amount,
            raised_amount: row.raised_amount,
            created_by: row.created_by,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            donations_count: Some(donations_count),
        }
    }
}

/// Owned-campaign row annotated for the my-campaigns listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCampaignView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub donations_count: i64,
    pub progress_percentage: i64,
    pub is_goal_reached: bool,
}

impl From<OwnedCampaign> for OwnedCampaignView {
    fn from(row: OwnedCampaign) -> Self {
        Self {
            progress_percentage: progress_percentage(row.raised_amount, row.goal_amount),
            is_goal_reached: row.raised_amount >= row.goal_amount,
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            goal_amount: row.goal_amount,
            raised_amount: row.raised_amount,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            donations_count: row.donations_count,
        }
    }
}

/// Campaign creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// One of: health, education, disaster, others
    pub category: String,

    pub goal_amount: i64,
}

/// Campaign update request; only provided fields change
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub goal_amount: Option<i64>,

    /// "closed" to close the campaign; reopening is not allowed
    pub status: Option<String>,
}

/// Query parameters for the public campaign listing
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListCampaignsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Query parameters for the my-campaigns listing
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MyCampaignsParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

fn parse_campaign_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid campaign ID".to_string()))
}

fn parse_sort_order(raw: Option<&str>) -> SortOrder {
    match raw {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    }
}

/// Creates a campaign owned by the authenticated NGO
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, unknown category, non-positive goal
/// - `403 Forbidden`: Caller is not an NGO
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCampaignRequest>,
) -> ApiResult<ApiResponse<CampaignView>> {
    require_role(&auth, &[UserRole::Ngo])?;
    req.validate().map_err(ApiError::from_validation)?;

    let category = CampaignCategory::parse(&req.category).ok_or_else(|| {
        ApiError::BadRequest(
            "Category must be one of: health, education, disaster, others".to_string(),
        )
    })?;

    if req.goal_amount <= 0 {
        return Err(ApiError::BadRequest(
            "Goal amount must be greater than 0".to_string(),
        ));
    }

    let campaign = Campaign::create(
        &state.db,
        CreateCampaign {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            category,
            goal_amount: req.goal_amount,
            created_by: auth.user_id,
        },
    )
    .await?;

    tracing::info!(campaign_id = %campaign.id, ngo_id = %auth.user_id, "Campaign created");

    let detail = Campaign::find_detail(&state.db, campaign.id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Created campaign not readable".to_string()))?;

    Ok(ApiResponse::created(
        "Campaign created successfully",
        CampaignView::from_detail(detail, 0),
    ))
}

/// Public campaign listing
///
/// Filters by status (default active), optional category, and an optional
/// case-insensitive substring over title/description; sortable by createdAt,
/// updatedAt, title, goalAmount, or raisedAmount.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<ListCampaignsParams>,
) -> ApiResult<ApiResponse<Page<CampaignView>>> {
    let status = match params.status.as_deref() {
        None => CampaignStatus::Active,
        Some(raw) => CampaignStatus::parse(raw)
            .ok_or_else(|| ApiError::BadRequest("Status must be active or closed".to_string()))?,
    };

    let category = match params.category.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(CampaignCategory::parse(raw).ok_or_else(|| {
            ApiError::BadRequest(
                "Category must be one of: health, education, disaster, others".to_string(),
            )
        })?),
    };

    let query = CampaignListQuery {
        status,
        category,
        search: params.search.filter(|s| !s.trim().is_empty()),
        sort: params
            .sort_by
            .as_deref()
            .map(CampaignSortKey::parse)
            .unwrap_or_default(),
        order: parse_sort_order(params.sort_order.as_deref()),
        page: PageParams::new(params.page, params.limit),
    };

    // The page and the match count are independent read-only queries
    let (campaigns, total) = tokio::try_join!(
        Campaign::list(&state.db, &query),
        Campaign::count_filtered(&state.db, &query),
    )?;

    let items: Vec<CampaignView> = campaigns.into_iter().map(CampaignView::from).collect();

    Ok(ApiResponse::ok(
        "Campaigns fetched successfully",
        Page::new(items, query.page, total),
    ))
}

/// Campaign detail with a live donation count
///
/// # Errors
///
/// - `400 Bad Request`: Malformed campaign ID
/// - `404 Not Found`: No such campaign
pub async fn campaign_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<CampaignView>> {
    let campaign_id = parse_campaign_id(&id)?;

    let detail = Campaign::find_detail(&state.db, campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let donations_count = Donation::count_for_campaign(&state.db, campaign_id).await?;

    Ok(ApiResponse::ok(
        "Campaign fetched successfully",
        CampaignView::from_detail(detail, donations_count),
    ))
}

/// Updates a campaign; owner only
///
/// Status may move from active to closed; a closed campaign cannot be
/// reopened through the API.
///
/// # Errors
///
/// - `403 Forbidden`: Not an NGO, or not the campaign's owner
/// - `404 Not Found`: No such campaign
/// - `409 Conflict`: Attempt to reopen a closed campaign
pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCampaignRequest>,
) -> ApiResult<ApiResponse<CampaignView>> {
    require_role(&auth, &[UserRole::Ngo])?;
    let campaign_id = parse_campaign_id(&id)?;

    let campaign = Campaign::find_by_id(&state.db, campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    require_ownership(&auth, campaign.created_by)
        .map_err(|_| ApiError::Forbidden("You can only update your own campaigns".to_string()))?;

    let category = match req.category.as_deref() {
        None => None,
        Some(raw) => Some(CampaignCategory::parse(raw).ok_or_else(|| {
            ApiError::BadRequest(
                "Category must be one of: health, education, disaster, others".to_string(),
            )
        })?),
    };

    if let Some(goal_amount) = req.goal_amount {
        if goal_amount <= 0 {
            return Err(ApiError::BadRequest(
                "Goal amount must be greater than 0".to_string(),
            ));
        }
    }

    let status = match req.status.as_deref() {
        None => None,
        Some(raw) => {
            let target = CampaignStatus::parse(raw).ok_or_else(|| {
                ApiError::BadRequest("Status must be active or closed".to_string())
            })?;
            if !campaign.status.can_transition_to(target) {
                return Err(ApiError::StateConflict(
                    "Cannot reopen a closed campaign".to_string(),
                ));
            }
            Some(target)
        }
    };

    let update = UpdateCampaign {
        title: req.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
        description: req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        category,
        goal_amount: req.goal_amount,
        status,
    };

    Campaign::update(&state.db, campaign_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let detail = Campaign::find_detail(&state.db, campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;
    let donations_count = Donation::count_for_campaign(&state.db, campaign_id).await?;

    Ok(ApiResponse::ok(
        "Campaign updated successfully",
        CampaignView::from_detail(detail, donations_count),
    ))
}

/// Deletes a campaign; owner only, and only while it has zero donations
///
/// # Errors
///
/// - `403 Forbidden`: Not an NGO, or not the campaign's owner
/// - `404 Not Found`: No such campaign
/// - `409 Conflict`: The campaign has received donations
pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    require_role(&auth, &[UserRole::Ngo])?;
    let campaign_id = parse_campaign_id(&id)?;

    let campaign = Campaign::find_by_id(&state.db, campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    require_ownership(&auth, campaign.created_by)
        .map_err(|_| ApiError::Forbidden("You can only delete your own campaigns".to_string()))?;

    let donations_count = Donation::count_for_campaign(&state.db, campaign_id).await?;
    if donations_count > 0 {
        return Err(ApiError::StateConflict(
            "Cannot delete a campaign that has received donations".to_string(),
        ));
    }

    Campaign::delete(&state.db, campaign_id).await?;

    tracing::info!(campaign_id = %campaign_id, "Campaign deleted");

    Ok(ApiResponse::ok(
        "Campaign deleted successfully",
        serde_json::json!({}),
    ))
}

/// The authenticated NGO's campaigns with donation counts
pub async fn my_campaigns(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<MyCampaignsParams>,
) -> ApiResult<ApiResponse<Page<OwnedCampaignView>>> {
    require_role(&auth, &[UserRole::Ngo])?;

    let status = match params.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(CampaignStatus::parse(raw).ok_or_else(|| {
            ApiError::BadRequest("Status must be active or closed".to_string())
        })?),
    };

    let page = PageParams::new(params.page, params.limit);

    let (campaigns, total) = tokio::try_join!(
        Campaign::list_owned(&state.db, auth.user_id, status, page),
        Campaign::count_owned(&state.db, auth.user_id, status),
    )?;

    let items: Vec<OwnedCampaignView> =
        campaigns.into_iter().map(OwnedCampaignView::from).collect();

    Ok(ApiResponse::ok(
        "Your campaigns fetched successfully",
        Page::new(items, page, total),
    ))
}

/// Per-category campaign statistics, zero-filled for empty categories
pub async fn category_stats(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<CategoryStats>>> {
    let stats = Campaign::category_stats(&state.db).await?;

    Ok(ApiResponse::ok(
        "Categories with statistics fetched successfully",
        stats,
    ))
}
