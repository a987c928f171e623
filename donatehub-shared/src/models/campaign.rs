/// Campaign model and database operations
///
/// A campaign is a fundraising goal owned by exactly one NGO user. The
/// `raised_amount` column is a materialized aggregate over the donation
/// ledger: it is only ever changed inside the same transaction that inserts
/// a donation (see `models::donation`), so it always equals the sum of
/// committed donations for the campaign.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE campaign_category AS ENUM ('health', 'education', 'disaster', 'others');
/// CREATE TYPE campaign_status AS ENUM ('active', 'closed');
///
/// CREATE TABLE campaigns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     category campaign_category NOT NULL,
///     goal_amount BIGINT NOT NULL CHECK (goal_amount > 0),
///     raised_amount BIGINT NOT NULL DEFAULT 0 CHECK (raised_amount >= 0),
///     created_by UUID NOT NULL REFERENCES users(id),
///     status campaign_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # State machine
///
/// ```text
/// active --close--> closed
/// ```
///
/// Closing is one-directional through the API; donations against a closed
/// campaign are rejected. Deletion is only permitted while the campaign has
/// zero donations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::pagination::{PageParams, SortOrder};

/// Campaign category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignCategory {
    Health,
    Education,
    Disaster,
    Others,
}

impl CampaignCategory {
    /// All categories, in display order
    pub const ALL: [CampaignCategory; 4] = [
        CampaignCategory::Health,
        CampaignCategory::Education,
        CampaignCategory::Disaster,
        CampaignCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignCategory::Health => "health",
            CampaignCategory::Education => "education",
            CampaignCategory::Disaster => "disaster",
            CampaignCategory::Others => "others",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "health" => Some(CampaignCategory::Health),
            "education" => Some(CampaignCategory::Education),
            "disaster" => Some(CampaignCategory::Disaster),
            "others" => Some(CampaignCategory::Others),
            _ => None,
        }
    }
}

/// Campaign lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// Accepting donations
    Active,

    /// Closed; donations rejected, no reopening through the API
    Closed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(CampaignStatus::Active),
            "closed" => Some(CampaignStatus::Closed),
            _ => None,
        }
    }

    /// Checks if transition to target status is valid (active -> closed only)
    pub fn can_transition_to(&self, target: CampaignStatus) -> bool {
        matches!((self, target), (CampaignStatus::Active, CampaignStatus::Closed))
            || *self == target
    }
}

/// Progress toward the goal as an integer percentage
///
/// Defined as 0 when the goal is 0 or negative, so card displays never see a
/// division error. Values above 100 are possible once a goal is exceeded.
pub fn progress_percentage(raised_amount: i64, goal_amount: i64) -> i64 {
    if goal_amount > 0 {
        (raised_amount as f64 / goal_amount as f64 * 100.0).round() as i64
    } else {
        0
    }
}

/// Progress toward the goal rounded to one decimal, for performance tables
pub fn progress_percentage_1dp(raised_amount: i64, goal_amount: i64) -> f64 {
    if goal_amount > 0 {
        (raised_amount as f64 / goal_amount as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// Campaign model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,

    /// Fundraising target, always positive (whole currency units)
    pub goal_amount: i64,

    /// Materialized sum of committed donations, non-negative
    pub raised_amount: i64,

    /// Owning NGO user
    pub created_by: Uuid,

    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Integer progress percentage, 0 when the goal is 0
    pub fn progress_percentage(&self) -> i64 {
        progress_percentage(self.raised_amount, self.goal_amount)
    }

    /// Whether the raised total has reached or exceeded the goal
    pub fn is_goal_reached(&self) -> bool {
        self.raised_amount >= self.goal_amount
    }
}

/// Input for creating a new campaign
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: i64,
    pub created_by: Uuid,
}

/// Input for updating an existing campaign
///
/// All fields are optional; only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateCampaign {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<CampaignCategory>,
    pub goal_amount: Option<i64>,
    pub status: Option<CampaignStatus>,
}

impl UpdateCampaign {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.goal_amount.is_none()
            && self.status.is_none()
    }
}

/// Sort keys accepted by the public campaign listing
///
/// Unknown keys from clients fall back to `CreatedAt`; the key is mapped to a
/// column name here, so user input never reaches the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CampaignSortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    GoalAmount,
    RaisedAmount,
}

impl CampaignSortKey {
    /// Parses the wire name, falling back to the default sort
    pub fn parse(s: &str) -> Self {
        match s {
            "createdAt" => CampaignSortKey::CreatedAt,
            "updatedAt" => CampaignSortKey::UpdatedAt,
            "title" => CampaignSortKey::Title,
            "goalAmount" => CampaignSortKey::GoalAmount,
            "raisedAmount" => CampaignSortKey::RaisedAmount,
            _ => CampaignSortKey::default(),
        }
    }

    fn column(&self) -> &'static str {
        match self {
            CampaignSortKey::CreatedAt => "created_at",
            CampaignSortKey::UpdatedAt => "updated_at",
            CampaignSortKey::Title => "title",
            CampaignSortKey::GoalAmount => "goal_amount",
            CampaignSortKey::RaisedAmount => "raised_amount",
        }
    }
}

/// Storage-agnostic specification for the public campaign listing
///
/// Handlers build this from query-string input; the SQL translation lives in
/// [`Campaign::list`] / [`Campaign::count_filtered`] so both always agree on
/// the filter set.
#[derive(Debug, Clone)]
pub struct CampaignListQuery {
    pub status: CampaignStatus,
    pub category: Option<CampaignCategory>,

    /// Case-insensitive substring match over title and description
    pub search: Option<String>,

    pub sort: CampaignSortKey,
    pub order: SortOrder,
    pub page: PageParams,
}

impl Default for CampaignListQuery {
    fn default() -> Self {
        Self {
            status: CampaignStatus::Active,
            category: None,
            search: None,
            sort: CampaignSortKey::default(),
            order: SortOrder::Desc,
            page: PageParams::default(),
        }
    }
}

impl CampaignListQuery {
    /// Appends the WHERE clause shared by the list and count queries
    ///
    /// Returns the number of placeholders consumed, so callers can continue
    /// binding after them in the same order as [`bind_filters`](Self::bind_filters).
    fn push_filter_sql(&self, sql: &mut String, prefix: &str) -> usize {
        let mut bind = 1;
        sql.push_str(&format!(" WHERE {prefix}status = $1"));

        if self.category.is_some() {
            bind += 1;
            sql.push_str(&format!(" AND {prefix}category = ${bind}"));
        }
        if self.search.is_some() {
            bind += 1;
            sql.push_str(&format!(
                " AND ({prefix}title ILIKE ${bind} OR {prefix}description ILIKE ${bind})"
            ));
        }

        bind
    }

    fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{}%", escape_like(s)))
    }
}

/// Escapes LIKE metacharacters in user-supplied search text
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Campaign row joined with its creator's display fields
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignWithCreator {
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
    pub creator_full_name: String,
    pub creator_username: String,
}

/// Campaign detail row (creator includes email)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignDetail {
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
    pub creator_full_name: String,
    pub creator_username: String,
    pub creator_email: String,
}

/// Owned-campaign row with its live donation count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedCampaign {
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
}

/// Per-category campaign rollup for the public stats endpoints
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    #[serde(rename = "name")]
    pub category: CampaignCategory,
    pub count: i64,
    pub total_raised: i64,
    pub total_goal: i64,
}

/// Aggregate campaign counts and sums scoped to one NGO
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NgoCampaignStats {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub closed_campaigns: i64,
    pub total_goal_amount: i64,
    pub total_raised_amount: i64,
}

/// Platform-wide campaign counts and sums
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct CampaignTotals {
    pub total: i64,
    pub active: i64,
    pub closed: i64,
    pub total_goal: i64,
    pub total_raised: i64,
}

/// Compact campaign row for "recent campaigns" dashboard cards
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentCampaign {
    pub id: Uuid,
    pub title: String,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

/// Performance-ranking row for the NGO dashboard
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignPerformance {
    pub id: Uuid,
    pub title: String,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub donations_count: i64,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

const CAMPAIGN_COLUMNS: &str = "id, title, description, category, goal_amount, raised_amount, \
     created_by, status, created_at, updated_at";

impl Campaign {
    /// Creates a new campaign owned by an NGO user
    pub async fn create(pool: &PgPool, data: CreateCampaign) -> Result<Self, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns (title, description, category, goal_amount, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CAMPAIGN_COLUMNS}
            "#,
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.goal_amount)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(campaign)
    }

    /// Finds a campaign by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let campaign = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(campaign)
    }

    /// Finds a campaign with its creator's display fields
    pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<CampaignDetail>, sqlx::Error> {
        let detail = sqlx::query_as::<_, CampaignDetail>(
            r#"
            SELECT c.id, c.title, c.description, c.category, c.goal_amount, c.raised_amount,
                   c.created_by, c.status, c.created_at, c.updated_at,
                   u.full_name AS creator_full_name,
                   u.username AS creator_username,
                   u.email AS creator_email
            FROM campaigns c
            JOIN users u ON u.id = c.created_by
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(detail)
    }

    /// Lists campaigns matching a [`CampaignListQuery`], with creator info
    ///
    /// The sort key is a whitelisted enum, never raw client input.
    pub async fn list(
        pool: &PgPool,
        query: &CampaignListQuery,
    ) -> Result<Vec<CampaignWithCreator>, sqlx::Error> {
        let mut sql = String::from(
            "SELECT c.id, c.title, c.description, c.category, c.goal_amount, c.raised_amount, \
             c.created_by, c.status, c.created_at, c.updated_at, \
             u.full_name AS creator_full_name, u.username AS creator_username \
             FROM campaigns c JOIN users u ON u.id = c.created_by",
        );

        let bind = query.push_filter_sql(&mut sql, "c.");
        sql.push_str(&format!(
            " ORDER BY c.{} {} LIMIT ${} OFFSET ${}",
            query.sort.column(),
            query.order.as_sql(),
            bind + 1,
            bind + 2,
        ));

        let mut q = sqlx::query_as::<_, CampaignWithCreator>(&sql).bind(query.status);
        if let Some(category) = query.category {
            q = q.bind(category);
        }
        if let Some(pattern) = query.search_pattern() {
            q = q.bind(pattern);
        }
        q = q.bind(query.page.limit).bind(query.page.offset());

        q.fetch_all(pool).await
    }

    /// Counts campaigns matching the same filters as [`Campaign::list`]
    pub async fn count_filtered(
        pool: &PgPool,
        query: &CampaignListQuery,
    ) -> Result<i64, sqlx::Error> {
        let mut sql = String::from("SELECT COUNT(*) FROM campaigns");
        query.push_filter_sql(&mut sql, "");

        let mut q = sqlx::query_scalar::<_, i64>(&sql).bind(query.status);
        if let Some(category) = query.category {
            q = q.bind(category);
        }
        if let Some(pattern) = query.search_pattern() {
            q = q.bind(pattern);
        }

        q.fetch_one(pool).await
    }

    /// Partially updates a campaign; only non-None fields are written
    ///
    /// Returns the updated campaign, or None if it does not exist. Ownership
    /// and state-transition checks belong to the caller.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCampaign,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE campaigns SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.goal_amount.is_some() {
            bind_count += 1;
            query.push_str(&format!(", goal_amount = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {CAMPAIGN_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Campaign>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(goal_amount) = data.goal_amount {
            q = q.bind(goal_amount);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a campaign by ID
    ///
    /// The zero-donations precondition is enforced by the caller before this
    /// is reached; the donations FK also refuses orphaned rows.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists an NGO's own campaigns with live donation counts
    pub async fn list_owned(
        pool: &PgPool,
        owner_id: Uuid,
        status: Option<CampaignStatus>,
        page: PageParams,
    ) -> Result<Vec<OwnedCampaign>, sqlx::Error> {
        let mut sql = String::from(
            "SELECT c.id, c.title, c.description, c.category, c.goal_amount, c.raised_amount, \
             c.status, c.created_at, c.updated_at, \
             (SELECT COUNT(*) FROM donations d WHERE d.campaign_id = c.id) AS donations_count \
             FROM campaigns c WHERE c.created_by = $1",
        );
        if status.is_some() {
            sql.push_str(" AND c.status = $2");
            sql.push_str(" ORDER BY c.created_at DESC LIMIT $3 OFFSET $4");
        } else {
            sql.push_str(" ORDER BY c.created_at DESC LIMIT $2 OFFSET $3");
        }

        let mut q = sqlx::query_as::<_, OwnedCampaign>(&sql).bind(owner_id);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q = q.bind(page.limit).bind(page.offset());

        q.fetch_all(pool).await
    }

    /// Counts an NGO's own campaigns, with the same optional status filter
    pub async fn count_owned(
        pool: &PgPool,
        owner_id: Uuid,
        status: Option<CampaignStatus>,
    ) -> Result<i64, sqlx::Error> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM campaigns WHERE created_by = $1 AND status = $2",
                )
                .bind(owner_id)
                .bind(status)
                .fetch_one(pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM campaigns WHERE created_by = $1")
                    .bind(owner_id)
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Per-category rollup across all campaigns, zero-filled
    ///
    /// Every category appears in the result even when no campaign exists for
    /// it, so clients never have to special-case missing rows.
    pub async fn category_stats(pool: &PgPool) -> Result<Vec<CategoryStats>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CategoryStats>(
            r#"
            SELECT category,
                   COUNT(*) AS count,
                   COALESCE(SUM(raised_amount), 0)::BIGINT AS total_raised,
                   COALESCE(SUM(goal_amount), 0)::BIGINT AS total_goal
            FROM campaigns
            GROUP BY category
            "#,
        )
        .fetch_all(pool)
        .await?;

        let stats = CampaignCategory::ALL
            .iter()
            .map(|&category| {
                rows.iter()
                    .find(|row| row.category == category)
                    .cloned()
                    .unwrap_or(CategoryStats {
                        category,
                        count: 0,
                        total_raised: 0,
                        total_goal: 0,
                    })
            })
            .collect();

        Ok(stats)
    }

    /// Per-category rollup sorted by campaign count descending
    ///
    /// Used by the public platform stats; only categories with campaigns are
    /// included, matching the breakdown's sort contract.
    pub async fn category_breakdown(pool: &PgPool) -> Result<Vec<CategoryStats>, sqlx::Error> {
        sqlx::query_as::<_, CategoryStats>(
            r#"
            SELECT category,
                   COUNT(*) AS count,
                   COALESCE(SUM(raised_amount), 0)::BIGINT AS total_raised,
                   COALESCE(SUM(goal_amount), 0)::BIGINT AS total_goal
            FROM campaigns
            GROUP BY category
            ORDER BY count DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Aggregate counts and sums over one NGO's campaigns
    pub async fn stats_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<NgoCampaignStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, NgoCampaignStats>(
            r#"
            SELECT COUNT(*) AS total_campaigns,
                   COUNT(*) FILTER (WHERE status = 'active') AS active_campaigns,
                   COUNT(*) FILTER (WHERE status = 'closed') AS closed_campaigns,
                   COALESCE(SUM(goal_amount), 0)::BIGINT AS total_goal_amount,
                   COALESCE(SUM(raised_amount), 0)::BIGINT AS total_raised_amount
            FROM campaigns
            WHERE created_by = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Platform-wide campaign counts and sums
    pub async fn totals(pool: &PgPool) -> Result<CampaignTotals, sqlx::Error> {
        let totals = sqlx::query_as::<_, CampaignTotals>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'active') AS active,
                   COUNT(*) FILTER (WHERE status = 'closed') AS closed,
                   COALESCE(SUM(goal_amount), 0)::BIGINT AS total_goal,
                   COALESCE(SUM(raised_amount), 0)::BIGINT AS total_raised
            FROM campaigns
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(totals)
    }

    /// The NGO's most recently created campaigns, newest first
    pub async fn recent_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RecentCampaign>, sqlx::Error> {
        sqlx::query_as::<_, RecentCampaign>(
            r#"
            SELECT id, title, goal_amount, raised_amount, status, created_at
            FROM campaigns
            WHERE created_by = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Performance ranking of the NGO's campaigns by raised total descending
    pub async fn performance_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
    ) -> Result<Vec<CampaignPerformance>, sqlx::Error> {
        sqlx::query_as::<_, CampaignPerformance>(
            r#"
            SELECT c.id, c.title, c.goal_amount, c.raised_amount,
                   (SELECT COUNT(*) FROM donations d WHERE d.campaign_id = c.id) AS donations_count,
                   c.status, c.created_at
            FROM campaigns c
            WHERE c.created_by = $1
            ORDER BY c.raised_amount DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage_rounding() {
        assert_eq!(progress_percentage(500, 1000), 50);
        assert_eq!(progress_percentage(1000, 1000), 100);
        assert_eq!(progress_percentage(1500, 1000), 150);
        assert_eq!(progress_percentage(333, 1000), 33);
        assert_eq!(progress_percentage(335, 1000), 34); // .5 rounds up
    }

    #[test]
    fn test_progress_percentage_zero_goal() {
        // Division-safe default, not NaN/Infinity
        assert_eq!(progress_percentage(500, 0), 0);
        assert_eq!(progress_percentage(0, 0), 0);
    }

    #[test]
    fn test_progress_percentage_1dp() {
        assert_eq!(progress_percentage_1dp(333, 1000), 33.3);
        assert_eq!(progress_percentage_1dp(1, 3), 33.3);
        assert_eq!(progress_percentage_1dp(0, 0), 0.0);
    }

    #[test]
    fn test_goal_reached() {
        let mut campaign = Campaign {
            id: Uuid::new_v4(),
            title: "Flood relief".to_string(),
            description: "Emergency aid".to_string(),
            category: CampaignCategory::Disaster,
            goal_amount: 1000,
            raised_amount: 500,
            created_by: Uuid::new_v4(),
            status: CampaignStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(!campaign.is_goal_reached());
        assert_eq!(campaign.progress_percentage(), 50);

        campaign.raised_amount = 1000;
        assert!(campaign.is_goal_reached());
        assert_eq!(campaign.progress_percentage(), 100);
    }

    #[test]
    fn test_status_transitions() {
        assert!(CampaignStatus::Active.can_transition_to(CampaignStatus::Closed));
        assert!(!CampaignStatus::Closed.can_transition_to(CampaignStatus::Active));
        // no-op transitions are allowed (idempotent updates)
        assert!(CampaignStatus::Active.can_transition_to(CampaignStatus::Active));
        assert!(CampaignStatus::Closed.can_transition_to(CampaignStatus::Closed));
    }

    #[test]
    fn test_sort_key_whitelist() {
        assert_eq!(CampaignSortKey::parse("goalAmount"), CampaignSortKey::GoalAmount);
        assert_eq!(CampaignSortKey::parse("raisedAmount"), CampaignSortKey::RaisedAmount);
        // unknown keys (including injection attempts) fall back to the default
        assert_eq!(
            CampaignSortKey::parse("created_at; DROP TABLE campaigns"),
            CampaignSortKey::CreatedAt
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateCampaign::default().is_empty());
        let update = UpdateCampaign {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
