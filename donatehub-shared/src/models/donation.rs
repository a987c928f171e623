/// Donation ledger model and aggregation queries
///
/// Donations are the source of truth for every raised total. A donation row
/// is immutable once committed: there is no update or delete operation, and
/// `Campaign.raised_amount` is maintained exclusively by [`Donation::record`],
/// which applies the insert and the campaign increment as one transaction.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE donations (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     donor_id UUID NOT NULL REFERENCES users(id),
///     campaign_id UUID NOT NULL REFERENCES campaigns(id),
///     amount BIGINT NOT NULL CHECK (amount > 0),
///     donated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX donations_donor_campaign_idx ON donations (donor_id, campaign_id);
/// CREATE INDEX donations_campaign_idx ON donations (campaign_id);
/// CREATE INDEX donations_donated_at_idx ON donations (donated_at DESC);
/// ```
///
/// # Example
///
/// ```no_run
/// use donatehub_shared::models::donation::Donation;
/// use donatehub_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(donor_id: Uuid, campaign_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Insert the donation and bump the campaign total atomically
/// let donation = Donation::record(&pool, donor_id, campaign_id, 250).await?;
/// println!("Recorded donation {}", donation.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::campaign::{CampaignCategory, CampaignStatus};
use crate::pagination::{PageParams, SortOrder};

/// Error type for the donation ledger
///
/// `Transaction` means the two-step effect could not be committed; the
/// transaction has been rolled back and neither step is durably applied.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Donation amount was absent or non-positive
    #[error("Donation amount must be greater than 0")]
    InvalidAmount,

    /// The referenced campaign does not exist
    #[error("Campaign not found")]
    CampaignNotFound,

    /// The referenced campaign is closed and no longer accepts donations
    #[error("Cannot donate to a closed campaign")]
    CampaignClosed,

    /// The atomic insert + increment failed and was rolled back
    #[error("Failed to process donation: {0}")]
    Transaction(#[source] sqlx::Error),
}

/// Donation model, an immutable ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Uuid,

    /// Contribution amount, always positive (whole currency units)
    pub amount: i64,

    /// When the donation was made
    pub donated_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// Sort keys accepted by the donation history listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DonationSortKey {
    #[default]
    DonatedAt,
    Amount,
}

impl DonationSortKey {
    pub fn parse(s: &str) -> Self {
        match s {
            "donatedAt" => DonationSortKey::DonatedAt,
            "amount" => DonationSortKey::Amount,
            _ => DonationSortKey::default(),
        }
    }

    fn column(&self) -> &'static str {
        match self {
            DonationSortKey::DonatedAt => "donated_at",
            DonationSortKey::Amount => "amount",
        }
    }
}

/// Donation enriched with donor and campaign display fields
///
/// Returned by `recordDonation` for immediate display; read after commit,
/// outside the atomic unit.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationReceipt {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub donor_full_name: String,
    pub donor_username: String,
    pub campaign_title: String,
    pub campaign_description: String,
}

/// Fully joined donation detail for the single-donation view
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationDetail {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub donor_full_name: String,
    pub donor_username: String,
    pub donor_email: String,
    pub campaign_title: String,
    pub campaign_description: String,
    pub campaign_category: CampaignCategory,
    pub campaign_goal_amount: i64,
    pub campaign_raised_amount: i64,
    pub campaign_status: CampaignStatus,

    /// Owner of the campaign; drives the visibility check
    pub campaign_created_by: Uuid,
    pub ngo_full_name: String,
    pub ngo_username: String,
}

/// Donation row with donor display fields, for per-campaign listings
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignDonation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub donor_full_name: String,
    pub donor_username: String,
}

/// Summary statistics over one campaign's donations
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDonationStats {
    pub total_amount: i64,
    pub total_donors: i64,

    /// Average donation, rounded to 2 decimals; 0 when no donations exist
    pub avg_donation: f64,
    pub min_donation: i64,
    pub max_donation: i64,
}

/// Donation history row with campaign and NGO display fields
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationHistoryEntry {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub campaign_title: String,
    pub campaign_description: String,
    pub campaign_category: CampaignCategory,
    pub campaign_goal_amount: i64,
    pub campaign_raised_amount: i64,
    pub campaign_status: CampaignStatus,
    pub ngo_full_name: String,
    pub ngo_username: String,
}

/// Running totals shown alongside a donor's history
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonorTotals {
    pub total_donated: i64,

    /// Distinct campaigns this donor has contributed to
    pub campaigns_supported: i64,
}

/// Aggregate donation statistics for the donor dashboard
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonorDonationStats {
    pub total_donations: i64,
    pub total_donated: i64,
    pub avg_donation: f64,
    pub campaigns_supported: i64,
}

/// Donor impact counts (distinct campaigns)
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonorImpact {
    /// Campaigns the donor contributed to that reached their goal
    pub campaigns_helped_complete: i64,

    /// Still-active campaigns the donor supports
    pub active_campaigns_supported: i64,
}

/// Recent donation row for the donor dashboard
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentDonation {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: i64,
    pub donated_at: DateTime<Utc>,
    pub campaign_title: String,
    pub campaign_description: String,
    pub campaign_category: CampaignCategory,
    pub campaign_status: CampaignStatus,
}

/// A donor's contributions grouped by campaign
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SupportedCampaign {
    pub campaign_id: Uuid,
    pub total_donated: i64,
    pub donation_count: i64,
    pub last_donation: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub category: CampaignCategory,
    pub goal_amount: i64,
    pub raised_amount: i64,
    pub status: CampaignStatus,
    pub creator_full_name: String,
    pub creator_username: String,
}

/// A donor's contributions grouped by campaign category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDonations {
    pub category: CampaignCategory,
    pub total_donated: i64,
    pub donation_count: i64,
}

/// One month of the trailing donation time series
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDonations {
    pub year: i32,
    pub month: i32,
    pub total_amount: i64,
    pub total_donations: i64,
}

/// Donation aggregates scoped to one NGO's campaigns
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NgoDonationStats {
    pub total_donations: i64,
    pub total_donation_amount: i64,
    pub unique_donors: i64,
    pub avg_donation: f64,
}

/// Platform-wide donation aggregates
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct GlobalDonationStats {
    pub total: i64,
    pub total_amount: i64,

    /// Average donation rounded to the nearest whole unit
    pub avg_amount: i64,
}

impl Donation {
    /// Records a donation: inserts the ledger entry and increments the
    /// campaign's raised total as a single transaction.
    ///
    /// The campaign increment is a commutative delta
    /// (`raised_amount = raised_amount + $amount`), never a read-modify-write,
    /// so concurrent donations to the same campaign cannot lose updates. The
    /// `status = 'active'` guard is re-checked inside the transaction: a
    /// campaign closed between the caller's precondition check and the commit
    /// aborts cleanly instead of donating to a closed campaign.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] when `amount <= 0`
    /// - [`LedgerError::CampaignNotFound`] when the campaign does not exist
    /// - [`LedgerError::CampaignClosed`] when the campaign is closed
    /// - [`LedgerError::Transaction`] when either step fails; the transaction
    ///   is rolled back and neither step is durably applied
    pub async fn record(
        pool: &PgPool,
        donor_id: Uuid,
        campaign_id: Uuid,
        amount: i64,
    ) -> Result<Self, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let mut tx = pool.begin().await.map_err(LedgerError::Transaction)?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE campaigns
            SET raised_amount = raised_amount + $2, updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING id
            "#,
        )
        .bind(campaign_id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await
        .map_err(LedgerError::Transaction)?;

        if updated.is_none() {
            let _ = tx.rollback().await;

            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM campaigns WHERE id = $1)")
                    .bind(campaign_id)
                    .fetch_one(pool)
                    .await
                    .map_err(LedgerError::Transaction)?;

            return Err(if exists {
                LedgerError::CampaignClosed
            } else {
                LedgerError::CampaignNotFound
            });
        }

        let donation = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (donor_id, campaign_id, amount)
            VALUES ($1, $2, $3)
            RETURNING id, donor_id, campaign_id, amount, donated_at, created_at
            "#,
        )
        .bind(donor_id)
        .bind(campaign_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(LedgerError::Transaction)?;

        tx.commit().await.map_err(LedgerError::Transaction)?;

        tracing::info!(
            donation_id = %donation.id,
            campaign_id = %campaign_id,
            amount,
            "Donation committed"
        );

        Ok(donation)
    }

    /// Finds a donation by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Donation>(
            "SELECT id, donor_id, campaign_id, amount, donated_at, created_at \
             FROM donations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Reads a committed donation with donor and campaign display fields
    pub async fn find_receipt(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<DonationReceipt>, sqlx::Error> {
        sqlx::query_as::<_, DonationReceipt>(
            r#"
            SELECT d.id, d.donor_id, d.campaign_id, d.amount, d.donated_at,
                   u.full_name AS donor_full_name,
                   u.username AS donor_username,
                   c.title AS campaign_title,
                   c.description AS campaign_description
            FROM donations d
            JOIN users u ON u.id = d.donor_id
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Reads the full donation detail including both parties
    pub async fn find_detail(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<DonationDetail>, sqlx::Error> {
        sqlx::query_as::<_, DonationDetail>(
            r#"
            SELECT d.id, d.donor_id, d.campaign_id, d.amount, d.donated_at,
                   donor.full_name AS donor_full_name,
                   donor.username AS donor_username,
                   donor.email AS donor_email,
                   c.title AS campaign_title,
                   c.description AS campaign_description,
                   c.category AS campaign_category,
                   c.goal_amount AS campaign_goal_amount,
                   c.raised_amount AS campaign_raised_amount,
                   c.status AS campaign_status,
                   c.created_by AS campaign_created_by,
                   ngo.full_name AS ngo_full_name,
                   ngo.username AS ngo_username
            FROM donations d
            JOIN users donor ON donor.id = d.donor_id
            JOIN campaigns c ON c.id = d.campaign_id
            JOIN users ngo ON ngo.id = c.created_by
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Counts donations for a campaign
    pub async fn count_for_campaign(pool: &PgPool, campaign_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_one(pool)
            .await
    }

    /// Paginated donation listing for one campaign, newest first
    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: Uuid,
        page: PageParams,
    ) -> Result<Vec<CampaignDonation>, sqlx::Error> {
        sqlx::query_as::<_, CampaignDonation>(
            r#"
            SELECT d.id, d.donor_id, d.amount, d.donated_at,
                   u.full_name AS donor_full_name,
                   u.username AS donor_username
            FROM donations d
            JOIN users u ON u.id = d.donor_id
            WHERE d.campaign_id = $1
            ORDER BY d.donated_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(campaign_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Summary statistics over one campaign's donations, zero-defaulted
    pub async fn stats_for_campaign(
        pool: &PgPool,
        campaign_id: Uuid,
    ) -> Result<CampaignDonationStats, sqlx::Error> {
        sqlx::query_as::<_, CampaignDonationStats>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT AS total_amount,
                   COUNT(DISTINCT donor_id) AS total_donors,
                   COALESCE(ROUND(AVG(amount)::numeric, 2), 0)::FLOAT8 AS avg_donation,
                   COALESCE(MIN(amount), 0) AS min_donation,
                   COALESCE(MAX(amount), 0) AS max_donation
            FROM donations
            WHERE campaign_id = $1
            "#,
        )
        .bind(campaign_id)
        .fetch_one(pool)
        .await
    }

    /// Paginated, sortable donation history for a donor
    pub async fn history_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
        sort: DonationSortKey,
        order: SortOrder,
        page: PageParams,
    ) -> Result<Vec<DonationHistoryEntry>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT d.id, d.campaign_id, d.amount, d.donated_at,
                   c.title AS campaign_title,
                   c.description AS campaign_description,
                   c.category AS campaign_category,
                   c.goal_amount AS campaign_goal_amount,
                   c.raised_amount AS campaign_raised_amount,
                   c.status AS campaign_status,
                   u.full_name AS ngo_full_name,
                   u.username AS ngo_username
            FROM donations d
            JOIN campaigns c ON c.id = d.campaign_id
            JOIN users u ON u.id = c.created_by
            WHERE d.donor_id = $1
            ORDER BY d.{} {}
            LIMIT $2 OFFSET $3
            "#,
            sort.column(),
            order.as_sql(),
        );

        sqlx::query_as::<_, DonationHistoryEntry>(&sql)
            .bind(donor_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Counts a donor's donations
    pub async fn count_for_donor(pool: &PgPool, donor_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM donations WHERE donor_id = $1")
            .bind(donor_id)
            .fetch_one(pool)
            .await
    }

    /// Total donated and distinct campaigns supported, for history stats
    pub async fn totals_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
    ) -> Result<DonorTotals, sqlx::Error> {
        sqlx::query_as::<_, DonorTotals>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT AS total_donated,
                   COUNT(DISTINCT campaign_id) AS campaigns_supported
            FROM donations
            WHERE donor_id = $1
            "#,
        )
        .bind(donor_id)
        .fetch_one(pool)
        .await
    }

    /// Aggregate donation statistics for the donor dashboard
    pub async fn stats_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
    ) -> Result<DonorDonationStats, sqlx::Error> {
        sqlx::query_as::<_, DonorDonationStats>(
            r#"
            SELECT COUNT(*) AS total_donations,
                   COALESCE(SUM(amount), 0)::BIGINT AS total_donated,
                   COALESCE(ROUND(AVG(amount)::numeric, 2), 0)::FLOAT8 AS avg_donation,
                   COUNT(DISTINCT campaign_id) AS campaigns_supported
            FROM donations
            WHERE donor_id = $1
            "#,
        )
        .bind(donor_id)
        .fetch_one(pool)
        .await
    }

    /// The donor's most recent donations with campaign display fields
    pub async fn recent_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
        limit: i64,
    ) -> Result<Vec<RecentDonation>, sqlx::Error> {
        sqlx::query_as::<_, RecentDonation>(
            r#"
            SELECT d.id, d.campaign_id, d.amount, d.donated_at,
                   c.title AS campaign_title,
                   c.description AS campaign_description,
                   c.category AS campaign_category,
                   c.status AS campaign_status
            FROM donations d
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE d.donor_id = $1
            ORDER BY d.donated_at DESC
            LIMIT $2
            "#,
        )
        .bind(donor_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Top campaigns by this donor's total contribution, descending
    pub async fn top_supported_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
        limit: i64,
    ) -> Result<Vec<SupportedCampaign>, sqlx::Error> {
        sqlx::query_as::<_, SupportedCampaign>(&format!(
            "{SUPPORTED_CAMPAIGNS_BASE} GROUP BY c.id, u.id ORDER BY total_donated DESC LIMIT $2",
        ))
        .bind(donor_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// The donor's supported campaigns, most recent contribution first
    ///
    /// Grouped by campaign; optionally filtered by the campaign's current
    /// status; paginated over distinct campaigns.
    pub async fn supported_campaigns_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
        status: Option<CampaignStatus>,
        page: PageParams,
    ) -> Result<Vec<SupportedCampaign>, sqlx::Error> {
        let mut sql = String::from(SUPPORTED_CAMPAIGNS_BASE);
        if status.is_some() {
            sql.push_str(" AND c.status = $2");
            sql.push_str(" GROUP BY c.id, u.id ORDER BY last_donation DESC LIMIT $3 OFFSET $4");
        } else {
            sql.push_str(" GROUP BY c.id, u.id ORDER BY last_donation DESC LIMIT $2 OFFSET $3");
        }

        let mut q = sqlx::query_as::<_, SupportedCampaign>(&sql).bind(donor_id);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q = q.bind(page.limit).bind(page.offset());

        q.fetch_all(pool).await
    }

    /// Counts the distinct campaigns a donor supports, with optional status filter
    pub async fn count_supported_campaigns(
        pool: &PgPool,
        donor_id: Uuid,
        status: Option<CampaignStatus>,
    ) -> Result<i64, sqlx::Error> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COUNT(DISTINCT d.campaign_id)
                    FROM donations d
                    JOIN campaigns c ON c.id = d.campaign_id
                    WHERE d.donor_id = $1 AND c.status = $2
                    "#,
                )
                .bind(donor_id)
                .bind(status)
                .fetch_one(pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COUNT(DISTINCT campaign_id) FROM donations WHERE donor_id = $1",
                )
                .bind(donor_id)
                .fetch_one(pool)
                .await?
            }
        };

        Ok(count)
    }

    /// The donor's contributions grouped by campaign category, largest first
    pub async fn by_category_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
    ) -> Result<Vec<CategoryDonations>, sqlx::Error> {
        sqlx::query_as::<_, CategoryDonations>(
            r#"
            SELECT c.category,
                   COALESCE(SUM(d.amount), 0)::BIGINT AS total_donated,
                   COUNT(*) AS donation_count
            FROM donations d
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE d.donor_id = $1
            GROUP BY c.category
            ORDER BY total_donated DESC
            "#,
        )
        .bind(donor_id)
        .fetch_all(pool)
        .await
    }

    /// 12-month trailing donation series for a donor, grouped by (year, month)
    pub async fn monthly_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
    ) -> Result<Vec<MonthlyDonations>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyDonations>(
            r#"
            SELECT EXTRACT(YEAR FROM donated_at)::INT AS year,
                   EXTRACT(MONTH FROM donated_at)::INT AS month,
                   COALESCE(SUM(amount), 0)::BIGINT AS total_amount,
                   COUNT(*) AS total_donations
            FROM donations
            WHERE donor_id = $1
              AND donated_at >= date_trunc('month', NOW()) - INTERVAL '11 months'
            GROUP BY year, month
            ORDER BY year, month
            "#,
        )
        .bind(donor_id)
        .fetch_all(pool)
        .await
    }

    /// Distinct-campaign impact counts for the donor dashboard
    pub async fn impact_for_donor(
        pool: &PgPool,
        donor_id: Uuid,
    ) -> Result<DonorImpact, sqlx::Error> {
        sqlx::query_as::<_, DonorImpact>(
            r#"
            SELECT COUNT(DISTINCT c.id) FILTER (WHERE c.raised_amount >= c.goal_amount)
                       AS campaigns_helped_complete,
                   COUNT(DISTINCT c.id) FILTER (WHERE c.status = 'active')
                       AS active_campaigns_supported
            FROM donations d
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE d.donor_id = $1
            "#,
        )
        .bind(donor_id)
        .fetch_one(pool)
        .await
    }

    /// Donation aggregates over all campaigns owned by one NGO
    pub async fn stats_for_ngo(
        pool: &PgPool,
        ngo_id: Uuid,
    ) -> Result<NgoDonationStats, sqlx::Error> {
        sqlx::query_as::<_, NgoDonationStats>(
            r#"
            SELECT COUNT(*) AS total_donations,
                   COALESCE(SUM(d.amount), 0)::BIGINT AS total_donation_amount,
                   COUNT(DISTINCT d.donor_id) AS unique_donors,
                   COALESCE(ROUND(AVG(d.amount)::numeric, 2), 0)::FLOAT8 AS avg_donation
            FROM donations d
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE c.created_by = $1
            "#,
        )
        .bind(ngo_id)
        .fetch_one(pool)
        .await
    }

    /// 12-month trailing donation series over an NGO's campaigns
    pub async fn monthly_for_ngo(
        pool: &PgPool,
        ngo_id: Uuid,
    ) -> Result<Vec<MonthlyDonations>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyDonations>(
            r#"
            SELECT EXTRACT(YEAR FROM d.donated_at)::INT AS year,
                   EXTRACT(MONTH FROM d.donated_at)::INT AS month,
                   COALESCE(SUM(d.amount), 0)::BIGINT AS total_amount,
                   COUNT(*) AS total_donations
            FROM donations d
            JOIN campaigns c ON c.id = d.campaign_id
            WHERE c.created_by = $1
              AND d.donated_at >= date_trunc('month', NOW()) - INTERVAL '11 months'
            GROUP BY year, month
            ORDER BY year, month
            "#,
        )
        .bind(ngo_id)
        .fetch_all(pool)
        .await
    }

    /// Platform-wide donation count, sum, and whole-unit average
    pub async fn global_stats(pool: &PgPool) -> Result<GlobalDonationStats, sqlx::Error> {
        sqlx::query_as::<_, GlobalDonationStats>(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(amount), 0)::BIGINT AS total_amount,
                   COALESCE(ROUND(AVG(amount)), 0)::BIGINT AS avg_amount
            FROM donations
            "#,
        )
        .fetch_one(pool)
        .await
    }
}

const SUPPORTED_CAMPAIGNS_BASE: &str = r#"
    SELECT c.id AS campaign_id,
           SUM(d.amount)::BIGINT AS total_donated,
           COUNT(*) AS donation_count,
           MAX(d.donated_at) AS last_donation,
           c.title, c.description, c.category, c.goal_amount, c.raised_amount, c.status,
           u.full_name AS creator_full_name,
           u.username AS creator_username
    FROM donations d
    JOIN campaigns c ON c.id = d.campaign_id
    JOIN users u ON u.id = c.created_by
    WHERE d.donor_id = $1"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_whitelist() {
        assert_eq!(DonationSortKey::parse("amount"), DonationSortKey::Amount);
        assert_eq!(DonationSortKey::parse("donatedAt"), DonationSortKey::DonatedAt);
        assert_eq!(DonationSortKey::parse("bogus"), DonationSortKey::DonatedAt);
    }

    #[test]
    fn test_ledger_error_messages() {
        assert_eq!(
            LedgerError::CampaignClosed.to_string(),
            "Cannot donate to a closed campaign"
        );
        assert_eq!(LedgerError::CampaignNotFound.to_string(), "Campaign not found");
        assert_eq!(
            LedgerError::InvalidAmount.to_string(),
            "Donation amount must be greater than 0"
        );
    }

    // Ledger atomicity and aggregation queries are exercised against a live
    // database in donatehub-api/tests/integration_test.rs
}
