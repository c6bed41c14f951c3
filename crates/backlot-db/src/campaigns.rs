//! Campaign repository, including the campaign/contact association.

use backlot_core::{Id, PageParams, Paginated};
use backlot_models::{Campaign, CampaignStatus, Contact, CreateCampaign, UpdateCampaign};
use serde::Deserialize;
use sqlx::PgPool;

use crate::repository::{RepoError, RepoResult};

const TABLE: &str = "campaigns";
const COLUMNS: &str =
    "id, user_id, name, description, status, assistant_id, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFilter {
    pub status: Option<CampaignStatus>,
}

#[derive(Clone)]
pub struct CampaignRepo {
    pool: PgPool,
}

impl CampaignRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &CampaignFilter,
        page: PageParams,
    ) -> RepoResult<Paginated<Campaign>> {
        let items = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            SELECT {COLUMNS} FROM campaigns
            WHERE ($1::campaign_status IS NULL OR status = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM campaigns WHERE ($1::campaign_status IS NULL OR status = $1)",
        )
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find(&self, id: Id) -> RepoResult<Campaign> {
        sqlx::query_as::<_, Campaign>(&format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepoError::NotFound { entity: "Campaign", id })
    }

    pub async fn create(&self, user_id: Id, dto: CreateCampaign) -> RepoResult<Campaign> {
        sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns (user_id, name, description, status, assistant_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.status)
        .bind(dto.assistant_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))
    }

    pub async fn update(&self, id: Id, dto: UpdateCampaign) -> RepoResult<Campaign> {
        sqlx::query_as::<_, Campaign>(&format!(
            r#"
            UPDATE campaigns SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                status = COALESCE($3, status),
                assistant_id = COALESCE($4, assistant_id),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.status)
        .bind(dto.assistant_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, TABLE))?
        .ok_or(RepoError::NotFound { entity: "Campaign", id })
    }

    pub async fn delete(&self, id: Id) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Campaign", id });
        }
        Ok(())
    }

    /// Contacts currently attached to a campaign.
    pub async fn contacts(&self, campaign_id: Id) -> RepoResult<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(
            r#"
            SELECT c.id, c.user_id, c.name, c.phone, c.email, c.notes, c.created_at, c.updated_at
            FROM contacts c
            JOIN campaign_contacts cc ON cc.contact_id = c.id
            WHERE cc.campaign_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Attach contacts; already-attached ids are skipped. Returns the number
    /// of new attachments.
    pub async fn attach_contacts(&self, campaign_id: Id, contact_ids: &[Id]) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO campaign_contacts (campaign_id, contact_id)
            SELECT $1, unnest($2::bigint[])
            ON CONFLICT (campaign_id, contact_id) DO NOTHING
            "#,
        )
        .bind(campaign_id)
        .bind(contact_ids)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::classify(e, "campaign_contacts"))?;

        Ok(result.rows_affected())
    }

    pub async fn detach_contact(&self, campaign_id: Id, contact_id: Id) -> RepoResult<()> {
        let result = sqlx::query(
            "DELETE FROM campaign_contacts WHERE campaign_id = $1 AND contact_id = $2",
        )
        .bind(campaign_id)
        .bind(contact_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Contact", id: contact_id });
        }
        Ok(())
    }
}
