//! Campaign/contact association.

use backlot_core::{AppResult, Id};
use backlot_db::CampaignRepo;
use backlot_models::Contact;
use sqlx::PgPool;

#[derive(Clone)]
pub struct CampaignService {
    campaigns: CampaignRepo,
}

impl CampaignService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            campaigns: CampaignRepo::new(pool),
        }
    }

    pub async fn contacts(&self, campaign_id: Id) -> AppResult<Vec<Contact>> {
        // 404 for an unknown campaign, not an empty list.
        self.campaigns.find(campaign_id).await?;
        Ok(self.campaigns.contacts(campaign_id).await?)
    }

    /// Idempotent attach; returns the resulting contact list. Unknown contact
    /// ids surface as a dangling-reference error from the join table's
    /// foreign key.
    pub async fn attach(&self, campaign_id: Id, contact_ids: &[Id]) -> AppResult<Vec<Contact>> {
        self.campaigns.find(campaign_id).await?;

        let attached = self.campaigns.attach_contacts(campaign_id, contact_ids).await?;
        tracing::debug!(campaign_id, attached, "campaign contacts attached");

        Ok(self.campaigns.contacts(campaign_id).await?)
    }

    pub async fn detach(&self, campaign_id: Id, contact_id: Id) -> AppResult<()> {
        self.campaigns.find(campaign_id).await?;
        self.campaigns.detach_contact(campaign_id, contact_id).await?;
        Ok(())
    }
}
