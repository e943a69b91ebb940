//! Campaign operations.

use mailforge_shared::{Campaign, CampaignStatus};

use crate::error::{Result, StoreError};
use crate::repository::Repository;

impl Repository {
    pub fn campaigns(&self) -> Vec<Campaign> {
        self.cache().campaigns.clone()
    }

    pub fn campaign(&self, id: &str) -> Option<Campaign> {
        self.cache().campaigns.iter().find(|c| c.id == id).cloned()
    }

    /// Insert or fully rewrite a campaign.
    ///
    /// The funnel tree (if any) is shape-validated before anything is
    /// written.  `template_id` is a weak reference and is not checked:
    /// the template it names may be absent.
    pub fn upsert_campaign(&mut self, campaign: &Campaign) -> Result<()> {
        if campaign.id.trim().is_empty() {
            return Err(StoreError::Validation("campaign id is required".into()));
        }
        if let Some(funnel) = &campaign.funnel_config {
            funnel.validate()?;
        }

        self.store.upsert_campaign(campaign)?;
        self.refresh();
        Ok(())
    }

    /// Move a campaign through its lifecycle.
    ///
    /// Returns `Ok(false)` for an unknown id.  Transitions outside
    /// draft -> running, running -> paused, paused -> running and
    /// running -> completed are rejected before any write.
    pub fn update_campaign_status(&mut self, id: &str, status: CampaignStatus) -> Result<bool> {
        let Some(current) = self.campaign(id) else {
            return Ok(false);
        };

        if !current.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let updated = self.store.update_campaign_status(id, status)?;
        self.refresh();
        Ok(updated)
    }

    pub fn delete_campaign(&mut self, id: &str) -> Result<bool> {
        let deleted = self.store.delete_campaign(id)?;
        self.refresh();
        Ok(deleted)
    }
}
