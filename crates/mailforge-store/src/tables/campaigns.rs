use mailforge_shared::{Campaign, CampaignStatus};
use rusqlite::params;

use crate::codec;
use crate::error::Result;
use crate::store::Store;

const SELECT: &str = "SELECT id, name, subject, segment, status, sent, opened, clicked,
        converted, audience_size, last_updated, template_id, funnel_config
 FROM campaigns";

impl Store {
    pub(crate) fn load_campaigns(&self) -> Vec<Campaign> {
        self.read_all("campaigns", SELECT, codec::row_to_campaign)
    }

    pub(crate) fn count_campaigns(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM campaigns", [], |row| row.get(0))?)
    }

    /// Insert or fully rewrite a campaign row.
    pub(crate) fn upsert_campaign(&self, campaign: &Campaign) -> Result<()> {
        let funnel = codec::encode_funnel(campaign.funnel_config.as_ref())?;
        self.conn().execute(
            "INSERT OR REPLACE INTO campaigns
                (id, name, subject, segment, status, sent, opened, clicked,
                 converted, audience_size, last_updated, template_id, funnel_config)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                campaign.id,
                campaign.name,
                campaign.subject,
                campaign.segment,
                campaign.status.as_str(),
                campaign.sent,
                campaign.opened,
                campaign.clicked,
                campaign.converted,
                campaign.audience_size,
                campaign.last_updated,
                campaign.template_id,
                funnel,
            ],
        )?;
        self.checkpoint()
    }

    /// Single-column status update plus a freshness stamp.
    pub(crate) fn update_campaign_status(
        &self,
        id: &str,
        status: CampaignStatus,
    ) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE campaigns SET status = ?1, last_updated = 'Just now' WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        self.checkpoint()?;
        Ok(affected > 0)
    }

    pub(crate) fn delete_campaign(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM campaigns WHERE id = ?1", params![id])?;
        self.checkpoint()?;
        Ok(affected > 0)
    }
}
