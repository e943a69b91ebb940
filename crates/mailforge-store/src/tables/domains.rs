use mailforge_shared::Domain;
use rusqlite::params;

use crate::codec;
use crate::error::Result;
use crate::store::Store;

const SELECT: &str =
    "SELECT id, domain, status, spf_verified, dkim_verified, dmarc_verified FROM domains";

impl Store {
    pub(crate) fn load_domains(&self) -> Vec<Domain> {
        self.read_all("domains", SELECT, codec::row_to_domain)
    }

    pub(crate) fn upsert_domain(&self, domain: &Domain) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO domains
                (id, domain, status, spf_verified, dkim_verified, dmarc_verified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                domain.id,
                domain.domain,
                domain.status.as_str(),
                domain.spf_verified as i64,
                domain.dkim_verified as i64,
                domain.dmarc_verified as i64,
            ],
        )?;
        self.checkpoint()
    }
}
