//! Typed table access, one module per table.
//!
//! Reads fail soft: a broken statement or an unreadable row is logged and
//! skipped, never propagated, so a single bad read cannot crash a view.
//! Writes propagate their errors and finish with a store checkpoint.

pub mod campaigns;
pub mod contacts;
pub mod domains;
pub mod notifications;
pub mod settings;
pub mod templates;

use crate::store::Store;

impl Store {
    /// Run a full-table read, skipping rows that fail SQL-level conversion.
    pub(crate) fn read_all<T>(
        &self,
        table: &str,
        sql: &str,
        mapper: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    ) -> Vec<T> {
        let result = (|| -> rusqlite::Result<Vec<T>> {
            let mut stmt = self.conn().prepare(sql)?;
            let rows = stmt.query_map([], mapper)?;

            let mut out = Vec::new();
            for row in rows {
                match row {
                    Ok(value) => out.push(value),
                    Err(e) => tracing::warn!(error = %e, table, "skipping unreadable row"),
                }
            }
            Ok(out)
        })();

        match result {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, table, "read failed, returning empty set");
                Vec::new()
            }
        }
    }
}
