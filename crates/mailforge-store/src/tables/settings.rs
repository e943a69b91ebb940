use mailforge_shared::AppSettings;
use rusqlite::{params, OptionalExtension};

use crate::codec;
use crate::error::Result;
use crate::store::Store;

/// Fixed key the settings singleton is stored under.
const CONFIG_KEY: &str = "config";

impl Store {
    /// Load the settings singleton, falling back to defaults when the row
    /// is missing or its payload is corrupt.
    pub(crate) fn load_settings(&self) -> AppSettings {
        let raw: Option<String> = match self
            .conn()
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![CONFIG_KEY],
                |row| row.get(0),
            )
            .optional()
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "settings read failed, using defaults");
                return AppSettings::default();
            }
        };

        match raw {
            Some(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(error = %e, "corrupt settings payload, using defaults");
                    AppSettings::default()
                }
            },
            None => AppSettings::default(),
        }
    }

    pub(crate) fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![CONFIG_KEY, codec::encode_json(settings)?],
        )?;
        self.checkpoint()
    }
}
