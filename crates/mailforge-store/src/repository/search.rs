//! Global search across contacts, campaigns and templates.

use mailforge_shared::SearchResults;

use crate::repository::Repository;

impl Repository {
    /// Case-insensitive substring match across contact names, companies
    /// and emails, campaign names and subjects, and template names and
    /// subjects.  Matching is independent per entity type, with no
    /// ranking.  An empty query returns three empty sets, not an error.
    pub fn global_search(&self, query: &str) -> SearchResults {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults::default();
        }

        let matches = |haystack: &str| haystack.to_lowercase().contains(&needle);

        SearchResults {
            contacts: self
                .cache()
                .contacts
                .iter()
                .filter(|c| {
                    matches(&c.first_name)
                        || matches(&c.last_name)
                        || matches(&c.company)
                        || matches(&c.email)
                })
                .cloned()
                .collect(),
            campaigns: self
                .cache()
                .campaigns
                .iter()
                .filter(|c| matches(&c.name) || matches(&c.subject))
                .cloned()
                .collect(),
            templates: self
                .cache()
                .templates
                .iter()
                .filter(|t| matches(&t.name) || matches(&t.subject))
                .cloned()
                .collect(),
        }
    }
}
