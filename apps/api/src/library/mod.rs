//! The owner's fetched pitch list and the filtering/sorting applied to it.

pub mod handlers;

use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::pitch::StoredPitch;
use crate::notify::{NoticeKind, Notifier};
use crate::store::{PersistError, PitchStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Name,
}

/// Filters applied to an owner's list. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive substring over pitch name, tagline and industry.
    pub search: Option<String>,
    /// Exact industry (case-insensitive); `"all"` disables the filter.
    pub industry: Option<String>,
    pub sort: SortOrder,
}

/// One owner's pitches as last fetched from the store.
///
/// The list is replaced wholesale by `fetch` and only shrinks locally once
/// the store has confirmed a delete.
#[derive(Debug, Clone)]
pub struct PitchLibrary {
    owner: Uuid,
    pitches: Vec<StoredPitch>,
}

impl PitchLibrary {
    pub async fn fetch(store: &dyn PitchStore, owner: Uuid) -> Result<Self, PersistError> {
        let pitches = store.list_by_owner(owner).await?;
        Ok(Self { owner, pitches })
    }

    #[cfg(test)]
    pub fn pitches(&self) -> &[StoredPitch] {
        &self.pitches
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Distinct industries in the library, sorted, for a filter dropdown.
    pub fn industries(&self) -> Vec<String> {
        let mut industries: Vec<String> = self
            .pitches
            .iter()
            .map(|p| p.industry.clone())
            .filter(|i| !i.trim().is_empty())
            .collect();
        industries.sort();
        industries.dedup();
        industries
    }

    pub fn filtered(&self, filter: &ListFilter) -> Vec<&StoredPitch> {
        let search = normalized_term(filter.search.as_deref());
        let industry = normalized_term(filter.industry.as_deref()).filter(|i| i != "all");

        let mut matches: Vec<&StoredPitch> = self
            .pitches
            .iter()
            .filter(|p| match &industry {
                Some(wanted) => p.industry.to_lowercase() == *wanted,
                None => true,
            })
            .filter(|p| match &search {
                Some(term) => matches_search(p, term),
                None => true,
            })
            .collect();

        match filter.sort {
            SortOrder::Newest => matches.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => matches.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::Name => {
                matches.sort_by_key(|p| p.title.to_lowercase());
            }
        }
        matches
    }

    /// Deletes through the store, then drops the entry locally.
    /// On failure the list is left untouched.
    pub async fn remove(
        &mut self,
        store: &dyn PitchStore,
        notifier: &dyn Notifier,
        id: i64,
    ) -> Result<(), PersistError> {
        match store.delete_by_id(id, self.owner).await {
            Ok(()) => {
                self.pitches.retain(|p| p.id != id);
                notifier.notify("Pitch deleted successfully", NoticeKind::Success);
                Ok(())
            }
            Err(e) => {
                let message = match &e {
                    PersistError::Database(inner) => {
                        warn!("Failed to delete pitch {id}: {inner}");
                        "Could not delete pitch. Please try again.".to_string()
                    }
                    other => format!("Could not delete pitch: {other}"),
                };
                notifier.notify(&message, NoticeKind::Error);
                Err(e)
            }
        }
    }
}

fn normalized_term(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

fn matches_search(stored: &StoredPitch, term: &str) -> bool {
    let pitch = stored.pitch();
    [pitch.name.as_str(), pitch.tagline.as_str(), stored.industry.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}
