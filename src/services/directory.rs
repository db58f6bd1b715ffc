// src/services/directory.rs
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_RESULT_LIMIT: usize = 5;
pub const MAX_RESULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TherapistProfile {
    pub name: String,
    pub title: Option<String>,
    pub bio: String,
    pub short_summary: Option<String>,
    pub location: String,
    pub country: String,
    pub clinic: Option<String>,
    pub available_online: bool,
    pub languages: Vec<String>,
    pub specialties: Vec<String>,
    pub approaches: Vec<String>,
    pub qualifications: Vec<String>,
    pub booking_link: Option<String>,
    pub profile_link: Option<String>,
}

/// Filters accepted by [`TherapistDirectory::search`]. Text filters are
/// case-insensitive substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TherapistQuery {
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub language: Option<String>,
    pub available_online: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read therapist directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse therapist directory: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only, in-memory therapist directory.
#[derive(Debug, Clone, Default)]
pub struct TherapistDirectory {
    profiles: Vec<TherapistProfile>,
}

impl TherapistDirectory {
    pub fn new(profiles: Vec<TherapistProfile>) -> Self {
        Self { profiles }
    }

    /// Load a JSON array of profiles from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let profiles: Vec<TherapistProfile> = serde_json::from_str(&raw)?;
        info!(count = profiles.len(), path = %path.as_ref().display(), "therapist directory loaded");
        Ok(Self::new(profiles))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn search(&self, query: &TherapistQuery) -> Vec<TherapistProfile> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_RESULT_LIMIT)
            .clamp(1, MAX_RESULT_LIMIT);

        self.profiles
            .iter()
            .filter(|p| matches_any(&p.specialties, query.specialty.as_deref()))
            .filter(|p| {
                matches_text(&p.location, query.location.as_deref())
                    || matches_text(&p.country, query.location.as_deref())
            })
            .filter(|p| matches_any(&p.languages, query.language.as_deref()))
            .filter(|p| query.available_online.is_none_or(|online| p.available_online == online))
            .take(limit)
            .cloned()
            .collect()
    }
}

fn normalize(needle: Option<&str>) -> Option<String> {
    needle
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
}

fn matches_text(haystack: &str, needle: Option<&str>) -> bool {
    match normalize(needle) {
        None => true,
        Some(n) => haystack.to_lowercase().contains(&n),
    }
}

fn matches_any(values: &[String], needle: Option<&str>) -> bool {
    match normalize(needle) {
        None => true,
        Some(n) => values.iter().any(|v| v.to_lowercase().contains(&n)),
    }
}
