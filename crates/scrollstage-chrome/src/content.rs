#![forbid(unsafe_code)]

//! Content-provider data model.
//!
//! The collaborator contract: a host supplies the ordered section list and,
//! for the project-archive view, a mapping from category key to titled item
//! lists. The engine iterates this data verbatim — no validation, no
//! transformation — so every field here is plain serde-friendly data.

use std::collections::BTreeMap;

use scrollstage_core::SectionId;
use serde::{Deserialize, Serialize};

/// The ordered section list a host registers with the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionManifest {
    /// Sections in page order.
    pub sections: Vec<SectionId>,
    /// The id that is active before any section reports in.
    pub initial: SectionId,
}

/// One stat chip on an archive item ("stars: 1.2k").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStat {
    /// Stat label.
    pub label: String,
    /// Stat value, preformatted by the provider.
    pub value: String,
}

/// One entry in an archive category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveItem {
    /// Short label (year, index, tag).
    pub label: String,
    /// Item title.
    pub title: String,
    /// Secondary line.
    pub subtitle: String,
    /// Freeform tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional stat chips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<ArchiveStat>>,
    /// Optional external link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A titled group of archive items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveCategory {
    /// Display title of the category.
    pub title: String,
    /// Items, in provider order.
    pub items: Vec<ArchiveItem>,
}

/// The whole archive: category key → category.
///
/// Keys iterate in sorted order, which keeps rendering deterministic
/// without the engine imposing any ordering policy of its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectArchive {
    /// Categories by key.
    pub categories: BTreeMap<String, ArchiveCategory>,
}

impl ProjectArchive {
    /// Iterate categories in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArchiveCategory)> {
        self.categories
            .iter()
            .map(|(key, category)| (key.as_str(), category))
    }

    /// Total number of items across all categories.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.categories.values().map(|c| c.items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "open-source": {
                "title": "Open Source",
                "items": [
                    {
                        "label": "2024",
                        "title": "scrollstage",
                        "subtitle": "Scroll-driven section engine",
                        "tags": ["rust", "ui"],
                        "stats": [{"label": "stars", "value": "1.2k"}],
                        "link": "https://example.com/scrollstage"
                    }
                ]
            },
            "research": {
                "title": "Research",
                "items": [
                    {
                        "label": "2023",
                        "title": "Trigger bands",
                        "subtitle": "Viewport intersection heuristics"
                    }
                ]
            }
        }"#
    }

    #[test]
    fn archive_deserializes_with_optional_fields_missing() {
        let archive: ProjectArchive = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(archive.item_count(), 2);

        let research = &archive.categories["research"];
        assert!(research.items[0].tags.is_empty());
        assert!(research.items[0].stats.is_none());
        assert!(research.items[0].link.is_none());
    }

    #[test]
    fn iteration_is_key_ordered() {
        let archive: ProjectArchive = serde_json::from_str(sample_json()).unwrap();
        let keys: Vec<_> = archive.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["open-source", "research"]);
    }

    #[test]
    fn archive_round_trips() {
        let archive: ProjectArchive = serde_json::from_str(sample_json()).unwrap();
        let json = serde_json::to_string(&archive).unwrap();
        let back: ProjectArchive = serde_json::from_str(&json).unwrap();
        assert_eq!(back, archive);
    }

    #[test]
    fn empty_archive_is_fine() {
        // The engine does not validate content; an empty mapping iterates
        // to nothing.
        let archive = ProjectArchive::default();
        assert_eq!(archive.item_count(), 0);
        assert_eq!(archive.iter().count(), 0);
    }

    #[test]
    fn manifest_round_trips() {
        let manifest = SectionManifest {
            sections: vec!["hero".into(), "projects".into(), "contact".into()],
            initial: "hero".into(),
        };
        let json = serde_json::to_string(&manifest).unwrap();
        let back: SectionManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}
