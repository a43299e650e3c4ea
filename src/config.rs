//! Curriculum configuration for the learning engine
//!
//! The category-to-concept mapping, the ordered learning progression, and
//! per-realm challenge counts are curriculum data, not algorithmic
//! behavior, so they live here as an externally-loadable structure. A
//! built-in curriculum is provided so the engine runs with zero
//! configuration; hosts load their own from a TOML file.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

fn default_session_gap_minutes() -> i64 {
    30
}

fn default_metrics_cache_ttl_secs() -> i64 {
    300
}

fn default_realm_challenge_count() -> u32 {
    25
}

fn default_target_time_secs() -> f64 {
    90.0
}

/// One skill category in the learning progression
///
/// The order categories appear in `CurriculumConfig::categories` is the
/// hand-authored progression the path builder walks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    /// Category name, the key used by difficulty and path operations
    pub name: String,

    /// Realm whose completion gates this category
    pub realm_id: String,

    /// Concept tags the category covers
    pub concepts: Vec<String>,

    /// Concepts the learner should have seen before starting
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Target response time in seconds for difficulty banding
    #[serde(default = "default_target_time_secs")]
    pub target_time_secs: f64,
}

/// Engine configuration: timing knobs plus the curriculum tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumConfig {
    /// Gap that closes a learning session
    #[serde(default = "default_session_gap_minutes")]
    pub session_gap_minutes: i64,

    /// Staleness window for cached performance snapshots
    #[serde(default = "default_metrics_cache_ttl_secs")]
    pub metrics_cache_ttl_secs: i64,

    /// Completion denominator for realms absent from `realm_challenge_counts`
    #[serde(default = "default_realm_challenge_count")]
    pub default_realm_challenge_count: u32,

    /// Total challenges available per realm, from the content catalog
    #[serde(default)]
    pub realm_challenge_counts: HashMap<String, u32>,

    /// Ordered learning progression
    pub categories: Vec<SkillCategory>,
}

impl CurriculumConfig {
    /// Load a curriculum from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loaded: Self = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        info!(
            path = %path.display(),
            categories = loaded.categories.len(),
            "loaded curriculum configuration"
        );
        Ok(loaded)
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&SkillCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Concept tags mapped to a category, if it exists
    pub fn concepts_for(&self, category: &str) -> Option<&[String]> {
        self.category(category).map(|c| c.concepts.as_slice())
    }

    /// Total challenges available in a realm
    pub fn realm_total(&self, realm_id: &str) -> u32 {
        self.realm_challenge_counts
            .get(realm_id)
            .copied()
            .unwrap_or_else(|| {
                debug!(realm_id, "realm not in catalog, using default challenge count");
                self.default_realm_challenge_count
            })
    }

    /// Session gap as a chrono duration
    pub fn session_gap(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_gap_minutes)
    }

    /// Metrics staleness window as a chrono duration
    pub fn metrics_cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.metrics_cache_ttl_secs)
    }
}

/// Built-in introductory chemistry curriculum
static BUILTIN_CURRICULUM: Lazy<CurriculumConfig> = Lazy::new(|| {
    let category = |name: &str,
                    realm_id: &str,
                    concepts: &[&str],
                    prerequisites: &[&str]|
     -> SkillCategory {
        SkillCategory {
            name: name.to_string(),
            realm_id: realm_id.to_string(),
            concepts: concepts.iter().map(|s| s.to_string()).collect(),
            prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
            target_time_secs: default_target_time_secs(),
        }
    };

    CurriculumConfig {
        session_gap_minutes: default_session_gap_minutes(),
        metrics_cache_ttl_secs: default_metrics_cache_ttl_secs(),
        default_realm_challenge_count: default_realm_challenge_count(),
        realm_challenge_counts: HashMap::from([
            ("realm-matter".to_string(), 30),
            ("realm-reactions".to_string(), 40),
            ("realm-solutions".to_string(), 35),
        ]),
        categories: vec![
            category(
                "foundations",
                "realm-matter",
                &["Atomic Structure", "Periodic Table", "States of Matter"],
                &[],
            ),
            category(
                "nomenclature",
                "realm-matter",
                &["Ionic Naming", "Covalent Naming", "Polyatomic Ions"],
                &["Atomic Structure", "Periodic Table"],
            ),
            category(
                "reactions",
                "realm-reactions",
                &["Balancing Equations", "Reaction Types"],
                &["Ionic Naming", "Covalent Naming"],
            ),
            category(
                "stoichiometry",
                "realm-reactions",
                &["Stoichiometry", "Molar Mass", "Limiting Reagents"],
                &["Balancing Equations"],
            ),
            category(
                "solutions",
                "realm-solutions",
                &["Molarity", "Dilutions", "Solubility"],
                &["Stoichiometry", "Molar Mass"],
            ),
            category(
                "acids-bases",
                "realm-solutions",
                &["pH", "Titration", "Buffers"],
                &["Molarity", "Dilutions"],
            ),
        ],
    }
});

impl Default for CurriculumConfig {
    fn default() -> Self {
        BUILTIN_CURRICULUM.clone()
    }
}
