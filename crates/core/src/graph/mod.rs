//! In-memory project graph store.
//!
//! Loaded once at startup from a JSON snapshot and immutable afterwards;
//! handlers share it behind `Arc`, which is what makes running payload
//! builders on other threads safe without any change to the job-registry
//! contract.

pub mod chain;
pub mod model;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::CoreError;
use self::model::{AssetRecord, ProjectSnapshot};

/// Queryable view over a loaded [`ProjectSnapshot`].
#[derive(Debug)]
pub struct ProjectGraph {
    project_name: String,
    assets: HashMap<String, AssetRecord>,
    /// Reverse dependency index, built at load.
    referencers: HashMap<String, Vec<String>>,
}

impl ProjectGraph {
    /// Build the store and its reverse index from an in-memory snapshot.
    pub fn from_snapshot(snapshot: ProjectSnapshot) -> Self {
        let mut referencers: HashMap<String, Vec<String>> = HashMap::new();
        for asset in &snapshot.assets {
            for dep in &asset.dependencies {
                referencers
                    .entry(dep.clone())
                    .or_default()
                    .push(asset.path.clone());
            }
        }
        for refs in referencers.values_mut() {
            refs.sort();
        }

        let assets = snapshot
            .assets
            .into_iter()
            .map(|asset| (asset.path.clone(), asset))
            .collect();

        Self {
            project_name: snapshot.project_name,
            assets,
            referencers,
        }
    }

    /// Load a snapshot file. Malformed snapshots fail startup.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path)?;
        let snapshot: ProjectSnapshot = serde_json::from_str(&raw)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Look up an asset by normalized package path.
    pub fn asset(&self, path: &str) -> Option<&AssetRecord> {
        self.assets.get(path)
    }

    /// Outgoing dependency edges. Unknown paths yield an empty list, the
    /// same answer the host registry gives for packages it has never seen.
    pub fn dependencies(&self, path: &str) -> &[String] {
        self.assets
            .get(path)
            .map(|asset| asset.dependencies.as_slice())
            .unwrap_or_default()
    }

    /// Incoming dependency edges, from the reverse index.
    pub fn referencers(&self, path: &str) -> &[String] {
        self.referencers
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Wildcard search over all assets, optionally narrowed by type name
    /// (case-insensitive substring match).
    pub fn search_assets(&self, pattern: &str, type_filter: &str) -> Vec<&AssetRecord> {
        let matcher = wildcard_regex(pattern);
        let mut matches: Vec<&AssetRecord> = self
            .assets
            .values()
            .filter(|asset| matcher.is_match(&asset.name))
            .filter(|asset| {
                type_filter.is_empty() || contains_ignore_case(&asset.asset_type, type_filter)
            })
            .collect();
        matches.sort_by(|a, b| a.path.cmp(&b.path));
        matches
    }

    /// Wildcard search over script assets, optionally narrowed by a class
    /// name matched anywhere in the inheritance chain.
    pub fn search_scripts(&self, pattern: &str, class_filter: &str) -> Vec<&AssetRecord> {
        let matcher = wildcard_regex(pattern);
        let mut matches: Vec<&AssetRecord> = self
            .assets
            .values()
            .filter(|asset| asset.script.is_some())
            .filter(|asset| matcher.is_match(&asset.name))
            .filter(|asset| class_filter.is_empty() || class_chain_matches(asset, class_filter))
            .collect();
        matches.sort_by(|a, b| a.path.cmp(&b.path));
        matches
    }
}

fn class_chain_matches(asset: &AssetRecord, class_filter: &str) -> bool {
    asset
        .script
        .as_ref()
        .map(|script| {
            script
                .class_chain
                .iter()
                .any(|link| contains_ignore_case(&link.name, class_filter))
        })
        .unwrap_or(false)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Strip an object suffix: `/Game/A/B.B` and `/Game/A/B` both normalize to
/// the package path `/Game/A/B`.
pub fn normalize_package_path(any_path: &str) -> &str {
    match any_path.find('.') {
        Some(dot) => &any_path[..dot],
        None => any_path,
    }
}

/// Compile a `*`/`?` wildcard into an anchored, case-insensitive regex.
/// A pattern without wildcard characters is wrapped as `*pattern*`.
fn wildcard_regex(pattern: &str) -> Regex {
    let wrapped = if pattern.contains('*') || pattern.contains('?') {
        pattern.to_string()
    } else {
        format!("*{pattern}*")
    };

    let mut translated = String::from("(?i)^");
    for ch in wrapped.chars() {
        match ch {
            '*' => translated.push_str(".*"),
            '?' => translated.push('.'),
            other => translated.push_str(&regex::escape(&other.to_string())),
        }
    }
    translated.push('$');

    Regex::new(&translated).expect("wildcard translation always yields a valid regex")
}
