// File: promptscrub-core/src/profiles.rs

//! profiles.rs - Named policy profiles for promptscrub.
//!
//! A profile is a small YAML file that switches rules on or off and adjusts
//! the length limit and the name heuristic, without restating any patterns.
//! Profiles are looked up by name in a fixed list of directories, or loaded
//! from an explicit path.
//!
//! A profile can be applied two ways: folded into a `RedactionConfig` before
//! the policy is compiled (which is the only way to switch on an opt-in rule),
//! or turned into a `PolicyOverride` against an existing policy.
//!
//! license: MIT OR Apache-2.0

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RedactionConfig;
use crate::policy::PolicyOverride;

const PROFILE_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// The top-level structure representing a profile file.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "snake_case", default)]
pub struct ProfileConfig {
    pub profile_name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub version: String,
    pub author: Option<String>,
    pub revision_date: Option<NaiveDate>,
    pub rules: Vec<ProfileRule>,
    pub max_length: Option<usize>,
    pub enable_name_heuristic: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ProfileRule {
    pub name: String,
    pub enabled: Option<bool>,
}

impl ProfileConfig {
    /// Checks the profile against the rule set it will be applied to.
    pub fn validate(&self, base_config: &RedactionConfig) -> Result<()> {
        if self.version.trim().is_empty() {
            bail!(
                "Profile '{}' validation failed: 'version' field cannot be empty.",
                self.profile_name
            );
        }

        let known_rules: HashSet<&str> = base_config.rules.iter().map(|r| r.name.as_str()).collect();
        for rule_override in &self.rules {
            if !known_rules.contains(rule_override.name.as_str()) {
                bail!(
                    "Profile '{}' validation failed: rule '{}' not found in configuration.",
                    self.profile_name,
                    rule_override.name
                );
            }
        }

        if self.max_length == Some(0) {
            bail!(
                "Profile '{}' validation failed: 'max_length' must be greater than 0.",
                self.profile_name
            );
        }

        Ok(())
    }

    /// Rule names the profile switches off.
    pub fn disabled_rules(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| r.enabled == Some(false))
            .map(|r| r.name.clone())
            .collect()
    }

    /// The per-call form of this profile.
    ///
    /// Opt-in rules absent from the policy cannot be switched on this way;
    /// use [`apply_profile_to_config`] for those.
    pub fn to_override(&self) -> PolicyOverride {
        PolicyOverride {
            enabled_rules: None,
            disabled_rules: self.disabled_rules(),
            max_length: self.max_length,
            enable_name_heuristic: self.enable_name_heuristic,
        }
    }
}

/// Folds a profile into a configuration before it is compiled.
pub fn apply_profile_to_config(profile: &ProfileConfig, mut config: RedactionConfig) -> RedactionConfig {
    debug!("Applying profile '{}' to rules.", profile.profile_name);

    for profile_rule in &profile.rules {
        match config.rules.iter_mut().find(|r| r.name == profile_rule.name) {
            Some(rule) => {
                if let Some(enabled) = profile_rule.enabled {
                    debug!("Applying enabled={} override for rule '{}'", enabled, profile_rule.name);
                    rule.enabled = Some(enabled);
                }
            }
            None => warn!(
                "Profile rule '{}' not found in configuration. It will be ignored.",
                profile_rule.name
            ),
        }
    }

    if let Some(max_length) = profile.max_length {
        config.settings.max_length = Some(max_length);
    }
    if let Some(names) = profile.enable_name_heuristic {
        config.settings.enable_name_heuristic = Some(names);
    }

    config
}

/// Directories searched for named profiles, in priority order.
pub fn profile_search_dirs() -> Vec<PathBuf> {
    let base_dirs = vec![
        dirs::home_dir().map(|p| p.join(".promptscrub").join("profiles")),
        dirs::config_dir().map(|p| p.join("promptscrub").join("profiles")),
        Some(PathBuf::from("/etc/promptscrub/profiles")),
        Some(PathBuf::from("./config")),
        Some(PathBuf::from("../config")),
    ];
    base_dirs.into_iter().flatten().collect()
}

pub fn profile_candidate_paths(name: &str) -> Vec<PathBuf> {
    profile_search_dirs()
        .into_iter()
        .flat_map(|dir| {
            PROFILE_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{}.{}", name, ext)))
        })
        .collect()
}

/// Loads a profile from a file, in YAML.
pub fn load_profile_from_file(path: &Path) -> Result<ProfileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading profile file {}", path.display()))?;
    serde_yml::from_str(&raw).with_context(|| format!("parsing profile YAML {}", path.display()))
}

/// Loads a profile given either a file path or a bare profile name.
pub fn load_profile_by_name(name_or_path: &str) -> Result<ProfileConfig> {
    debug!("Attempting to load profile from: '{}'", name_or_path);

    let path_to_load = {
        let path = Path::new(name_or_path);
        if path.is_file() {
            debug!("Input is a valid file path. Loading directly from: {}", path.display());
            Some(path.to_path_buf())
        } else {
            profile_candidate_paths(name_or_path)
                .into_iter()
                .find(|p| p.is_file())
        }
    }
    .with_context(|| {
        format!(
            "Profile '{}' not found. It is not a valid file path, and was not found in expected locations.",
            name_or_path
        )
    })?;

    let cfg = load_profile_from_file(&path_to_load)?;
    debug!("Successfully loaded profile '{}'.", cfg.profile_name);
    Ok(cfg)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileSummary {
    pub profile_name: String,
    pub display_name: Option<String>,
    pub version: String,
    pub description: Option<String>,
    pub path: Option<PathBuf>,
}

fn has_profile_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| PROFILE_EXTENSIONS.contains(&ext))
}

/// Lists parseable profiles found directly inside `dirs`, sorted by name.
pub fn list_profiles_in(dirs: &[PathBuf]) -> Vec<ProfileSummary> {
    let mut out = Vec::new();
    let mut seen_paths: HashSet<PathBuf> = HashSet::new();

    for dir in dirs {
        let Ok(entries) = fs::read_dir(dir) else {
            debug!("Candidate profile directory not found: {}", dir.display());
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !has_profile_extension(&path) || !seen_paths.insert(path.clone()) {
                continue;
            }
            match load_profile_from_file(&path) {
                Ok(cfg) if !cfg.profile_name.is_empty() => out.push(ProfileSummary {
                    profile_name: cfg.profile_name,
                    display_name: cfg.display_name,
                    version: cfg.version,
                    description: cfg.description,
                    path: Some(path),
                }),
                Ok(_) => debug!("Skipping {}: no profile_name.", path.display()),
                Err(e) => warn!("Skipping profile at '{}': {:#}", path.display(), e),
            }
        }
    }

    out.sort_by(|a, b| a.profile_name.cmp(&b.profile_name));
    out
}

/// Lists profiles from every search directory. Best effort: unreadable or
/// malformed files are skipped with a warning.
pub fn list_available_profiles() -> Vec<ProfileSummary> {
    list_profiles_in(&profile_search_dirs())
}
