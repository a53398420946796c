// promptscrub/src/commands/profiles.rs
//! The `profiles` subcommands.

use anyhow::{Context, Result};
use comfy_table::{presets::ASCII_MARKDOWN, Table};
use std::io::{self, Write};
use std::path::Path;

use promptscrub_core::{list_available_profiles, load_profile_by_name, ProfileConfig, ProfileSummary};

use super::{info_msg, load_config, success_msg};
use crate::ui::theme::ThemeMap;

pub fn profiles_table(profiles: &[ProfileSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_MARKDOWN)
        .set_header(vec!["Name", "Version", "Description", "Path"]);
    for p in profiles {
        table.add_row(vec![
            p.display_name.clone().unwrap_or_else(|| p.profile_name.clone()),
            p.version.clone(),
            p.description.clone().unwrap_or_default(),
            p.path.as_ref().map(|path| path.display().to_string()).unwrap_or_default(),
        ]);
    }
    table
}

/// Lists every profile found in the search directories.
pub fn run_list(theme_map: &ThemeMap) -> Result<()> {
    let profiles = list_available_profiles();
    if profiles.is_empty() {
        info_msg("No profiles found.", theme_map);
        return Ok(());
    }
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writeln!(writer, "{}", profiles_table(&profiles))?;
    Ok(())
}

/// Loads a profile and checks it against the defaults merged with `config_path`.
pub fn validate_profile(name: &str, config_path: Option<&Path>) -> Result<ProfileConfig> {
    let config = load_config(config_path)?;
    let profile = load_profile_by_name(name)?;
    profile
        .validate(&config)
        .with_context(|| format!("Profile '{}' is not valid", profile.profile_name))?;
    Ok(profile)
}

pub fn run_validate(name: &str, config_path: Option<&Path>, theme_map: &ThemeMap) -> Result<()> {
    let profile = validate_profile(name, config_path)?;
    success_msg(
        format!("Profile '{}' (version {}) is valid.", profile.profile_name, profile.version),
        theme_map,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn validate_reports_unknown_rules() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(
            &path,
            "profile_name: bad\nversion: \"1\"\nrules:\n  - name: not_a_rule\n    enabled: false\n",
        )
        .unwrap();
        let err = validate_profile(path.to_str().unwrap(), None).unwrap_err();
        assert!(format!("{:#}", err).contains("not_a_rule"));
    }

    #[test]
    fn table_falls_back_to_profile_name() {
        let rendered = profiles_table(&[ProfileSummary {
            profile_name: "strict".to_string(),
            display_name: None,
            version: "1.0".to_string(),
            description: None,
            path: None,
        }])
        .to_string();
        assert!(rendered.contains("strict"));
    }
}
