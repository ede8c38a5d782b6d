//! Configuration loading
//!
//! Reads `folio.toml`. Every field has a default, so a missing file or a
//! partial one still yields a usable configuration.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::controls::Panel;

pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name shown in the header
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// Overrides the platform data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_projects")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub summary: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            tagline: default_tagline(),
            data_dir: None,
            projects: default_projects(),
        }
    }
}

fn default_owner() -> String {
    "Your Name".to_string()
}

fn default_tagline() -> String {
    "Developer portfolio".to_string()
}

fn default_projects() -> Vec<Project> {
    vec![
        Project {
            name: "Task Manager".to_string(),
            summary: "A small task list kept in local storage.".to_string(),
        },
        Project {
            name: "Portfolio".to_string(),
            summary: "This site, with a light and a dark theme.".to_string(),
        },
    ]
}

impl Config {
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Defaults when the file does not exist; a broken file is an error.
    pub fn load_if_present(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// CLI override first, then the config file, then the platform default.
    pub fn resolve_data_dir(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.data_dir.clone())
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".folio"))
    }

    pub fn panels(&self) -> Vec<Panel> {
        self.projects
            .iter()
            .map(|p| Panel {
                title: p.name.clone(),
                body: p.summary.clone(),
            })
            .collect()
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "folio")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_if_present(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg.owner, "Your Name");
        assert_eq!(cfg.projects.len(), 2);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "owner = 42").expect("write config");
        let err = Config::load_if_present(&path).unwrap_err();
        assert!(matches!(err, crate::error::Error::TomlParse(_)));
    }

    #[test]
    fn reads_projects_and_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
owner = "Ada"

[[projects]]
name = "Engine"
summary = "Analytical"
"#;
        fs::write(&path, content.trim()).expect("write config");
        let cfg = Config::load_if_present(&path).unwrap();
        assert_eq!(cfg.owner, "Ada");
        assert_eq!(cfg.tagline, "Developer portfolio");
        assert_eq!(cfg.panels()[0].title, "Engine");
        assert_eq!(cfg.panels()[0].body, "Analytical");
    }

    #[test]
    fn cli_data_dir_wins() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        assert_eq!(
            cfg.resolve_data_dir(Some(PathBuf::from("/from/cli"))),
            PathBuf::from("/from/cli")
        );
        assert_eq!(cfg.resolve_data_dir(None), PathBuf::from("/from/config"));
    }
}
