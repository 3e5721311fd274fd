// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! On-disk locations and user settings.
//!
//! Everything lives under one base directory: the platform data dir from
//! `directories`, or `$HOMELEDGER_HOME` when set.

use crate::error::{LedgerError, LedgerResult};
use crate::models::DEFAULT_NOTE_DOMAIN;
use crate::schedule::CompletionPolicy;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.homeledger", "HomeLedger", "homeledger"));

pub const HOME_ENV: &str = "HOMELEDGER_HOME";

#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    pub fn resolve() -> LedgerResult<Self> {
        if let Ok(custom) = std::env::var(HOME_ENV) {
            if !custom.trim().is_empty() {
                return Ok(Self::with_base_dir(PathBuf::from(custom.trim())));
            }
        }
        let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
            LedgerError::Config("Could not determine platform-specific data dir".into())
        })?;
        Ok(Self::with_base_dir(proj.data_dir().to_path_buf()))
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    pub fn db_file(&self) -> PathBuf {
        self.base_dir.join("homeledger.sqlite")
    }

    pub fn ensure_dirs(&self) -> LedgerResult<()> {
        fs::create_dir_all(&self.base_dir).map_err(|e| {
            LedgerError::Io(format!(
                "Failed to create {}: {}",
                self.base_dir.display(),
                e
            ))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SQLite file in the data directory.
    #[default]
    Local,
    /// The REST backend at `api_url`.
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Remote => "remote",
        })
    }
}

impl FromStr for BackendKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(LedgerError::Config(format!(
                "Unknown backend '{}', expected local|remote",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// `expenses`, or `recurring-expenses` for older backends.
    #[serde(default = "default_expenses_resource")]
    pub expenses_resource: String,

    /// `monthly-notes`, or `notes` for backends that also keep yearly notes.
    #[serde(default = "default_notes_resource")]
    pub notes_resource: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_note_domain")]
    pub note_domain: String,

    /// Switch installment definitions off once their last payment is generated.
    #[serde(default)]
    pub deactivate_completed_installments: bool,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_expenses_resource() -> String {
    crate::api::DEFAULT_EXPENSES_RESOURCE.to_string()
}

fn default_notes_resource() -> String {
    crate::api::DEFAULT_NOTES_RESOURCE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_note_domain() -> String {
    DEFAULT_NOTE_DOMAIN.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            api_url: default_api_url(),
            expenses_resource: default_expenses_resource(),
            notes_resource: default_notes_resource(),
            timeout_secs: default_timeout_secs(),
            note_domain: default_note_domain(),
            deactivate_completed_installments: false,
        }
    }
}

pub const SETTING_KEYS: &[&str] = &[
    "backend",
    "api_url",
    "expenses_resource",
    "notes_resource",
    "timeout_secs",
    "note_domain",
    "deactivate_completed_installments",
];

impl Settings {
    /// Reads the settings file, falling back to defaults when it does not exist.
    pub fn load_or_default(paths: &Paths) -> LedgerResult<Self> {
        let path = paths.settings_file();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &Paths) -> LedgerResult<()> {
        paths.ensure_dirs()?;
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))
    }

    pub fn set(&mut self, key: &str, value: &str) -> LedgerResult<()> {
        let value = value.trim();
        match key.trim() {
            "backend" => self.backend = value.parse()?,
            "api_url" => {
                if value.is_empty() {
                    return Err(LedgerError::Config("api_url cannot be empty".into()));
                }
                self.api_url = value.to_string();
            }
            key @ ("expenses_resource" | "notes_resource") => {
                let resource = value.trim_matches('/');
                if resource.is_empty() {
                    return Err(LedgerError::Config(format!("{} cannot be empty", key)));
                }
                if key == "notes_resource" {
                    self.notes_resource = resource.to_string();
                } else {
                    self.expenses_resource = resource.to_string();
                }
            }
            "timeout_secs" => {
                self.timeout_secs = value.parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(
                    || LedgerError::Config(format!("Invalid timeout_secs '{}'", value)),
                )?;
            }
            "note_domain" => {
                if value.is_empty() {
                    return Err(LedgerError::Config("note_domain cannot be empty".into()));
                }
                self.note_domain = value.to_string();
            }
            "deactivate_completed_installments" => {
                self.deactivate_completed_installments = crate::utils::parse_bool(value)
                    .map_err(|e| LedgerError::Config(e.to_string()))?;
            }
            other => {
                return Err(LedgerError::Config(format!(
                    "Unknown setting '{}'; known keys: {}",
                    other,
                    SETTING_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn completion_policy(&self) -> CompletionPolicy {
        CompletionPolicy::from_flag(self.deactivate_completed_installments)
    }
}
