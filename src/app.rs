// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-process application state: settings, the auth session, pending
//! notices and view lifetimes. Built once in `main` and passed down.

use crate::api::ApiClient;
use crate::config::{BackendKind, Paths, Settings};
use crate::db::LocalStore;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{LoginResponse, User};
use crate::store::FinanceStore;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Credentials {
    access_token: String,
    #[serde(default)]
    user: Option<User>,
}

/// Bearer token plus the user it belongs to, mirrored to `session.json`.
///
/// A stored token counts as authenticated; expiry is the server's business.
#[derive(Debug)]
pub struct Session {
    file: PathBuf,
    current: Option<Credentials>,
}

impl Session {
    pub fn load(file: PathBuf) -> LedgerResult<Self> {
        let current = if file.exists() {
            let raw = fs::read_to_string(&file)?;
            match serde_json::from_str::<Credentials>(&raw) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!("ignoring unreadable session file {}: {}", file.display(), e);
                    None
                }
            }
        } else {
            None
        };
        Ok(Self { file, current })
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.access_token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().and_then(|c| c.user.as_ref())
    }

    pub fn login(&mut self, resp: &LoginResponse) -> LedgerResult<()> {
        self.current = Some(Credentials {
            access_token: resp.access_token.clone(),
            user: Some(resp.user.clone()),
        });
        self.persist()
    }

    pub fn set_user(&mut self, user: User) -> LedgerResult<()> {
        match self.current.as_mut() {
            Some(c) => {
                c.user = Some(user);
                self.persist()
            }
            None => Err(LedgerError::Unauthorized),
        }
    }

    pub fn logout(&mut self) -> LedgerResult<()> {
        self.current = None;
        if self.file.exists() {
            fs::remove_file(&self.file)?;
        }
        Ok(())
    }

    fn persist(&self) -> LedgerResult<()> {
        if let Some(dir) = self.file.parent() {
            fs::create_dir_all(dir)?;
        }
        let body = serde_json::to_string_pretty(&self.current)?;
        fs::write(&self.file, body)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);
pub const ERROR_NOTICE_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "ok",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
    created: Instant,
}

impl Notice {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= self.duration
    }
}

#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn add(
        &mut self,
        level: NoticeLevel,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> u64 {
        self.next_id += 1;
        self.items.push(Notice {
            id: self.next_id,
            level,
            message: message.into(),
            duration: duration.unwrap_or(NOTICE_DURATION),
            created: Instant::now(),
        });
        self.next_id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.add(NoticeLevel::Success, message, None)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.add(NoticeLevel::Info, message, None)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.add(NoticeLevel::Warning, message, None)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.add(NoticeLevel::Error, message, Some(ERROR_NOTICE_DURATION))
    }

    pub fn remove(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn prune_at(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired_at(now));
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    /// Writes every pending notice as `level: message` and empties the queue.
    ///
    /// Expiry is not consulted: a notice that was never shown is always written.
    pub fn flush(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        for n in self.items.drain(..) {
            writeln!(out, "{}: {}", n.level, n.message)?;
        }
        Ok(())
    }

    /// Unwraps a section load, or records a warning and falls back to empty.
    pub fn degrade<T: Default>(&mut self, section: &str, result: LedgerResult<T>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => {
                warn!("{} failed to load: {}", section, e);
                self.warning(format!("Could not load {}: {}", section, e));
                T::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// View lifetimes
// ---------------------------------------------------------------------------

/// Hands out tokens for view loads; tearing the view down invalidates them.
#[derive(Debug, Clone, Default)]
pub struct ViewTracker {
    generation: Arc<AtomicU64>,
}

impl ViewTracker {
    pub fn begin(&self) -> ViewToken {
        ViewToken {
            issued: self.generation.load(Ordering::SeqCst),
            generation: Arc::clone(&self.generation),
        }
    }

    pub fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct ViewToken {
    issued: u64,
    generation: Arc<AtomicU64>,
}

impl ViewToken {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }

    /// `Some(value)` while the view is alive, `None` once it was torn down.
    pub fn guard<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            debug!("dropping result for a torn-down view");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

pub struct AppContext {
    pub paths: Paths,
    pub settings: Settings,
    pub session: Session,
    pub notices: Notices,
    pub views: ViewTracker,
}

impl AppContext {
    pub fn init(paths: Paths) -> LedgerResult<Self> {
        let settings = Settings::load_or_default(&paths)?;
        let session = Session::load(paths.session_file())?;
        debug!(
            "context at {} (backend {})",
            paths.base_dir().display(),
            settings.backend
        );
        Ok(Self {
            paths,
            settings,
            session,
            notices: Notices::default(),
            views: ViewTracker::default(),
        })
    }

    pub fn logout(&mut self) -> LedgerResult<()> {
        self.session.logout()?;
        self.notices.clear();
        self.views.teardown();
        Ok(())
    }

    /// REST client with the current token, if any.
    pub fn api_client(&self) -> LedgerResult<ApiClient> {
        Ok(ApiClient::new(&self.settings.api_url, self.settings.timeout())?
            .with_token(self.session.token().map(str::to_string))
            .with_expenses_resource(&self.settings.expenses_resource)
            .with_notes_resource(&self.settings.notes_resource)
            .with_policy(self.settings.completion_policy()))
    }

    /// The configured store. The remote store needs a session.
    pub fn open_store(&self) -> LedgerResult<Box<dyn FinanceStore>> {
        match self.settings.backend {
            BackendKind::Local => {
                let store = LocalStore::open(&self.paths.db_file())?
                    .with_policy(self.settings.completion_policy());
                Ok(Box::new(store))
            }
            BackendKind::Remote => {
                if !self.session.is_authenticated() {
                    return Err(LedgerError::Unauthorized);
                }
                Ok(Box::new(self.api_client()?))
            }
        }
    }
}
