// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error type shared by the stores, the scheduling rule and the app context.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// A required field is missing or a value breaks an entity invariant.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {identifier}")]
    NotFound {
        entity: &'static str,
        identifier: String,
    },

    /// Generation was requested from a definition that is switched off.
    #[error("Expense '{name}' is inactive; reactivate it before generating transactions")]
    InactiveExpense { name: String },

    /// Every installment of the definition has already been generated.
    #[error("Installment '{name}' is exhausted ({completed}/{total} payments made)")]
    InstallmentExhausted {
        name: String,
        completed: u32,
        total: u32,
    },

    #[error("Not authenticated; run `homeledger login` first")]
    Unauthorized,

    /// Any other network or server failure.
    #[error("Request failed{}: {message}", status_suffix(.status))]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity,
            identifier: identifier.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Business-rule rejections of the generate operation.
    pub fn is_generation_rejection(&self) -> bool {
        matches!(
            self,
            Self::InactiveExpense { .. } | Self::InstallmentExhausted { .. }
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

pub type LedgerResult<T> = Result<T, LedgerError>;
