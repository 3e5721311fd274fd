// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DEFAULT_NOTE_DOMAIN: &str = "finance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(LedgerError::validation(format!(
                "Category type must be 'income' or 'expense', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    /// No fixed end, e.g. a subscription.
    Ongoing,
    /// A fixed number of payments.
    Installment,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Installment => "installment",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ongoing" => Ok(Self::Ongoing),
            "installment" => Ok(Self::Installment),
            other => Err(LedgerError::validation(format!(
                "Expense type must be 'ongoing' or 'installment', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub r#type: CategoryType,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDefinition {
    pub id: Uuid,
    pub name: String,
    /// `None` means a variable amount supplied when a transaction is generated.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub category_id: Uuid,
    pub day_of_month: u32,
    pub expense_type: ExpenseType,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub total_payments: Option<u32>,
    #[serde(default)]
    pub payments_completed: u32,
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExpenseDefinition {
    pub fn validate(&self) -> LedgerResult<()> {
        validate_name("Expense", &self.name)?;
        validate_day_of_month(self.day_of_month)?;
        validate_payment_plan(self.expense_type, self.total_payments)?;
        if let Some(total) = self.total_payments {
            if self.payments_completed > total {
                return Err(LedgerError::validation(format!(
                    "payments_completed ({}) cannot exceed total_payments ({})",
                    self.payments_completed, total
                )));
            }
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub property_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category_id: Uuid,
    #[serde(default, alias = "recurring_expense_id")]
    pub expense_id: Option<Uuid>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNote {
    pub id: Uuid,
    pub domain: String,
    pub year: i32,
    /// `None` for a note covering the whole year.
    #[serde(default)]
    pub month: Option<u32>,
    pub notes: String,
}

impl MonthlyNote {
    /// `2024-05` for a monthly note, `2024` for a yearly one.
    pub fn period(&self) -> String {
        period_label(self.year, self.month)
    }
}

pub fn period_label(year: i32, month: Option<u32>) -> String {
    match month {
        Some(m) => format!("{}-{:02}", year, m),
        None => year.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// ---------------------------------------------------------------------------
// Create payloads and patches. Patch fields are all optional; `None` means
// "leave unchanged" and is not sent over the wire.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub r#type: CategoryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> LedgerResult<()> {
        validate_name("Category", &self.name)?;
        if let Some(color) = &self.color {
            crate::color::validate_hex(color)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<CategoryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.r#type.is_none() && self.color.is_none()
    }

    pub fn apply(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.trim().to_string();
        }
        if let Some(kind) = self.r#type {
            category.r#type = kind;
        }
        if let Some(color) = &self.color {
            category.color = Some(color.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub name: String,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    pub category_id: Uuid,
    pub day_of_month: u32,
    pub expense_type: ExpenseType,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_payments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewExpense {
    pub fn validate(&self) -> LedgerResult<()> {
        validate_name("Expense", &self.name)?;
        validate_day_of_month(self.day_of_month)?;
        validate_payment_plan(self.expense_type, self.total_payments)?;
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        Ok(())
    }

    /// A freshly created definition: active, nothing paid yet.
    pub fn into_definition(self, id: Uuid) -> ExpenseDefinition {
        ExpenseDefinition {
            id,
            name: self.name.trim().to_string(),
            amount: self.amount,
            category_id: self.category_id,
            day_of_month: self.day_of_month,
            expense_type: self.expense_type,
            start_date: self.start_date,
            total_payments: self.total_payments,
            payments_completed: 0,
            is_active: true,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_type: Option<ExpenseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_payments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments_completed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch; the caller re-validates the result.
    ///
    /// Switching a definition to `ongoing` drops its payment total, since
    /// ongoing definitions never carry one.
    pub fn apply(&self, expense: &mut ExpenseDefinition) {
        if let Some(name) = &self.name {
            expense.name = name.trim().to_string();
        }
        if let Some(amount) = self.amount {
            expense.amount = Some(amount);
        }
        if let Some(category_id) = self.category_id {
            expense.category_id = category_id;
        }
        if let Some(day) = self.day_of_month {
            expense.day_of_month = day;
        }
        if let Some(kind) = self.expense_type {
            expense.expense_type = kind;
            if kind == ExpenseType::Ongoing {
                expense.total_payments = None;
            }
        }
        if let Some(start) = self.start_date {
            expense.start_date = start;
        }
        if let Some(total) = self.total_payments {
            expense.total_payments = Some(total);
        }
        if let Some(completed) = self.payments_completed {
            expense.payments_completed = completed;
        }
        if let Some(active) = self.is_active {
            expense.is_active = active;
        }
        if let Some(notes) = &self.notes {
            expense.notes = Some(notes.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub property_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> LedgerResult<()> {
        validate_amount(self.amount)
    }

    pub fn into_transaction(self, id: Uuid) -> Transaction {
        Transaction {
            id,
            property_id: self.property_id,
            date: self.date,
            amount: self.amount,
            category_id: self.category_id,
            expense_id: self.expense_id,
            description: self.description,
            tags: self.tags,
            payment_method: self.payment_method,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl TransactionFilter {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Overrides the definition's amount; required when it has none.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    /// Defaults to the selection-default property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Uuid>,
}

impl GenerateRequest {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date,
            notes: None,
            amount: None,
            property_id: None,
        }
    }
}

/// Outcome of a successful generate operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated {
    pub transaction: Transaction,
    pub expense: ExpenseDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
}

fn default_true() -> bool {
    true
}

impl NewProperty {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_active: true,
            is_default: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteUpsert {
    #[serde(default = "default_domain")]
    pub domain: String,
    pub year: i32,
    /// Leave out for a yearly note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub notes: String,
}

fn default_domain() -> String {
    DEFAULT_NOTE_DOMAIN.to_string()
}

impl NoteUpsert {
    pub fn validate(&self) -> LedgerResult<()> {
        if let Some(month) = self.month {
            validate_month(month)?;
        }
        if self.domain.trim().is_empty() {
            return Err(LedgerError::validation("Note domain cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The property with `is_default` set, else the first one.
pub fn default_property(properties: &[Property]) -> Option<&Property> {
    properties
        .iter()
        .find(|p| p.is_default)
        .or_else(|| properties.first())
}

pub fn validate_name(entity: &str, name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::validation(format!(
            "{} name is required and cannot be empty",
            entity
        )));
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation("Amount must be greater than 0"));
    }
    Ok(())
}

pub fn validate_day_of_month(day: u32) -> LedgerResult<()> {
    if !(1..=31).contains(&day) {
        return Err(LedgerError::validation(
            "Day of month must be between 1 and 31",
        ));
    }
    Ok(())
}

pub fn validate_month(month: u32) -> LedgerResult<()> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::validation("Month must be between 1 and 12"));
    }
    Ok(())
}

fn validate_payment_plan(kind: ExpenseType, total_payments: Option<u32>) -> LedgerResult<()> {
    match (kind, total_payments) {
        (ExpenseType::Installment, None) | (ExpenseType::Installment, Some(0)) => {
            Err(LedgerError::validation(
                "total_payments is required for installment expenses and must be greater than 0",
            ))
        }
        (ExpenseType::Ongoing, Some(_)) => Err(LedgerError::validation(
            "total_payments should not be set for ongoing expenses",
        )),
        _ => Ok(()),
    }
}
