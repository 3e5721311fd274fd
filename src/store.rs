// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The seam between the commands and wherever the data lives.
//!
//! [`crate::api::ApiClient`] talks to the REST backend, [`crate::db::LocalStore`]
//! keeps everything in a SQLite file. Both enforce the same rules.

use crate::error::LedgerResult;
use crate::models::{
    Category, CategoryPatch, ExpenseDefinition, ExpensePatch, GenerateRequest, Generated,
    MonthlyNote, NewCategory, NewExpense, NewProperty, NewTransaction, NotePatch, NoteUpsert,
    Property, PropertyPatch, Transaction, TransactionFilter, default_property,
};
use uuid::Uuid;

pub trait FinanceStore {
    fn list_categories(&self) -> LedgerResult<Vec<Category>>;
    fn get_category(&self, id: Uuid) -> LedgerResult<Category>;
    fn create_category(&self, new: &NewCategory) -> LedgerResult<Category>;
    fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> LedgerResult<Category>;
    fn delete_category(&self, id: Uuid) -> LedgerResult<()>;

    /// `is_active` filters when given.
    fn list_expenses(&self, is_active: Option<bool>) -> LedgerResult<Vec<ExpenseDefinition>>;
    fn get_expense(&self, id: Uuid) -> LedgerResult<ExpenseDefinition>;
    fn create_expense(&self, new: &NewExpense) -> LedgerResult<ExpenseDefinition>;
    fn update_expense(&self, id: Uuid, patch: &ExpensePatch) -> LedgerResult<ExpenseDefinition>;
    fn delete_expense(&self, id: Uuid) -> LedgerResult<()>;
    /// Creates one transaction from the definition and returns it with the
    /// definition's new state.
    fn generate_transaction(&self, id: Uuid, request: &GenerateRequest)
    -> LedgerResult<Generated>;

    /// Newest first.
    fn list_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>>;
    fn get_transaction(&self, id: Uuid) -> LedgerResult<Transaction>;
    fn create_transaction(&self, new: &NewTransaction) -> LedgerResult<Transaction>;
    fn delete_transaction(&self, id: Uuid) -> LedgerResult<()>;

    fn list_properties(&self) -> LedgerResult<Vec<Property>>;
    fn get_property(&self, id: Uuid) -> LedgerResult<Property>;
    fn create_property(&self, new: &NewProperty) -> LedgerResult<Property>;
    fn update_property(&self, id: Uuid, patch: &PropertyPatch) -> LedgerResult<Property>;
    fn delete_property(&self, id: Uuid) -> LedgerResult<()>;

    fn list_monthly_notes(&self, domain: &str) -> LedgerResult<Vec<MonthlyNote>>;
    /// `Ok(None)` when no note exists for the period.
    fn monthly_note(&self, year: i32, month: u32, domain: &str)
    -> LedgerResult<Option<MonthlyNote>>;
    /// The note without a month for `year`; `Ok(None)` when there is none.
    fn yearly_note(&self, year: i32, domain: &str) -> LedgerResult<Option<MonthlyNote>>;
    fn upsert_monthly_note(&self, note: &NoteUpsert) -> LedgerResult<MonthlyNote>;
    fn update_monthly_note(&self, id: Uuid, patch: &NotePatch) -> LedgerResult<MonthlyNote>;
    fn delete_monthly_note(&self, id: Uuid) -> LedgerResult<()>;

    fn default_property(&self) -> LedgerResult<Option<Property>> {
        let props = self.list_properties()?;
        Ok(default_property(&props).cloned())
    }
}
