// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the REST backend.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, CategoryPatch, ExpenseDefinition, ExpensePatch, GenerateRequest, Generated,
    LoginResponse, MonthlyNote, NewCategory, NewExpense, NewProperty, NewTransaction, NotePatch,
    NoteUpsert, Property, PropertyPatch, Transaction, TransactionFilter, User,
};
use crate::schedule::{self, CompletionPolicy};
use crate::store::FinanceStore;
use crate::utils::http_client;
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_EXPENSES_RESOURCE: &str = "expenses";
pub const DEFAULT_NOTES_RESOURCE: &str = "monthly-notes";

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    expenses_resource: String,
    notes_resource: String,
    policy: CompletionPolicy,
}

impl ApiClient {
    pub fn new(api_url: &str, timeout: Duration) -> LedgerResult<Self> {
        let root = api_url.trim().trim_end_matches('/');
        if root.is_empty() {
            return Err(LedgerError::Config("api_url is not set".into()));
        }
        let base_url = if root.ends_with(API_PREFIX) {
            root.to_string()
        } else {
            format!("{}{}", root, API_PREFIX)
        };
        Ok(Self {
            http: http_client(timeout)?,
            base_url,
            token: None,
            expenses_resource: DEFAULT_EXPENSES_RESOURCE.to_string(),
            notes_resource: DEFAULT_NOTES_RESOURCE.to_string(),
            policy: CompletionPolicy::default(),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// `expenses` or `recurring-expenses`, depending on the backend generation.
    pub fn with_expenses_resource(mut self, resource: &str) -> Self {
        let resource = resource.trim().trim_matches('/');
        if !resource.is_empty() {
            self.expenses_resource = resource.to_string();
        }
        self
    }

    /// `monthly-notes`, or `notes` on backends that also keep yearly notes.
    pub fn with_notes_resource(mut self, resource: &str) -> Self {
        let resource = resource.trim().trim_matches('/');
        if !resource.is_empty() {
            self.notes_resource = resource.to_string();
        }
        self
    }

    /// Applied when the client advances a definition itself.
    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login(&self, email: &str, password: &str) -> LedgerResult<LoginResponse> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            email: &'a str,
            password: &'a str,
        }
        let req = self.request(Method::POST, "/auth/login").json(&Credentials {
            email: email.trim(),
            password,
        });
        self.fetch(req, "User", email.trim())
    }

    pub fn me(&self) -> LedgerResult<User> {
        self.fetch(self.request(Method::GET, "/auth/me"), "User", "me")
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn expenses_path(&self, suffix: &str) -> String {
        format!("/{}{}", self.expenses_resource, suffix)
    }

    fn notes_path(&self, suffix: &str) -> String {
        format!("/{}{}", self.notes_resource, suffix)
    }

    /// `monthly-notes` addresses a month as `/{year}/{month}`; the combined
    /// `notes` resource uses `/year/{year}` and `/year/{year}/month/{month}`.
    fn note_period_path(&self, year: i32, month: Option<u32>) -> String {
        match month {
            Some(m) if self.notes_resource == DEFAULT_NOTES_RESOURCE => {
                self.notes_path(&format!("/{}/{}", year, m))
            }
            Some(m) => self.notes_path(&format!("/year/{}/month/{}", year, m)),
            None => self.notes_path(&format!("/year/{}", year)),
        }
    }

    /// A 404 or a `null` body both mean there is no note for the period.
    fn note_for_period(
        &self,
        year: i32,
        month: Option<u32>,
        domain: &str,
    ) -> LedgerResult<Option<MonthlyNote>> {
        let resp = self
            .request(Method::GET, &self.note_period_path(year, month))
            .query(&[("domain", domain)])
            .send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check(resp, "Note", &crate::models::period_label(year, month))?;
        Ok(resp.json::<Option<MonthlyNote>>()?)
    }

    /// `POST /{expenses}/{id}/generate-transaction` books the definition's own
    /// amount on a property the backend picks.
    fn generate_on_backend(
        &self,
        expense: &ExpenseDefinition,
        request: &GenerateRequest,
        amount: Decimal,
    ) -> LedgerResult<Generated> {
        let body = GenerateRequest {
            amount: None,
            property_id: None,
            ..request.clone()
        };
        let req = self
            .request(
                Method::POST,
                &self.expenses_path(&format!("/{}/generate-transaction", expense.id)),
            )
            .json(&body);
        let transaction: Transaction = self.fetch(req, "Expense", &expense.id.to_string())?;
        if transaction.amount != amount {
            return Err(LedgerError::RequestFailed {
                status: None,
                message: format!(
                    "Backend recorded {} for '{}' instead of {} (transaction {})",
                    transaction.amount, expense.name, amount, transaction.id
                ),
            });
        }
        let expense = self.get_expense(expense.id)?;
        Ok(Generated {
            transaction,
            expense,
        })
    }

    /// Creates the transaction with the caller's amount and property, then
    /// stores the advanced payment counter.
    fn generate_on_client(
        &self,
        expense: &ExpenseDefinition,
        request: &GenerateRequest,
    ) -> LedgerResult<Generated> {
        let property_id = match request.property_id {
            Some(id) => id,
            None => self
                .default_property()?
                .map(|p| p.id)
                .ok_or_else(|| LedgerError::validation("No property exists to book the payment on"))?,
        };
        let plan = schedule::generate_transaction(expense, request, property_id, self.policy)?;
        let transaction = self.create_transaction(&plan.transaction)?;
        if plan.expense == *expense {
            return Ok(Generated {
                transaction,
                expense: plan.expense,
            });
        }
        let patch = ExpensePatch {
            payments_completed: Some(plan.expense.payments_completed),
            is_active: Some(plan.expense.is_active),
            ..ExpensePatch::default()
        };
        let stored = self.update_expense(expense.id, &patch)?;
        if stored.payments_completed != plan.expense.payments_completed {
            warn!(
                "backend kept payments_completed at {} for '{}'",
                stored.payments_completed, expense.name
            );
            return Err(LedgerError::RequestFailed {
                status: None,
                message: format!(
                    "Transaction {} was recorded but the backend did not advance the payment count of '{}'",
                    transaction.id, expense.name
                ),
            });
        }
        Ok(Generated {
            transaction,
            expense: stored,
        })
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        entity: &'static str,
        identifier: &str,
    ) -> LedgerResult<T> {
        let resp = check(req.send()?, entity, identifier)?;
        Ok(resp.json::<T>()?)
    }

    fn remove(&self, path: &str, entity: &'static str, id: Uuid) -> LedgerResult<()> {
        let resp = self.request(Method::DELETE, path).send()?;
        check(resp, entity, &id.to_string())?;
        Ok(())
    }
}

/// Maps a non-success response onto the error taxonomy.
fn check(resp: Response, entity: &'static str, identifier: &str) -> LedgerResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    debug!("{} response: {}", status, body);
    Err(error_for_status(status, &body, entity, identifier))
}

pub fn error_for_status(
    status: StatusCode,
    body: &str,
    entity: &'static str,
    identifier: &str,
) -> LedgerError {
    match status.as_u16() {
        400 | 422 => LedgerError::Validation(detail(body)),
        401 | 403 => LedgerError::Unauthorized,
        404 => LedgerError::not_found(entity, identifier),
        code => LedgerError::RequestFailed {
            status: Some(code),
            message: detail(body),
        },
    }
}

/// The `detail` member of an error body, else the raw body.
fn detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}

impl FinanceStore for ApiClient {
    fn list_categories(&self) -> LedgerResult<Vec<Category>> {
        self.fetch(self.request(Method::GET, "/categories"), "Category", "*")
    }

    fn get_category(&self, id: Uuid) -> LedgerResult<Category> {
        let req = self.request(Method::GET, &format!("/categories/{}", id));
        self.fetch(req, "Category", &id.to_string())
    }

    fn create_category(&self, new: &NewCategory) -> LedgerResult<Category> {
        new.validate()?;
        let req = self.request(Method::POST, "/categories").json(new);
        self.fetch(req, "Category", &new.name)
    }

    fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> LedgerResult<Category> {
        let req = self
            .request(Method::PUT, &format!("/categories/{}", id))
            .json(patch);
        self.fetch(req, "Category", &id.to_string())
    }

    fn delete_category(&self, id: Uuid) -> LedgerResult<()> {
        self.remove(&format!("/categories/{}", id), "Category", id)
    }

    fn list_expenses(&self, is_active: Option<bool>) -> LedgerResult<Vec<ExpenseDefinition>> {
        let mut req = self.request(Method::GET, &self.expenses_path(""));
        if let Some(active) = is_active {
            req = req.query(&[("is_active", active)]);
        }
        self.fetch(req, "Expense", "*")
    }

    fn get_expense(&self, id: Uuid) -> LedgerResult<ExpenseDefinition> {
        let req = self.request(Method::GET, &self.expenses_path(&format!("/{}", id)));
        self.fetch(req, "Expense", &id.to_string())
    }

    fn create_expense(&self, new: &NewExpense) -> LedgerResult<ExpenseDefinition> {
        new.validate()?;
        let req = self.request(Method::POST, &self.expenses_path("")).json(new);
        self.fetch(req, "Expense", &new.name)
    }

    fn update_expense(&self, id: Uuid, patch: &ExpensePatch) -> LedgerResult<ExpenseDefinition> {
        let req = self
            .request(Method::PUT, &self.expenses_path(&format!("/{}", id)))
            .json(patch);
        self.fetch(req, "Expense", &id.to_string())
    }

    fn delete_expense(&self, id: Uuid) -> LedgerResult<()> {
        self.remove(&self.expenses_path(&format!("/{}", id)), "Expense", id)
    }

    fn generate_transaction(
        &self,
        id: Uuid,
        request: &GenerateRequest,
    ) -> LedgerResult<Generated> {
        let expense = self.get_expense(id)?;
        let amount = schedule::payment_amount(&expense, request)?;
        let backend_can_book = request.property_id.is_none() && expense.amount == Some(amount);
        if backend_can_book {
            self.generate_on_backend(&expense, request, amount)
        } else {
            self.generate_on_client(&expense, request)
        }
    }

    fn list_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let req = self.request(Method::GET, "/transactions").query(filter);
        self.fetch(req, "Transaction", "*")
    }

    fn get_transaction(&self, id: Uuid) -> LedgerResult<Transaction> {
        let req = self.request(Method::GET, &format!("/transactions/{}", id));
        self.fetch(req, "Transaction", &id.to_string())
    }

    fn create_transaction(&self, new: &NewTransaction) -> LedgerResult<Transaction> {
        new.validate()?;
        // Backends disagree on the name of the definition link; send both.
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(flatten)]
            tx: &'a NewTransaction,
            #[serde(skip_serializing_if = "Option::is_none")]
            recurring_expense_id: Option<Uuid>,
        }
        let body = Body {
            tx: new,
            recurring_expense_id: new.expense_id,
        };
        let req = self.request(Method::POST, "/transactions").json(&body);
        self.fetch(req, "Transaction", &new.date.to_string())
    }

    fn delete_transaction(&self, id: Uuid) -> LedgerResult<()> {
        self.remove(&format!("/transactions/{}", id), "Transaction", id)
    }

    fn list_properties(&self) -> LedgerResult<Vec<Property>> {
        self.fetch(self.request(Method::GET, "/properties"), "Property", "*")
    }

    fn get_property(&self, id: Uuid) -> LedgerResult<Property> {
        let req = self.request(Method::GET, &format!("/properties/{}", id));
        self.fetch(req, "Property", &id.to_string())
    }

    fn create_property(&self, new: &NewProperty) -> LedgerResult<Property> {
        crate::models::validate_name("Property", &new.name)?;
        let req = self.request(Method::POST, "/properties").json(new);
        self.fetch(req, "Property", &new.name)
    }

    fn update_property(&self, id: Uuid, patch: &PropertyPatch) -> LedgerResult<Property> {
        let req = self
            .request(Method::PUT, &format!("/properties/{}", id))
            .json(patch);
        self.fetch(req, "Property", &id.to_string())
    }

    fn delete_property(&self, id: Uuid) -> LedgerResult<()> {
        self.remove(&format!("/properties/{}", id), "Property", id)
    }

    fn list_monthly_notes(&self, domain: &str) -> LedgerResult<Vec<MonthlyNote>> {
        let req = self
            .request(Method::GET, &self.notes_path(""))
            .query(&[("domain", domain)]);
        self.fetch(req, "Note", "*")
    }

    fn monthly_note(
        &self,
        year: i32,
        month: u32,
        domain: &str,
    ) -> LedgerResult<Option<MonthlyNote>> {
        self.note_for_period(year, Some(month), domain)
    }

    fn yearly_note(&self, year: i32, domain: &str) -> LedgerResult<Option<MonthlyNote>> {
        self.note_for_period(year, None, domain)
    }

    fn upsert_monthly_note(&self, note: &NoteUpsert) -> LedgerResult<MonthlyNote> {
        note.validate()?;
        let req = self.request(Method::POST, &self.notes_path("")).json(note);
        self.fetch(req, "Note", &crate::models::period_label(note.year, note.month))
    }

    fn update_monthly_note(&self, id: Uuid, patch: &NotePatch) -> LedgerResult<MonthlyNote> {
        let req = self
            .request(Method::PUT, &self.notes_path(&format!("/{}", id)))
            .json(patch);
        self.fetch(req, "Note", &id.to_string())
    }

    fn delete_monthly_note(&self, id: Uuid) -> LedgerResult<()> {
        self.remove(&self.notes_path(&format!("/{}", id)), "Note", id)
    }
}
