// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, CategoryPatch, ExpenseDefinition, ExpensePatch, GenerateRequest, Generated,
    MonthlyNote, NewCategory, NewExpense, NewProperty, NewTransaction, NotePatch, NoteUpsert,
    Property, PropertyPatch, Transaction, TransactionFilter, validate_name,
};
use crate::schedule::{self, CompletionPolicy};
use crate::store::FinanceStore;
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

pub fn open_or_init(path: &Path) -> LedgerResult<Connection> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)
        .map_err(|e| LedgerError::Storage(format!("Open DB at {}: {}", path.display(), e)))?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> LedgerResult<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS categories(
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        color TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS properties(
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL UNIQUE COLLATE NOCASE,
        is_active INTEGER NOT NULL DEFAULT 1,
        is_default INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- No foreign keys: transactions keep their expense/category ids as provenance
    -- even after the referenced row is gone.
    CREATE TABLE IF NOT EXISTS expenses(
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        amount TEXT,
        category_id BLOB NOT NULL,
        day_of_month INTEGER NOT NULL CHECK(day_of_month BETWEEN 1 AND 31),
        expense_type TEXT NOT NULL CHECK(expense_type IN ('ongoing','installment')),
        start_date TEXT NOT NULL,
        total_payments INTEGER,
        payments_completed INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id BLOB PRIMARY KEY,
        property_id BLOB NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_id BLOB NOT NULL,
        expense_id BLOB,
        description TEXT,
        tags TEXT,
        payment_method TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    -- A row without a month is the note for the whole year.
    CREATE TABLE IF NOT EXISTS notes(
        id BLOB PRIMARY KEY,
        domain TEXT NOT NULL,
        year INTEGER NOT NULL,
        month INTEGER CHECK(month IS NULL OR month BETWEEN 1 AND 12),
        notes TEXT NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS uq_notes_monthly ON notes(domain, year, month)
        WHERE month IS NOT NULL;
    CREATE UNIQUE INDEX IF NOT EXISTS uq_notes_yearly ON notes(domain, year)
        WHERE month IS NULL;
    "#,
    )?;
    migrate_monthly_notes(conn)
}

/// Databases created before yearly notes kept monthly notes in their own table.
fn migrate_monthly_notes(conn: &Connection) -> LedgerResult<()> {
    let legacy: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='monthly_notes')",
        [],
        |r| r.get(0),
    )?;
    if legacy {
        info!("moving monthly_notes into notes");
        conn.execute_batch(
            "BEGIN;
             INSERT OR IGNORE INTO notes(id, domain, year, month, notes)
                 SELECT id, domain, year, month, notes FROM monthly_notes;
             DROP TABLE monthly_notes;
             COMMIT;",
        )?;
    }
    Ok(())
}

/// SQLite-backed store enforcing the same rules as the REST backend.
pub struct LocalStore {
    conn: Connection,
    policy: CompletionPolicy,
}

impl LocalStore {
    pub fn open(path: &Path) -> LedgerResult<Self> {
        Ok(Self::from_connection(open_or_init(path)?))
    }

    pub fn open_in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            policy: CompletionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `month = None` selects the yearly note.
    fn note_for_period(
        &self,
        year: i32,
        month: Option<u32>,
        domain: &str,
    ) -> LedgerResult<Option<MonthlyNote>> {
        let sql = format!(
            "SELECT {} FROM notes WHERE domain=?1 AND year=?2 AND month IS ?3",
            NOTE_COLS
        );
        Ok(self
            .conn
            .query_row(&sql, params![domain, year, month], note_from_row)
            .optional()?)
    }

    fn name_taken(&self, table: &str, name: &str, exclude: Option<Uuid>) -> LedgerResult<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE name = ?1 COLLATE NOCASE AND (?2 IS NULL OR id != ?2)",
            table
        );
        let n: i64 = self
            .conn
            .query_row(&sql, params![name.trim(), exclude], |r| r.get(0))?;
        Ok(n > 0)
    }

    fn write_expense(&self, e: &ExpenseDefinition) -> LedgerResult<()> {
        self.conn.execute(
            "UPDATE expenses SET name=?2, amount=?3, category_id=?4, day_of_month=?5, expense_type=?6,
                 start_date=?7, total_payments=?8, payments_completed=?9, is_active=?10, notes=?11
             WHERE id=?1",
            params![
                e.id,
                e.name,
                e.amount.map(|a| a.to_string()),
                e.category_id,
                e.day_of_month,
                e.expense_type.as_str(),
                e.start_date,
                e.total_payments,
                e.payments_completed,
                e.is_active,
                e.notes
            ],
        )?;
        Ok(())
    }

    fn insert_transaction(&self, new: &NewTransaction) -> LedgerResult<Transaction> {
        let tx = new.clone().into_transaction(Uuid::new_v4());
        let tags = tx.tags.as_ref().map(serde_json::to_string).transpose()?;
        self.conn.execute(
            "INSERT INTO transactions(id, property_id, date, amount, category_id, expense_id,
                 description, tags, payment_method, notes)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
            params![
                tx.id,
                tx.property_id,
                tx.date,
                tx.amount.to_string(),
                tx.category_id,
                tx.expense_id,
                tx.description,
                tags,
                tx.payment_method,
                tx.notes
            ],
        )?;
        info!("recorded transaction {} on {} ({})", tx.id, tx.date, tx.amount);
        Ok(tx)
    }

    fn set_default_property(&self, id: Uuid) -> LedgerResult<()> {
        self.conn.execute(
            "UPDATE properties SET is_default = (id = ?1)",
            params![id],
        )?;
        Ok(())
    }

    /// First property other than `id`, in creation order.
    fn other_property(&self, id: Uuid) -> LedgerResult<Option<Uuid>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id FROM properties WHERE id != ?1 ORDER BY rowid LIMIT 1",
                params![id],
                |r| r.get(0),
            )
            .optional()?)
    }
}

fn parse_col<T>(r: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = r.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_opt_col<T>(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = r.get(idx)?;
    raw.map(|s| s.parse::<T>())
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

const CATEGORY_COLS: &str = "id, name, type, color";

fn category_from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: parse_col(r, 2)?,
        color: r.get(3)?,
    })
}

const EXPENSE_COLS: &str = "id, name, amount, category_id, day_of_month, expense_type, start_date, \
     total_payments, payments_completed, is_active, notes";

fn expense_from_row(r: &Row<'_>) -> rusqlite::Result<ExpenseDefinition> {
    Ok(ExpenseDefinition {
        id: r.get(0)?,
        name: r.get(1)?,
        amount: parse_opt_col(r, 2)?,
        category_id: r.get(3)?,
        day_of_month: r.get(4)?,
        expense_type: parse_col(r, 5)?,
        start_date: r.get(6)?,
        total_payments: r.get(7)?,
        payments_completed: r.get(8)?,
        is_active: r.get(9)?,
        notes: r.get(10)?,
    })
}

const TRANSACTION_COLS: &str = "id, property_id, date, amount, category_id, expense_id, \
     description, tags, payment_method, notes";

fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let tags: Option<String> = r.get(7)?;
    let tags = tags
        .map(|s| serde_json::from_str::<Vec<String>>(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: r.get(0)?,
        property_id: r.get(1)?,
        date: r.get(2)?,
        amount: parse_col(r, 3)?,
        category_id: r.get(4)?,
        expense_id: r.get(5)?,
        description: r.get(6)?,
        tags,
        payment_method: r.get(8)?,
        notes: r.get(9)?,
    })
}

const PROPERTY_COLS: &str = "id, name, is_active, is_default";

fn property_from_row(r: &Row<'_>) -> rusqlite::Result<Property> {
    Ok(Property {
        id: r.get(0)?,
        name: r.get(1)?,
        is_active: r.get(2)?,
        is_default: r.get(3)?,
    })
}

const NOTE_COLS: &str = "id, domain, year, month, notes";

fn note_from_row(r: &Row<'_>) -> rusqlite::Result<MonthlyNote> {
    Ok(MonthlyNote {
        id: r.get(0)?,
        domain: r.get(1)?,
        year: r.get(2)?,
        month: r.get(3)?,
        notes: r.get(4)?,
    })
}

impl FinanceStore for LocalStore {
    // ---- categories ----

    fn list_categories(&self) -> LedgerResult<Vec<Category>> {
        let sql = format!(
            "SELECT {} FROM categories ORDER BY name COLLATE NOCASE",
            CATEGORY_COLS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_category(&self, id: Uuid) -> LedgerResult<Category> {
        let sql = format!("SELECT {} FROM categories WHERE id=?1", CATEGORY_COLS);
        self.conn
            .query_row(&sql, params![id], category_from_row)
            .optional()?
            .ok_or_else(|| LedgerError::not_found("Category", id))
    }

    fn create_category(&self, new: &NewCategory) -> LedgerResult<Category> {
        new.validate()?;
        if self.name_taken("categories", &new.name, None)? {
            return Err(LedgerError::validation(format!(
                "Category with name '{}' already exists",
                new.name.trim()
            )));
        }
        let cat = Category {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            r#type: new.r#type,
            color: new.color.clone(),
        };
        self.conn.execute(
            "INSERT INTO categories(id, name, type, color) VALUES (?1,?2,?3,?4)",
            params![cat.id, cat.name, cat.r#type.as_str(), cat.color],
        )?;
        info!("created category '{}' ({})", cat.name, cat.r#type);
        Ok(cat)
    }

    fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> LedgerResult<Category> {
        let mut cat = self.get_category(id)?;
        if patch.is_empty() {
            return Ok(cat);
        }
        if let Some(name) = &patch.name {
            validate_name("Category", name)?;
            if self.name_taken("categories", name, Some(id))? {
                return Err(LedgerError::validation(format!(
                    "Category with name '{}' already exists",
                    name.trim()
                )));
            }
        }
        if let Some(color) = &patch.color {
            crate::color::validate_hex(color)?;
        }
        patch.apply(&mut cat);
        self.conn.execute(
            "UPDATE categories SET name=?2, type=?3, color=?4 WHERE id=?1",
            params![cat.id, cat.name, cat.r#type.as_str(), cat.color],
        )?;
        Ok(cat)
    }

    fn delete_category(&self, id: Uuid) -> LedgerResult<()> {
        let n = self
            .conn
            .execute("DELETE FROM categories WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(LedgerError::not_found("Category", id));
        }
        Ok(())
    }

    // ---- expenses ----

    fn list_expenses(&self, is_active: Option<bool>) -> LedgerResult<Vec<ExpenseDefinition>> {
        let sql = format!(
            "SELECT {} FROM expenses WHERE (?1 IS NULL OR is_active = ?1) ORDER BY day_of_month, name",
            EXPENSE_COLS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![is_active], expense_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_expense(&self, id: Uuid) -> LedgerResult<ExpenseDefinition> {
        let sql = format!("SELECT {} FROM expenses WHERE id=?1", EXPENSE_COLS);
        self.conn
            .query_row(&sql, params![id], expense_from_row)
            .optional()?
            .ok_or_else(|| LedgerError::not_found("Expense", id))
    }

    fn create_expense(&self, new: &NewExpense) -> LedgerResult<ExpenseDefinition> {
        new.validate()?;
        self.get_category(new.category_id)?;
        let e = new.clone().into_definition(Uuid::new_v4());
        self.conn.execute(
            "INSERT INTO expenses(id, name, amount, category_id, day_of_month, expense_type,
                 start_date, total_payments, payments_completed, is_active, notes)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
            params![
                e.id,
                e.name,
                e.amount.map(|a| a.to_string()),
                e.category_id,
                e.day_of_month,
                e.expense_type.as_str(),
                e.start_date,
                e.total_payments,
                e.payments_completed,
                e.is_active,
                e.notes
            ],
        )?;
        info!("created {} expense '{}'", e.expense_type, e.name);
        Ok(e)
    }

    fn update_expense(&self, id: Uuid, patch: &ExpensePatch) -> LedgerResult<ExpenseDefinition> {
        let mut e = self.get_expense(id)?;
        if patch.is_empty() {
            return Ok(e);
        }
        if let Some(cat) = patch.category_id {
            self.get_category(cat)?;
        }
        patch.apply(&mut e);
        e.validate()?;
        self.write_expense(&e)?;
        Ok(e)
    }

    fn delete_expense(&self, id: Uuid) -> LedgerResult<()> {
        let n = self
            .conn
            .execute("DELETE FROM expenses WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(LedgerError::not_found("Expense", id));
        }
        Ok(())
    }

    fn generate_transaction(
        &self,
        id: Uuid,
        request: &GenerateRequest,
    ) -> LedgerResult<Generated> {
        let sql_tx = self.conn.unchecked_transaction()?;
        let expense = self.get_expense(id)?;
        let property_id = match request.property_id {
            Some(p) => self.get_property(p)?.id,
            None => {
                self.default_property()?
                    .ok_or_else(|| {
                        LedgerError::validation(
                            "No property exists; create one before generating transactions",
                        )
                    })?
                    .id
            }
        };
        let generation =
            schedule::generate_transaction(&expense, request, property_id, self.policy)?;
        let transaction = self.insert_transaction(&generation.transaction)?;
        self.write_expense(&generation.expense)?;
        sql_tx.commit()?;
        debug!(
            "expense {} now at {} payments",
            id, generation.expense.payments_completed
        );
        Ok(Generated {
            transaction,
            expense: generation.expense,
        })
    }

    // ---- transactions ----

    fn list_transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut sql = format!("SELECT {} FROM transactions WHERE 1=1", TRANSACTION_COLS);
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(start) = filter.start_date {
            params_vec.push(Box::new(start));
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }
        if let Some(end) = filter.end_date {
            params_vec.push(Box::new(end));
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }
        if let Some(cat) = filter.category_id {
            params_vec.push(Box::new(cat));
            sql.push_str(&format!(" AND category_id = ?{}", params_vec.len()));
        }
        sql.push_str(" ORDER BY date DESC, rowid DESC");
        if filter.limit.is_some() || filter.offset.is_some() {
            let limit = filter.limit.map(i64::from).unwrap_or(-1);
            params_vec.push(Box::new(limit));
            sql.push_str(&format!(" LIMIT ?{}", params_vec.len()));
            params_vec.push(Box::new(i64::from(filter.offset.unwrap_or(0))));
            sql.push_str(&format!(" OFFSET ?{}", params_vec.len()));
        }
        debug!("list transactions: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params_vec.iter().map(|p| p.as_ref())),
            transaction_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_transaction(&self, id: Uuid) -> LedgerResult<Transaction> {
        let sql = format!("SELECT {} FROM transactions WHERE id=?1", TRANSACTION_COLS);
        self.conn
            .query_row(&sql, params![id], transaction_from_row)
            .optional()?
            .ok_or_else(|| LedgerError::not_found("Transaction", id))
    }

    fn create_transaction(&self, new: &NewTransaction) -> LedgerResult<Transaction> {
        new.validate()?;
        self.get_category(new.category_id)?;
        self.get_property(new.property_id)?;
        if let Some(expense_id) = new.expense_id {
            self.get_expense(expense_id)?;
        }
        self.insert_transaction(new)
    }

    fn delete_transaction(&self, id: Uuid) -> LedgerResult<()> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(LedgerError::not_found("Transaction", id));
        }
        Ok(())
    }

    // ---- properties ----

    fn list_properties(&self) -> LedgerResult<Vec<Property>> {
        let sql = format!("SELECT {} FROM properties ORDER BY rowid", PROPERTY_COLS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], property_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn get_property(&self, id: Uuid) -> LedgerResult<Property> {
        let sql = format!("SELECT {} FROM properties WHERE id=?1", PROPERTY_COLS);
        self.conn
            .query_row(&sql, params![id], property_from_row)
            .optional()?
            .ok_or_else(|| LedgerError::not_found("Property", id))
    }

    fn create_property(&self, new: &NewProperty) -> LedgerResult<Property> {
        validate_name("Property", &new.name)?;
        if self.name_taken("properties", &new.name, None)? {
            return Err(LedgerError::validation(format!(
                "Property with name '{}' already exists",
                new.name.trim()
            )));
        }
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM properties", [], |r| r.get(0))?;
        let id = Uuid::new_v4();
        let is_default = new.is_default || count == 0;
        self.conn.execute(
            "INSERT INTO properties(id, name, is_active, is_default) VALUES (?1,?2,?3,?4)",
            params![id, new.name.trim(), new.is_active, false],
        )?;
        if is_default {
            self.set_default_property(id)?;
        }
        info!("created property '{}'", new.name.trim());
        self.get_property(id)
    }

    fn update_property(&self, id: Uuid, patch: &PropertyPatch) -> LedgerResult<Property> {
        let current = self.get_property(id)?;
        if let Some(name) = &patch.name {
            validate_name("Property", name)?;
            if self.name_taken("properties", name, Some(id))? {
                return Err(LedgerError::validation(format!(
                    "Property with name '{}' already exists",
                    name.trim()
                )));
            }
        }
        match patch.is_default {
            Some(true) => self.set_default_property(id)?,
            Some(false) if current.is_default => match self.other_property(id)? {
                Some(other) => self.set_default_property(other)?,
                None => {
                    return Err(LedgerError::validation(
                        "Cannot unset default property. At least one property must be default.",
                    ));
                }
            },
            _ => {}
        }
        if let Some(name) = &patch.name {
            self.conn.execute(
                "UPDATE properties SET name=?2 WHERE id=?1",
                params![id, name.trim()],
            )?;
        }
        if let Some(active) = patch.is_active {
            self.conn.execute(
                "UPDATE properties SET is_active=?2 WHERE id=?1",
                params![id, active],
            )?;
        }
        self.get_property(id)
    }

    fn delete_property(&self, id: Uuid) -> LedgerResult<()> {
        let current = self.get_property(id)?;
        if current.is_default {
            match self.other_property(id)? {
                Some(other) => self.set_default_property(other)?,
                None => {
                    return Err(LedgerError::validation(
                        "Cannot delete the only property. At least one property must exist.",
                    ));
                }
            }
        }
        self.conn
            .execute("DELETE FROM properties WHERE id=?1", params![id])?;
        Ok(())
    }

    // ---- notes ----

    fn list_monthly_notes(&self, domain: &str) -> LedgerResult<Vec<MonthlyNote>> {
        let sql = format!(
            "SELECT {} FROM notes WHERE domain=?1 ORDER BY year DESC, month IS NOT NULL, month DESC",
            NOTE_COLS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![domain], note_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
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
        let domain = note.domain.trim();
        match self.note_for_period(note.year, note.month, domain)? {
            Some(existing) => self.update_monthly_note(
                existing.id,
                &NotePatch {
                    notes: Some(note.notes.clone()),
                },
            ),
            None => {
                let created = MonthlyNote {
                    id: Uuid::new_v4(),
                    domain: domain.to_string(),
                    year: note.year,
                    month: note.month,
                    notes: note.notes.clone(),
                };
                self.conn.execute(
                    "INSERT INTO notes(id, domain, year, month, notes) VALUES (?1,?2,?3,?4,?5)",
                    params![
                        created.id,
                        created.domain,
                        created.year,
                        created.month,
                        created.notes
                    ],
                )?;
                info!("created note for {} ({})", created.period(), created.domain);
                Ok(created)
            }
        }
    }

    fn update_monthly_note(&self, id: Uuid, patch: &NotePatch) -> LedgerResult<MonthlyNote> {
        let sql = format!("SELECT {} FROM notes WHERE id=?1", NOTE_COLS);
        let mut note = self
            .conn
            .query_row(&sql, params![id], note_from_row)
            .optional()?
            .ok_or_else(|| LedgerError::not_found("Note", id))?;
        if let Some(text) = &patch.notes {
            note.notes = text.clone();
            self.conn.execute(
                "UPDATE notes SET notes=?2 WHERE id=?1",
                params![id, note.notes],
            )?;
        }
        Ok(note)
    }

    fn delete_monthly_note(&self, id: Uuid) -> LedgerResult<()> {
        let n = self
            .conn
            .execute("DELETE FROM notes WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(LedgerError::not_found("Note", id));
        }
        Ok(())
    }
}
