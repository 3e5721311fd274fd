// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurring and installment expense scheduling.
//!
//! Everything here is a pure function of an [`ExpenseDefinition`]; the stores
//! call into it and persist whatever it returns. Generation is always an
//! explicit request for one date, nothing runs in the background.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseDefinition, ExpenseType, GenerateRequest, NewTransaction};
use crate::utils::month_end;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

/// How many definitions the dashboard lists as upcoming.
pub const UPCOMING_LIMIT: usize = 5;

/// What happens to an installment definition once its last payment is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Leave it active; the user switches it off.
    #[default]
    KeepActive,
    /// Switch it off together with the last payment.
    Deactivate,
}

impl CompletionPolicy {
    pub fn from_flag(deactivate: bool) -> Self {
        if deactivate {
            Self::Deactivate
        } else {
            Self::KeepActive
        }
    }
}

/// A transaction ready to be stored plus the definition as it must look afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub transaction: NewTransaction,
    pub expense: ExpenseDefinition,
}

/// Business-rule checks for generation: active first, then installment capacity.
pub fn check_eligible(expense: &ExpenseDefinition) -> LedgerResult<()> {
    if !expense.is_active {
        return Err(LedgerError::InactiveExpense {
            name: expense.name.clone(),
        });
    }
    if expense.expense_type == ExpenseType::Installment {
        let total = expense.total_payments.unwrap_or(0);
        if expense.payments_completed >= total {
            return Err(LedgerError::InstallmentExhausted {
                name: expense.name.clone(),
                completed: expense.payments_completed,
                total,
            });
        }
    }
    Ok(())
}

/// Builds the transaction for `request.date` and advances the payment counter.
///
/// The input definition is never touched; on error nothing is produced.
pub fn generate_transaction(
    expense: &ExpenseDefinition,
    request: &GenerateRequest,
    property_id: Uuid,
    policy: CompletionPolicy,
) -> LedgerResult<Generation> {
    let amount = payment_amount(expense, request)?;
    let transaction = NewTransaction {
        property_id,
        date: request.date,
        amount,
        category_id: expense.category_id,
        expense_id: Some(expense.id),
        description: Some(expense.name.clone()),
        tags: None,
        payment_method: None,
        notes: request.notes.clone().or_else(|| expense.notes.clone()),
    };

    Ok(Generation {
        transaction,
        expense: advance(expense, policy),
    })
}

/// Eligibility plus the amount this payment books: the request's, else the definition's.
pub fn payment_amount(expense: &ExpenseDefinition, request: &GenerateRequest) -> LedgerResult<Decimal> {
    check_eligible(expense)?;
    let amount = request.amount.or(expense.amount).ok_or_else(|| {
        LedgerError::validation(format!(
            "Expense '{}' has a variable amount; supply one for this payment",
            expense.name
        ))
    })?;
    crate::models::validate_amount(amount)?;
    Ok(amount)
}

/// The definition after one more payment.
fn advance(expense: &ExpenseDefinition, policy: CompletionPolicy) -> ExpenseDefinition {
    let mut next = expense.clone();
    if next.expense_type == ExpenseType::Installment {
        next.payments_completed += 1;
        if policy == CompletionPolicy::Deactivate && is_complete(&next) {
            next.is_active = false;
        }
    }
    next
}

/// Payments left on an installment plan; `None` for ongoing definitions.
pub fn remaining_payments(expense: &ExpenseDefinition) -> Option<u32> {
    match expense.expense_type {
        ExpenseType::Installment => Some(
            expense
                .total_payments
                .unwrap_or(0)
                .saturating_sub(expense.payments_completed),
        ),
        ExpenseType::Ongoing => None,
    }
}

pub fn is_complete(expense: &ExpenseDefinition) -> bool {
    remaining_payments(expense) == Some(0)
}

/// The definition's date in the given month, clamped to the month's last day.
pub fn due_date(expense: &ExpenseDefinition, year: i32, month: u32) -> Option<NaiveDate> {
    let last = month_end(year, month)?;
    let day = expense.day_of_month.clamp(1, last.day());
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Active definitions still due this month, soonest first, at most [`UPCOMING_LIMIT`].
///
/// Definitions whose day already passed are not carried into next month.
pub fn upcoming(expenses: &[ExpenseDefinition], today: NaiveDate) -> Vec<&ExpenseDefinition> {
    let mut due: Vec<&ExpenseDefinition> = expenses
        .iter()
        .filter(|e| e.is_active && e.day_of_month >= today.day())
        .collect();
    due.sort_by_key(|e| e.day_of_month);
    due.truncate(UPCOMING_LIMIT);
    due
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installment(total: u32, completed: u32) -> ExpenseDefinition {
        ExpenseDefinition {
            id: Uuid::new_v4(),
            name: "Laptop".into(),
            amount: Some(Decimal::new(25000, 2)),
            category_id: Uuid::new_v4(),
            day_of_month: 31,
            expense_type: ExpenseType::Installment,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            total_payments: Some(total),
            payments_completed: completed,
            is_active: true,
            notes: None,
        }
    }

    #[test]
    fn last_installment_deactivates_under_policy() {
        let def = installment(3, 2);
        let req = GenerateRequest::on(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        let g = generate_transaction(&def, &req, Uuid::new_v4(), CompletionPolicy::Deactivate)
            .unwrap();
        assert_eq!(g.expense.payments_completed, 3);
        assert!(!g.expense.is_active);

        let kept = generate_transaction(&def, &req, Uuid::new_v4(), CompletionPolicy::KeepActive)
            .unwrap();
        assert!(kept.expense.is_active);
    }

    #[test]
    fn due_date_clamps_to_short_months() {
        let def = installment(3, 0);
        assert_eq!(
            due_date(&def, 2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            due_date(&def, 2023, 2),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );
        assert_eq!(
            due_date(&def, 2024, 4),
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
        assert_eq!(due_date(&def, 2024, 13), None);
    }
}
