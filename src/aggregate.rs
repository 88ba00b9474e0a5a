// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly aggregation over raw ledger rows.
//!
//! Everything here is a pure fold over already-fetched rows: deterministic,
//! idempotent, and total over validated input. Amounts are stored positive;
//! direction is carried by the expense category and the debt type.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    DateWindow, DebtDirection, DebtEntry, ExpenseCategory, ExpenseEntry, MonthKey, SalaryEntry,
};

/// Derived figures for one month.
///
/// `expenses` counts general rows only (no deductions, no Gasoline);
/// `total_expenses` additionally folds in the debt balance, so money owed
/// back offsets spending for the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net_income: Decimal,
    pub expenses: Decimal,
    pub debt_balance: Decimal,
    pub total_expenses: Decimal,
    pub net_balance: Decimal,
}

#[derive(Debug, Default)]
struct MonthAcc {
    gross: Decimal,
    deductions: Decimal,
    expenses: Decimal,
    debt_balance: Decimal,
}

/// Roll the period's rows into one summary per requested month, in the
/// caller-given order. Every key appears exactly once, zero-filled when
/// nothing contributes; rows dated outside the keys are ignored.
pub fn monthly_summary(
    salaries: &[SalaryEntry],
    expenses: &[ExpenseEntry],
    debts: &[DebtEntry],
    months: &[MonthKey],
) -> Vec<MonthlySummary> {
    let mut acc: BTreeMap<MonthKey, MonthAcc> = months
        .iter()
        .map(|&month| (month, MonthAcc::default()))
        .collect();

    for salary in salaries {
        if let Some(slot) = acc.get_mut(&MonthKey::from_date(salary.date)) {
            slot.gross += salary.amount;
        }
    }
    for expense in expenses {
        let Some(slot) = acc.get_mut(&MonthKey::from_date(expense.date)) else {
            continue;
        };
        if expense.category.is_deduction() {
            slot.deductions += expense.amount;
        } else if expense.category != ExpenseCategory::Gasoline {
            slot.expenses += expense.amount;
        }
    }
    for debt in debts {
        if let Some(slot) = acc.get_mut(&MonthKey::from_date(debt.date)) {
            match debt.direction {
                DebtDirection::TheyOwe => slot.debt_balance += debt.amount,
                DebtDirection::IOwe => slot.debt_balance -= debt.amount,
            }
        }
    }

    months
        .iter()
        .map(|&month| {
            let a = &acc[&month];
            let net_income = a.gross - a.deductions;
            let total_expenses = a.expenses - a.debt_balance;
            MonthlySummary {
                month,
                gross: a.gross,
                deductions: a.deductions,
                net_income,
                expenses: a.expenses,
                debt_balance: a.debt_balance,
                total_expenses,
                net_balance: net_income - total_expenses,
            }
        })
        .collect()
}

/// Distinct months (ascending) with at least one salary, non-Gasoline
/// expense, or debt row. A month holding only Gasoline rows does not appear.
pub fn observed_months(
    salaries: &[SalaryEntry],
    expenses: &[ExpenseEntry],
    debts: &[DebtEntry],
) -> Vec<MonthKey> {
    let mut months = BTreeSet::new();
    for salary in salaries {
        months.insert(MonthKey::from_date(salary.date));
    }
    for expense in expenses {
        if expense.category != ExpenseCategory::Gasoline {
            months.insert(MonthKey::from_date(expense.date));
        }
    }
    for debt in debts {
        months.insert(MonthKey::from_date(debt.date));
    }
    months.into_iter().collect()
}

/// Net of everything owed over the given rows: theyOwe minus iOwe.
/// Positive means the counterparty owes the household.
pub fn debt_balance(debts: &[DebtEntry]) -> Decimal {
    debts.iter().fold(Decimal::ZERO, |acc, d| match d.direction {
        DebtDirection::TheyOwe => acc + d.amount,
        DebtDirection::IOwe => acc - d.amount,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub label: String,
    pub total: Decimal,
}

/// Per-category totals for the window, chart flavor: general categories
/// only, plus a synthetic counterparty-account entry when the household
/// owes a net amount for the window. Money owed *to* the household adds
/// nothing here, unlike `MonthlySummary::debt_balance`.
pub fn category_breakdown(
    expenses: &[ExpenseEntry],
    debts: &[DebtEntry],
    person: &str,
    window: DateWindow,
) -> Vec<CategoryTotal> {
    let mut totals = general_totals(expenses, window);
    let owed = owed_net(debts, window);
    if owed > Decimal::ZERO {
        *totals.entry(account_label(person)).or_insert(Decimal::ZERO) += owed;
    }
    totals
        .into_iter()
        .map(|(label, total)| CategoryTotal { label, total })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub categories: Vec<CategoryTotal>,
    pub grand_total: Decimal,
}

/// Per-category totals for the window, ledger flavor: the counterparty
/// entry is shown whenever its net is nonzero (negative included), the list
/// stays label-sorted, and the grand total always folds the net in.
pub fn category_spending(
    expenses: &[ExpenseEntry],
    debts: &[DebtEntry],
    person: &str,
    window: DateWindow,
) -> CategorySpending {
    let mut totals = general_totals(expenses, window);
    let owed = owed_net(debts, window);
    let grand_total = totals.values().copied().sum::<Decimal>() + owed;
    if owed != Decimal::ZERO {
        *totals.entry(account_label(person)).or_insert(Decimal::ZERO) += owed;
    }
    CategorySpending {
        categories: totals
            .into_iter()
            .map(|(label, total)| CategoryTotal { label, total })
            .collect(),
        grand_total,
    }
}

pub fn sort_by_total_desc(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| b.total.cmp(&a.total));
}

pub fn sort_by_label(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| a.label.cmp(&b.label));
}

fn account_label(person: &str) -> String {
    format!("{}'s Account", person)
}

fn general_totals(expenses: &[ExpenseEntry], window: DateWindow) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        if !window.contains(expense.date)
            || expense.category.is_deduction()
            || expense.category == ExpenseCategory::Gasoline
        {
            continue;
        }
        *totals
            .entry(expense.category.as_str().to_string())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
}

// Inverse sign of `debt_balance`: what the household owes for the window.
fn owed_net(debts: &[DebtEntry], window: DateWindow) -> Decimal {
    debts
        .iter()
        .filter(|d| window.contains(d.date))
        .fold(Decimal::ZERO, |acc, d| match d.direction {
            DebtDirection::IOwe => acc + d.amount,
            DebtDirection::TheyOwe => acc - d.amount,
        })
}

/// A salary entry with the deduction rows sharing its exact date.
#[derive(Debug, Clone, Serialize)]
pub struct Payslip {
    pub salary: SalaryEntry,
    pub deductions: Vec<ExpenseEntry>,
    pub total_deductions: Decimal,
    pub net: Decimal,
}

/// Attach deductions by exact date match (day precision). No matches means
/// `total_deductions` is zero and `net` equals the gross amount; bonuses
/// fall out that way by construction.
pub fn payslip_with_deductions(salary: SalaryEntry, expenses: &[ExpenseEntry]) -> Payslip {
    let deductions: Vec<ExpenseEntry> = expenses
        .iter()
        .filter(|e| e.date == salary.date)
        .cloned()
        .collect();
    let total_deductions: Decimal = deductions.iter().map(|d| d.amount).sum();
    let net = salary.amount - total_deductions;
    Payslip {
        salary,
        deductions,
        total_deductions,
        net,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeductionBreakdown {
    pub month: MonthKey,
    pub total: Decimal,
    pub by_category: Vec<(String, Decimal)>,
}

/// Monthly deduction totals with a per-category split, ascending by month.
/// Months without deduction rows are absent.
pub fn monthly_deductions(expenses: &[ExpenseEntry]) -> Vec<DeductionBreakdown> {
    let mut acc: BTreeMap<MonthKey, BTreeMap<String, Decimal>> = BTreeMap::new();
    for expense in expenses {
        if !expense.category.is_deduction() {
            continue;
        }
        *acc.entry(MonthKey::from_date(expense.date))
            .or_default()
            .entry(expense.category.as_str().to_string())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    acc.into_iter()
        .map(|(month, by_category)| DeductionBreakdown {
            month,
            total: by_category.values().copied().sum(),
            by_category: by_category.into_iter().collect(),
        })
        .collect()
}
