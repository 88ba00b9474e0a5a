// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use homeledger::aggregate;
use homeledger::models::{
    DebtDirection, DebtEntry, ExpenseCategory, ExpenseEntry, MonthKey, SalaryEntry, SalarySource,
};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn mk(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m).unwrap()
}

fn salary(id: i64, date: NaiveDate, amount: &str, source: SalarySource) -> SalaryEntry {
    SalaryEntry {
        id,
        date,
        amount: dec(amount),
        source,
    }
}

fn expense(id: i64, date: NaiveDate, amount: &str, category: ExpenseCategory) -> ExpenseEntry {
    ExpenseEntry {
        id,
        date,
        amount: dec(amount),
        category,
        description: category.as_str().to_string(),
    }
}

fn debt(id: i64, date: NaiveDate, amount: &str, direction: DebtDirection) -> DebtEntry {
    DebtEntry {
        id,
        date,
        amount: dec(amount),
        person: "Mom".to_string(),
        direction,
        description: "ledger".to_string(),
    }
}

#[test]
fn monthly_summary_zero_fills_every_month() {
    let months = MonthKey::months_of_year(2024);
    let salaries = [salary(1, d(2024, 3, 15), "5000", SalarySource::Payslip)];
    let summaries = aggregate::monthly_summary(&salaries, &[], &[], &months);

    assert_eq!(summaries.len(), 12);
    for (summary, month) in summaries.iter().zip(&months) {
        assert_eq!(summary.month, *month);
    }
    let march = &summaries[2];
    assert_eq!(march.gross, dec("5000"));
    for summary in summaries.iter().filter(|s| s.month != mk(2024, 3)) {
        assert_eq!(summary.gross, Decimal::ZERO);
        assert_eq!(summary.net_income, Decimal::ZERO);
        assert_eq!(summary.expenses, Decimal::ZERO);
        assert_eq!(summary.debt_balance, Decimal::ZERO);
        assert_eq!(summary.net_balance, Decimal::ZERO);
    }
}

#[test]
fn monthly_summary_identities_hold() {
    let months = vec![mk(2024, 3)];
    let salaries = [salary(1, d(2024, 3, 15), "5000", SalarySource::Payslip)];
    let expenses = [
        expense(1, d(2024, 3, 15), "500", ExpenseCategory::Taxes),
        expense(2, d(2024, 3, 15), "200", ExpenseCategory::Retirement),
        expense(3, d(2024, 3, 2), "1200", ExpenseCategory::Rent),
    ];
    let debts = [
        debt(1, d(2024, 3, 1), "100", DebtDirection::IOwe),
        debt(2, d(2024, 3, 1), "40", DebtDirection::TheyOwe),
    ];
    let summaries = aggregate::monthly_summary(&salaries, &expenses, &debts, &months);

    let march = &summaries[0];
    assert_eq!(march.gross, dec("5000"));
    assert_eq!(march.deductions, dec("700"));
    assert_eq!(march.net_income, march.gross - march.deductions);
    assert_eq!(march.expenses, dec("1200"));
    assert_eq!(march.debt_balance, dec("-60"));
    assert_eq!(march.total_expenses, dec("1260"));
    assert_eq!(march.net_balance, march.net_income - march.total_expenses);
}

#[test]
fn debt_balance_reduces_or_inflates_reported_expenses() {
    // iOwe 100, theyOwe 40 => balance -60, so reported expenses grow by 60
    let months = vec![mk(2024, 5)];
    let expenses = [expense(1, d(2024, 5, 2), "300", ExpenseCategory::Venmo)];
    let debts = [
        debt(1, d(2024, 5, 1), "100", DebtDirection::IOwe),
        debt(2, d(2024, 5, 1), "40", DebtDirection::TheyOwe),
    ];
    assert_eq!(aggregate::debt_balance(&debts), dec("-60"));

    let summaries = aggregate::monthly_summary(&[], &expenses, &debts, &months);
    assert_eq!(summaries[0].total_expenses, dec("360"));

    // theyOwe above iOwe offsets spending instead
    let debts = [debt(1, d(2024, 5, 1), "90", DebtDirection::TheyOwe)];
    let summaries = aggregate::monthly_summary(&[], &expenses, &debts, &months);
    assert_eq!(summaries[0].debt_balance, dec("90"));
    assert_eq!(summaries[0].total_expenses, dec("210"));
}

#[test]
fn gasoline_never_contributes() {
    let months = vec![mk(2024, 7)];
    let expenses = [
        expense(1, d(2024, 7, 2), "80", ExpenseCategory::Gasoline),
        expense(2, d(2024, 7, 2), "100", ExpenseCategory::Rent),
    ];
    let summaries = aggregate::monthly_summary(&[], &expenses, &[], &months);
    assert_eq!(summaries[0].expenses, dec("100"));
    assert_eq!(summaries[0].deductions, Decimal::ZERO);

    let window = mk(2024, 7).window();
    let breakdown = aggregate::category_breakdown(&expenses, &[], "Mom", window);
    assert!(breakdown.iter().all(|c| c.label != "Gasoline"));

    assert!(aggregate::monthly_deductions(&expenses).is_empty());
}

#[test]
fn rows_outside_requested_months_are_ignored() {
    let months = vec![mk(2024, 3)];
    let salaries = [salary(1, d(2024, 4, 15), "5000", SalarySource::Payslip)];
    let summaries = aggregate::monthly_summary(&salaries, &[], &[], &months);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].gross, Decimal::ZERO);
}

#[test]
fn payslip_with_deductions_sums_same_dated_rows() {
    let pay = salary(1, d(2024, 3, 15), "5000", SalarySource::Payslip);
    let expenses = [
        expense(1, d(2024, 3, 15), "500", ExpenseCategory::Taxes),
        expense(2, d(2024, 3, 15), "200", ExpenseCategory::Retirement),
        expense(3, d(2024, 3, 16), "999", ExpenseCategory::Taxes),
    ];
    let payslip = aggregate::payslip_with_deductions(pay, &expenses);
    assert_eq!(payslip.deductions.len(), 2);
    assert_eq!(payslip.total_deductions, dec("700"));
    assert_eq!(payslip.net, dec("4300"));
}

#[test]
fn payslip_without_matches_nets_the_gross() {
    let bonus = salary(2, d(2024, 3, 28), "1500", SalarySource::Bonus);
    let expenses = [expense(1, d(2024, 3, 15), "500", ExpenseCategory::Taxes)];
    let payslip = aggregate::payslip_with_deductions(bonus, &expenses);
    assert!(payslip.deductions.is_empty());
    assert_eq!(payslip.total_deductions, Decimal::ZERO);
    assert_eq!(payslip.net, dec("1500"));
}

#[test]
fn breakdown_adds_account_when_household_owes() {
    let window = mk(2024, 6).window();
    let expenses = [
        expense(1, d(2024, 6, 2), "1000", ExpenseCategory::Rent),
        expense(2, d(2024, 6, 2), "80", ExpenseCategory::Gasoline),
    ];
    let debts = [debt(1, d(2024, 6, 1), "30", DebtDirection::IOwe)];

    let mut breakdown = aggregate::category_breakdown(&expenses, &debts, "Mom", window);
    aggregate::sort_by_total_desc(&mut breakdown);
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].label, "Rent");
    assert_eq!(breakdown[0].total, dec("1000"));
    assert_eq!(breakdown[1].label, "Mom's Account");
    assert_eq!(breakdown[1].total, dec("30"));

    let spending = aggregate::category_spending(&expenses, &debts, "Mom", window);
    assert_eq!(spending.grand_total, dec("1030"));
}

#[test]
fn breakdown_skips_account_when_counterparty_owes() {
    let window = mk(2024, 6).window();
    let expenses = [expense(1, d(2024, 6, 2), "1000", ExpenseCategory::Rent)];
    let debts = [debt(1, d(2024, 6, 1), "50", DebtDirection::TheyOwe)];

    let breakdown = aggregate::category_breakdown(&expenses, &debts, "Mom", window);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].label, "Rent");

    // The ledger flavor still shows the negative account row and folds the
    // net into the grand total.
    let spending = aggregate::category_spending(&expenses, &debts, "Mom", window);
    assert_eq!(spending.categories.len(), 2);
    let account = spending
        .categories
        .iter()
        .find(|c| c.label == "Mom's Account")
        .unwrap();
    assert_eq!(account.total, dec("-50"));
    assert_eq!(spending.grand_total, dec("950"));
}

#[test]
fn breakdown_only_counts_rows_inside_window() {
    let window = mk(2024, 6).window();
    let expenses = [
        expense(1, d(2024, 6, 2), "100", ExpenseCategory::Car),
        expense(2, d(2024, 7, 2), "900", ExpenseCategory::Car),
    ];
    let debts = [
        debt(1, d(2024, 6, 1), "10", DebtDirection::IOwe),
        debt(2, d(2024, 7, 1), "70", DebtDirection::IOwe),
    ];
    let spending = aggregate::category_spending(&expenses, &debts, "Mom", window);
    assert_eq!(spending.grand_total, dec("110"));
}

#[test]
fn observed_months_skip_gasoline_only_months() {
    let salaries = [salary(1, d(2024, 1, 15), "5000", SalarySource::Payslip)];
    let expenses = [
        expense(1, d(2024, 2, 2), "80", ExpenseCategory::Gasoline),
        expense(2, d(2024, 3, 2), "100", ExpenseCategory::Rent),
    ];
    let debts = [debt(1, d(2024, 4, 1), "30", DebtDirection::IOwe)];
    let months = aggregate::observed_months(&salaries, &expenses, &debts);
    assert_eq!(months, vec![mk(2024, 1), mk(2024, 3), mk(2024, 4)]);
}

#[test]
fn monthly_deductions_split_by_category() {
    let expenses = [
        expense(1, d(2024, 3, 15), "500", ExpenseCategory::Taxes),
        expense(2, d(2024, 3, 15), "200", ExpenseCategory::Retirement),
        expense(3, d(2024, 3, 16), "300", ExpenseCategory::Taxes),
        expense(4, d(2024, 4, 15), "450", ExpenseCategory::Benefits),
        expense(5, d(2024, 3, 2), "999", ExpenseCategory::Rent),
    ];
    let breakdown = aggregate::monthly_deductions(&expenses);
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].month, mk(2024, 3));
    assert_eq!(breakdown[0].total, dec("1000"));
    assert_eq!(
        breakdown[0].by_category,
        vec![
            ("Retirement".to_string(), dec("200")),
            ("Taxes".to_string(), dec("800")),
        ]
    );
    assert_eq!(breakdown[1].month, mk(2024, 4));
    assert_eq!(breakdown[1].total, dec("450"));
}

#[test]
fn sort_helpers_are_explicit_and_distinct() {
    let window = mk(2024, 6).window();
    let expenses = [
        expense(1, d(2024, 6, 2), "10", ExpenseCategory::Venmo),
        expense(2, d(2024, 6, 2), "500", ExpenseCategory::Car),
        expense(3, d(2024, 6, 2), "250", ExpenseCategory::Bilt),
    ];
    let mut by_total = aggregate::category_breakdown(&expenses, &[], "Mom", window);
    aggregate::sort_by_total_desc(&mut by_total);
    let totals: Vec<&str> = by_total.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(totals, vec!["Car", "Bilt", "Venmo"]);

    let mut by_label = aggregate::category_breakdown(&expenses, &[], "Mom", window);
    aggregate::sort_by_label(&mut by_label);
    let labels: Vec<&str> = by_label.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["Bilt", "Car", "Venmo"]);
}

#[test]
fn aggregation_is_idempotent() {
    let months = MonthKey::months_of_year(2024);
    let salaries = [salary(1, d(2024, 3, 15), "5000", SalarySource::Payslip)];
    let expenses = [
        expense(1, d(2024, 3, 15), "500", ExpenseCategory::Taxes),
        expense(2, d(2024, 3, 2), "1200", ExpenseCategory::Rent),
    ];
    let debts = [debt(1, d(2024, 3, 1), "100", DebtDirection::IOwe)];

    let first = aggregate::monthly_summary(&salaries, &expenses, &debts, &months);
    let second = aggregate::monthly_summary(&salaries, &expenses, &debts, &months);
    assert_eq!(first, second);

    let window = mk(2024, 3).window();
    let a = aggregate::category_breakdown(&expenses, &debts, "Mom", window);
    let b = aggregate::category_breakdown(&expenses, &debts, "Mom", window);
    assert_eq!(a, b);
}
