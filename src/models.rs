// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Default debt-ledger counterparty.
pub const DEFAULT_PERSON: &str = "Mom";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalarySource {
    Payslip,
    Bonus,
}

impl SalarySource {
    pub fn as_str(self) -> &'static str {
        match self {
            SalarySource::Payslip => "Payslip",
            SalarySource::Bonus => "Bonus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Payslip" => Some(SalarySource::Payslip),
            "Bonus" => Some(SalarySource::Bonus),
            _ => None,
        }
    }
}

impl fmt::Display for SalarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed category set. Taxes/Benefits/Retirement/Other are payslip
/// deductions; Gasoline is kept out of every general-expense aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Rent,
    #[serde(rename = "Capital One")]
    CapitalOne,
    Bilt,
    Discover,
    Gasoline,
    Venmo,
    Car,
    Taxes,
    Benefits,
    Retirement,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 11] = [
        ExpenseCategory::Rent,
        ExpenseCategory::CapitalOne,
        ExpenseCategory::Bilt,
        ExpenseCategory::Discover,
        ExpenseCategory::Gasoline,
        ExpenseCategory::Venmo,
        ExpenseCategory::Car,
        ExpenseCategory::Taxes,
        ExpenseCategory::Benefits,
        ExpenseCategory::Retirement,
        ExpenseCategory::Other,
    ];

    pub const DEDUCTIONS: [ExpenseCategory; 4] = [
        ExpenseCategory::Taxes,
        ExpenseCategory::Benefits,
        ExpenseCategory::Retirement,
        ExpenseCategory::Other,
    ];

    pub const NAMES: [&'static str; 11] = [
        "Rent",
        "Capital One",
        "Bilt",
        "Discover",
        "Gasoline",
        "Venmo",
        "Car",
        "Taxes",
        "Benefits",
        "Retirement",
        "Other",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::CapitalOne => "Capital One",
            ExpenseCategory::Bilt => "Bilt",
            ExpenseCategory::Discover => "Discover",
            ExpenseCategory::Gasoline => "Gasoline",
            ExpenseCategory::Venmo => "Venmo",
            ExpenseCategory::Car => "Car",
            ExpenseCategory::Taxes => "Taxes",
            ExpenseCategory::Benefits => "Benefits",
            ExpenseCategory::Retirement => "Retirement",
            ExpenseCategory::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn is_deduction(self) -> bool {
        Self::DEDUCTIONS.contains(&self)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtDirection {
    #[serde(rename = "iOwe")]
    IOwe,
    #[serde(rename = "theyOwe")]
    TheyOwe,
}

impl DebtDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            DebtDirection::IOwe => "iOwe",
            DebtDirection::TheyOwe => "theyOwe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "iOwe" => Some(DebtDirection::IOwe),
            "theyOwe" => Some(DebtDirection::TheyOwe),
            _ => None,
        }
    }
}

impl fmt::Display for DebtDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub source: SalarySource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub person: String,
    #[serde(rename = "type")]
    pub direction: DebtDirection,
    pub description: String,
}

/// Year + month pair used to bucket rows for monthly aggregation.
/// Construction is validated, so `first_day` cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| MonthKey { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated month key")
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Half-open day window covering exactly this month.
    pub fn window(self) -> DateWindow {
        DateWindow {
            start: self.first_day(),
            end: self.next().first_day(),
        }
    }

    pub fn months_of_year(year: i32) -> Vec<MonthKey> {
        (1..=12).filter_map(|month| MonthKey::new(year, month)).collect()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Half-open `[start, end)` date range at day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(DateWindow {
            start: MonthKey::new(year, 1)?.first_day(),
            end: MonthKey::new(year + 1, 1)?.first_day(),
        })
    }
}
