// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use homeledger::models::MonthKey;
use homeledger::utils::{paginate, parse_month, parse_positive_decimal, parse_year};

#[test]
fn paginate_slices_fixed_size_pages() {
    let items: Vec<i32> = (1..=12).collect();
    let (page, total) = paginate(&items, 1, 5);
    assert_eq!(page, &[1, 2, 3, 4, 5]);
    assert_eq!(total, 3);

    let (page, _) = paginate(&items, 3, 5);
    assert_eq!(page, &[11, 12]);

    let (page, total) = paginate(&items, 4, 5);
    assert!(page.is_empty());
    assert_eq!(total, 3);

    let empty: Vec<i32> = Vec::new();
    let (page, total) = paginate(&empty, 1, 5);
    assert!(page.is_empty());
    assert_eq!(total, 0);
}

#[test]
fn parse_month_accepts_yyyy_mm_only() {
    assert_eq!(parse_month("2024-03").unwrap(), MonthKey::new(2024, 3).unwrap());
    assert!(parse_month("2024-13").is_err());
    assert!(parse_month("March 2024").is_err());
}

#[test]
fn parse_positive_decimal_rejects_zero_and_negative() {
    assert_eq!(parse_positive_decimal("12.34").unwrap().to_string(), "12.34");
    assert!(parse_positive_decimal("0").is_err());
    assert!(parse_positive_decimal("-5").is_err());
    assert!(parse_positive_decimal("abc").is_err());
}

#[test]
fn parse_year_bounds_the_range() {
    assert_eq!(parse_year("2024").unwrap(), 2024);
    assert!(parse_year("0").is_err());
    assert!(parse_year("999999").is_err());
    assert!(parse_year("twenty").is_err());
}
