//! Client-side column sorting.
//!
//! Sorting is a view concern: it reorders a snapshot of the flattened rows
//! and never mutates the pagination cache, so toggling a column is free of
//! refetches.
use roster_common::Record;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Age,
    Gender,
    Balance,
    Company,
    Phone,
    Email,
    About,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

fn compare(a: &Record, b: &Record, column: SortColumn) -> Ordering {
    let by_text = |a: &str, b: &str| a.to_lowercase().cmp(&b.to_lowercase());
    match column {
        SortColumn::Name => by_text(&a.name, &b.name),
        SortColumn::Age => a.age.cmp(&b.age),
        SortColumn::Gender => by_text(&a.gender, &b.gender),
        SortColumn::Balance => by_text(&a.balance, &b.balance),
        SortColumn::Company => by_text(&a.company, &b.company),
        SortColumn::Phone => by_text(&a.phone, &b.phone),
        SortColumn::Email => by_text(&a.email, &b.email),
        SortColumn::About => by_text(&a.about, &b.about),
    }
}

/// Stable in-place sort: rows comparing equal keep their flattened order.
pub fn sort_rows(rows: &mut [Record], column: SortColumn, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, column);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
