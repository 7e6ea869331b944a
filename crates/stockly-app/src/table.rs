// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{InventoryRecord, SortDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    ItemCode,
    ProductName,
    Department,
    Kind,
    StockQuantity,
    ReorderLevel,
    ExpireDate,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::ItemCode,
        SortKey::ProductName,
        SortKey::Department,
        SortKey::Kind,
        SortKey::StockQuantity,
        SortKey::ReorderLevel,
        SortKey::ExpireDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::ItemCode => "code",
            SortKey::ProductName => "product",
            SortKey::Department => "department",
            SortKey::Kind => "type",
            SortKey::StockQuantity => "stock",
            SortKey::ReorderLevel => "reorder level",
            SortKey::ExpireDate => "expiry",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::ItemCode,
            direction: SortDirection::Asc,
        }
    }
}

/// Client-side projection over the most recent inventory snapshot.
///
/// The snapshot is replaced wholesale on refresh; search and sort are
/// applied on every read so the source rows stay untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventoryTable {
    snapshot: Vec<InventoryRecord>,
    search: String,
    sort: SortSpec,
}

impl InventoryTable {
    pub fn replace_snapshot(&mut self, rows: Vec<InventoryRecord>) {
        self.snapshot = rows;
    }

    pub fn snapshot(&self) -> &[InventoryRecord] {
        &self.snapshot
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, needle: impl Into<String>) {
        self.search = needle.into();
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Flips direction when `key` is already active, otherwise switches to
    /// `key` ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort.key == key {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort = SortSpec {
                key,
                direction: SortDirection::Asc,
            };
        }
    }

    /// Rows matching the current search, ordered by the current sort.
    pub fn visible_rows(&self) -> Vec<&InventoryRecord> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&InventoryRecord> = self
            .snapshot
            .iter()
            .filter(|row| needle.is_empty() || row_matches(row, &needle))
            .collect();
        rows.sort_by(|a, b| compare_rows(a, b, self.sort));
        rows
    }

    /// Rows at or below their reorder level, unaffected by search or sort.
    pub fn restock_rows(&self) -> Vec<&InventoryRecord> {
        self.snapshot
            .iter()
            .filter(|row| row.stock_quantity <= row.reorder_level)
            .collect()
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn row_matches(row: &InventoryRecord, needle: &str) -> bool {
    row.product_name.to_lowercase().contains(needle)
        || row.item_code.to_lowercase().contains(needle)
        || row.department.to_lowercase().contains(needle)
        || row.kind.to_lowercase().contains(needle)
}

fn compare_rows(a: &InventoryRecord, b: &InventoryRecord, sort: SortSpec) -> Ordering {
    let ordering = match sort.key {
        SortKey::ItemCode => cmp_text(&a.item_code, &b.item_code),
        SortKey::ProductName => cmp_text(&a.product_name, &b.product_name),
        SortKey::Department => cmp_text(&a.department, &b.department),
        SortKey::Kind => cmp_text(&a.kind, &b.kind),
        SortKey::StockQuantity => a.stock_quantity.cmp(&b.stock_quantity),
        SortKey::ReorderLevel => a.reorder_level.cmp(&b.reorder_level),
        SortKey::ExpireDate => {
            // Missing dates sink to the bottom in both directions, so the
            // null check happens before the direction flip.
            return match (a.expire_date, b.expire_date) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(left), Some(right)) => match sort.direction {
                    SortDirection::Asc => left.cmp(&right),
                    SortDirection::Desc => right.cmp(&left),
                },
            };
        }
    };
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
