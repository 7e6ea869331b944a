// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

time::serde::format_description!(backend_date, Date, "[year]-[month]-[day]");

/// Suggested reorder amount when the catalog entry does not carry one.
pub const DEFAULT_REORDER_QUANTITY: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Manager,
    Employee,
}

impl UserRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manager" => Some(Self::Manager),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

/// Authenticated backend session. Injected into the components that need it
/// rather than looked up ambiently; the CLI owns its load/save lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: UserRole,
    pub username: String,
}

impl Session {
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Inventory,
    Items,
    Sales,
    Expiry,
    DeadStock,
    Restock,
    Intake,
    NewItem,
}

impl TabKind {
    pub const ALL: [Self; 8] = [
        Self::Inventory,
        Self::Items,
        Self::Sales,
        Self::Expiry,
        Self::DeadStock,
        Self::Restock,
        Self::Intake,
        Self::NewItem,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Items => "items",
            Self::Sales => "sales",
            Self::Expiry => "expiry",
            Self::DeadStock => "dead stock",
            Self::Restock => "restock",
            Self::Intake => "intake",
            Self::NewItem => "new item",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// One inventory row as served by `GET /inventory`. Snapshots are replaced
/// wholesale on refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub item_id: ItemId,
    pub item_code: String,
    pub product_name: String,
    pub department: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub stock_quantity: i64,
    pub reorder_level: i64,
    #[serde(with = "backend_date::option")]
    pub expire_date: Option<Date>,
}

/// Catalog row from `GET /items`, used by the form dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub item_code: String,
    pub item_name: String,
    pub department: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub reorder_level: i64,
    pub reorder_quantity: i64,
}

impl Item {
    pub fn reorder_quantity_or_default(&self) -> i64 {
        if self.reorder_quantity > 0 {
            self.reorder_quantity
        } else {
            DEFAULT_REORDER_QUANTITY
        }
    }
}

/// Monthly sales figure for one item, from `GET /inventory_sales/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub year: i32,
    pub month: u8,
    pub quantity_sold: i64,
}

/// One forecast point from `GET /predict_sales/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesForecast {
    pub month: u8,
    pub predicted_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearExpiryAlert {
    pub product_name: String,
    pub stock_quantity: i64,
    pub days_left: i64,
    pub recommended_discount: f64,
    #[serde(default)]
    pub bundling_suggestion: String,
    #[serde(default)]
    pub loyalty_tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadStockAlert {
    pub item_id: ItemId,
    pub item_name: String,
    pub stock_quantity: i64,
    pub recent_sales: i64,
    #[serde(default)]
    pub recommendation: String,
}

#[cfg(test)]
mod tests {
    use super::{InventoryRecord, Item, UserRole};
    use time::{Date, Month};

    #[test]
    fn role_parse_and_as_str_round_trip() {
        for role in [UserRole::Manager, UserRole::Employee] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("owner"), None);
    }

    #[test]
    fn inventory_record_decodes_backend_shape() {
        let raw = r#"{
            "item_id": 3,
            "item_code": "A1",
            "product_name": "Glue Stick",
            "department": "Stationery",
            "type": "Adhesive",
            "stock_quantity": 12,
            "reorder_level": 5,
            "expire_date": "2025-01-01"
        }"#;
        let record: InventoryRecord = serde_json::from_str(raw).expect("decode inventory row");
        assert_eq!(record.item_code, "A1");
        assert_eq!(record.kind, "Adhesive");
        assert_eq!(
            record.expire_date,
            Some(Date::from_calendar_date(2025, Month::January, 1).expect("valid date")),
        );
    }

    #[test]
    fn inventory_record_accepts_null_expiry() {
        let raw = r#"{
            "item_id": 4,
            "item_code": "B2",
            "product_name": "Pencil HB",
            "department": "Stationery",
            "type": "Writing",
            "stock_quantity": 0,
            "reorder_level": 10,
            "expire_date": null
        }"#;
        let record: InventoryRecord = serde_json::from_str(raw).expect("decode inventory row");
        assert_eq!(record.expire_date, None);
    }

    #[test]
    fn reorder_quantity_falls_back_to_default() {
        let item = Item {
            item_id: crate::ItemId::new(1),
            item_code: "A1".to_owned(),
            item_name: "Glue Stick".to_owned(),
            department: "Stationery".to_owned(),
            kind: "Adhesive".to_owned(),
            reorder_level: 5,
            reorder_quantity: 0,
        };
        assert_eq!(item.reorder_quantity_or_default(), 50);
    }
}
