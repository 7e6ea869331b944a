// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Date, Duration, Month, OffsetDateTime};

use stockly_app::{
    DeadStockAlert, InventoryRecord, Item, ItemId, NearExpiryAlert, SalesPoint, Session, UserRole,
};

const DEPARTMENTS: [&str; 8] = [
    "Dairy",
    "Grains",
    "Produce",
    "Bakery",
    "Beverages",
    "Frozen",
    "Snacks",
    "Household",
];

const PRODUCT_KINDS: [&str; 5] = ["Perishable", "Staple", "Frozen", "Canned", "Dry"];

const PRODUCT_ADJECTIVES: [&str; 12] = [
    "Whole", "Organic", "Fresh", "Golden", "Classic", "Premium", "Stone-Ground", "Wild",
    "Smoked", "Sweet", "Crisp", "Roasted",
];

const PRODUCT_NOUNS: [&str; 16] = [
    "Milk",
    "Rice",
    "Apples",
    "Bread",
    "Coffee",
    "Peas",
    "Crackers",
    "Detergent",
    "Yogurt",
    "Oats",
    "Bananas",
    "Bagels",
    "Tea",
    "Spinach",
    "Almonds",
    "Honey",
];

const USERNAMES: [&str; 8] = [
    "avery", "jordan", "taylor", "riley", "morgan", "casey", "quinn", "parker",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic sample-data builder. Same seed, same rows.
#[derive(Debug, Clone)]
pub struct StockFaker {
    rng: DeterministicRng,
    next_item_id: i64,
}

impl StockFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_item_id: 0,
        }
    }

    pub fn item(&mut self) -> Item {
        self.next_item_id += 1;
        let id = self.next_item_id;
        let department = self.pick(&DEPARTMENTS);
        Item {
            item_id: ItemId::new(id),
            item_code: format!("GR-{id:03}"),
            item_name: self.product_name(),
            department: department.to_owned(),
            kind: self.pick(&PRODUCT_KINDS).to_owned(),
            reorder_level: self.int_range_i64(5, 40),
            reorder_quantity: self.int_range_i64(0, 120),
        }
    }

    pub fn inventory_record(&mut self) -> InventoryRecord {
        let item = self.item();
        let expire_date = if self.rng.int_n(4) == 0 {
            None
        } else {
            Some(self.date_within_days(90))
        };
        InventoryRecord {
            item_id: item.item_id,
            item_code: item.item_code,
            product_name: item.item_name,
            department: item.department,
            kind: item.kind,
            stock_quantity: self.int_range_i64(0, 200),
            reorder_level: item.reorder_level,
            expire_date,
        }
    }

    pub fn inventory_snapshot(&mut self, rows: usize) -> Vec<InventoryRecord> {
        (0..rows).map(|_| self.inventory_record()).collect()
    }

    pub fn sales_history(&mut self, year: i32, months: u8) -> Vec<SalesPoint> {
        (1..=months.min(12))
            .map(|month| SalesPoint {
                year,
                month,
                quantity_sold: self.int_range_i64(0, 300),
            })
            .collect()
    }

    pub fn near_expiry_alert(&mut self) -> NearExpiryAlert {
        NearExpiryAlert {
            product_name: self.product_name(),
            stock_quantity: self.int_range_i64(1, 60),
            days_left: self.int_range_i64(1, 30),
            recommended_discount: (self.int_range_i64(5, 50) as f64) / 100.0,
            bundling_suggestion: "bundle with a staple item".to_owned(),
            loyalty_tip: "offer double points this week".to_owned(),
        }
    }

    pub fn dead_stock_alert(&mut self) -> DeadStockAlert {
        self.next_item_id += 1;
        DeadStockAlert {
            item_id: ItemId::new(self.next_item_id),
            item_name: self.product_name(),
            stock_quantity: self.int_range_i64(20, 200),
            recent_sales: self.int_range_i64(0, 3),
            recommendation: "discount and discontinue".to_owned(),
        }
    }

    pub fn session(&mut self, role: UserRole) -> Session {
        let username = self.pick(&USERNAMES);
        Session {
            token: format!("tok-{:08x}", self.rng.next_u64() as u32),
            role,
            username: username.to_owned(),
        }
    }

    pub fn product_name(&mut self) -> String {
        format!(
            "{} {}",
            self.pick(&PRODUCT_ADJECTIVES),
            self.pick(&PRODUCT_NOUNS),
        )
    }

    fn date_within_days(&mut self, days: i64) -> Date {
        let offset = self.int_range_i64(0, days);
        (reference_now() + Duration::days(offset)).date()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

// Fixed reference instant so fixtures are reproducible.
fn reference_now() -> OffsetDateTime {
    Date::from_calendar_date(2026, Month::August, 1)
        .expect("valid reference date")
        .midnight()
        .assume_utc()
}

#[cfg(test)]
mod tests {
    use super::StockFaker;

    #[test]
    fn same_seed_same_rows() {
        let mut a = StockFaker::new(7);
        let mut b = StockFaker::new(7);
        assert_eq!(a.inventory_snapshot(10), b.inventory_snapshot(10));
    }

    #[test]
    fn zero_seed_is_normalized() {
        let mut a = StockFaker::new(0);
        let mut b = StockFaker::new(1);
        assert_eq!(a.inventory_record(), b.inventory_record());
    }

    #[test]
    fn item_ids_are_sequential() {
        let mut faker = StockFaker::new(3);
        let first = faker.item();
        let second = faker.item();
        assert_eq!(first.item_id.get() + 1, second.item_id.get());
    }
}
