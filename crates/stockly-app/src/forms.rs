// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::Date;

use crate::{ItemId, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Intake,
    NewItem,
    Sale,
    Register,
}

/// Stock intake: restock an existing catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeFormInput {
    pub item_id: ItemId,
    pub stock_quantity: i64,
    pub expire_date: Option<Date>,
}

/// New catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemFormInput {
    pub item_code: String,
    pub item_name: String,
    pub department: String,
    pub kind: String,
    pub reorder_level: i64,
    pub reorder_quantity: i64,
}

/// Single recorded sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleFormInput {
    pub item_id: ItemId,
    pub quantity_sold: i64,
    pub sale_date: Date,
}

/// Login screen input, also the base of the register form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CredentialsInput {
    pub username: String,
    pub password: String,
}

/// New backend account, manager-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFormInput {
    pub credentials: CredentialsInput,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Intake(IntakeFormInput),
    NewItem(NewItemFormInput),
    Sale(SaleFormInput),
    Register(RegisterFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Intake(_) => FormKind::Intake,
            Self::NewItem(_) => FormKind::NewItem,
            Self::Sale(_) => FormKind::Sale,
            Self::Register(_) => FormKind::Register,
        }
    }

    pub fn blank_for(kind: FormKind) -> Self {
        match kind {
            FormKind::Intake => Self::Intake(IntakeFormInput {
                item_id: ItemId::new(0),
                stock_quantity: 0,
                expire_date: None,
            }),
            FormKind::NewItem => Self::NewItem(NewItemFormInput {
                item_code: String::new(),
                item_name: String::new(),
                department: String::new(),
                kind: String::new(),
                reorder_level: 0,
                reorder_quantity: 0,
            }),
            FormKind::Sale => Self::Sale(SaleFormInput {
                item_id: ItemId::new(0),
                quantity_sold: 0,
                sale_date: Date::from_calendar_date(1970, time::Month::January, 1)
                    .expect("valid baseline date"),
            }),
            FormKind::Register => Self::Register(RegisterFormInput {
                credentials: CredentialsInput::default(),
                role: UserRole::Employee,
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Intake(intake) => intake.validate(),
            Self::NewItem(item) => item.validate(),
            Self::Sale(sale) => sale.validate(),
            Self::Register(register) => register.validate(),
        }
    }
}

impl IntakeFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.item_id.get() <= 0 {
            bail!("intake item is required -- choose a catalog item and retry");
        }
        if self.stock_quantity <= 0 {
            bail!("intake quantity must be positive");
        }
        Ok(())
    }
}

impl NewItemFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.item_code.trim().is_empty() {
            bail!("item code is required -- enter a code and retry");
        }
        if self.item_name.trim().is_empty() {
            bail!("item name is required -- enter a name and retry");
        }
        if self.department.trim().is_empty() {
            bail!("item department is required -- enter a department and retry");
        }
        if self.kind.trim().is_empty() {
            bail!("item type is required -- enter a type and retry");
        }
        if self.reorder_level < 0 {
            bail!("reorder level cannot be negative");
        }
        if self.reorder_quantity < 0 {
            bail!("reorder quantity cannot be negative");
        }
        Ok(())
    }
}

impl SaleFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.item_id.get() <= 0 {
            bail!("sale item is required -- choose a catalog item and retry");
        }
        if self.quantity_sold <= 0 {
            bail!("sale quantity must be positive");
        }
        Ok(())
    }
}

impl CredentialsInput {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            bail!("username is required -- enter a username and retry");
        }
        if self.password.is_empty() {
            bail!("password is required -- enter a password and retry");
        }
        Ok(())
    }
}

impl RegisterFormInput {
    pub fn validate(&self) -> Result<()> {
        self.credentials.validate()
    }
}
