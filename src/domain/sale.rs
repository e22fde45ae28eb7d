use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    BankSlip,
    Pix,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CreditCard,
        PaymentMethod::BankSlip,
        PaymentMethod::Pix,
    ];

    /// Stable code used on the wire and in the `sales.payment_method` column.
    pub fn code(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::BankSlip => "BANK_SLIP",
            PaymentMethod::Pix => "PIX",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::BankSlip => "Bank slip",
            PaymentMethod::Pix => "PIX",
        }
    }

    fn valid_codes() -> String {
        Self::ALL
            .iter()
            .map(|m| m.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or_else(|| {
                DomainError::InvalidArgument(format!(
                    "Invalid payment method: {}. Valid values: {}",
                    s,
                    Self::valid_codes()
                ))
            })
    }
}

// ── Totals ───────────────────────────────────────────────────────────────────

/// Anything priced per unit and sold in some quantity.
pub trait SaleLine {
    fn unit_price(&self) -> &BigDecimal;
    fn quantity(&self) -> i32;
}

/// Σ(unit_price × quantity) over every line.
pub fn subtotal<L: SaleLine>(lines: &[L]) -> BigDecimal {
    lines.iter().fold(BigDecimal::zero(), |acc, line| {
        acc + line.unit_price() * BigDecimal::from(line.quantity())
    })
}

/// `max(0, subtotal - discount)`; a missing discount counts as zero.
pub fn total_value<L: SaleLine>(lines: &[L], discount: Option<&BigDecimal>) -> BigDecimal {
    let subtotal = subtotal(lines);
    let total = match discount {
        Some(discount) => subtotal - discount,
        None => subtotal,
    };
    if total < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        total
    }
}

// ── Inputs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SaleItemInput {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl SaleLine for SaleItemInput {
    fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

/// Unvalidated create/update request as it arrives from the HTTP layer.
#[derive(Debug, Clone)]
pub struct SaleInput {
    pub customer_id: i64,
    pub employee_id: i64,
    pub sale_date: DateTime<Utc>,
    pub discount: Option<BigDecimal>,
    pub payment_method: Option<String>,
    pub items: Vec<SaleItemInput>,
}

/// A sale that passed every validation rule and is ready to be written.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer_id: i64,
    pub employee_id: i64,
    pub sale_date: DateTime<Utc>,
    pub discount: Option<BigDecimal>,
    pub payment_method: PaymentMethod,
    pub items: Vec<SaleItemInput>,
}

#[derive(Debug, Clone, Copy)]
pub struct SalePolicy {
    pub require_items: bool,
}

impl Default for SalePolicy {
    fn default() -> Self {
        Self {
            require_items: true,
        }
    }
}

// ── Views ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SaleItemView {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl SaleLine for SaleItemView {
    fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleView {
    pub id: i64,
    pub customer_id: i64,
    pub employee_id: i64,
    pub sale_date: DateTime<Utc>,
    pub discount: Option<BigDecimal>,
    pub payment_method: PaymentMethod,
    pub items: Vec<SaleItemView>,
}

impl SaleView {
    /// Always derived from the persisted items; never read from storage.
    pub fn total_value(&self) -> BigDecimal {
        total_value(&self.items, self.discount.as_ref())
    }
}
