use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Amount, compute_base_cost, compute_selling_price, compute_unit_profit};

pub type ItemId = Uuid;

/// The pricing fields of an item: what a unit cost in the source currency,
/// how to convert it, and the markup applied on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub buying_price: Amount,
    pub shipping_price: Amount,
    /// Multiplier from source currency to target currency
    pub conversion_rate: f64,
    /// Markup percentage on the converted cost (20.0 means 20%)
    pub profit_margin: f64,
}

impl Pricing {
    /// Validate and build a pricing record. Prices and margin must be finite and
    /// non-negative; the conversion rate must be finite and strictly positive.
    /// The derived cost, price and profit must also be finite.
    pub fn new(
        buying_price: Amount,
        shipping_price: Amount,
        conversion_rate: f64,
        profit_margin: f64,
    ) -> Result<Self, PricingError> {
        check_non_negative("buying_price", buying_price)?;
        check_non_negative("shipping_price", shipping_price)?;
        check_non_negative("profit_margin", profit_margin)?;
        if !conversion_rate.is_finite() || conversion_rate <= 0.0 {
            return Err(PricingError::NonPositiveRate(conversion_rate));
        }

        let pricing = Self {
            buying_price,
            shipping_price,
            conversion_rate,
            profit_margin,
        };
        let derived = [
            pricing.base_cost(),
            pricing.selling_price(),
            pricing.unit_profit(),
        ];
        if derived.iter().any(|value| !value.is_finite()) {
            return Err(PricingError::Overflow);
        }
        Ok(pricing)
    }

    pub fn base_cost(&self) -> Amount {
        compute_base_cost(self.buying_price, self.shipping_price, self.conversion_rate)
    }

    pub fn selling_price(&self) -> Amount {
        compute_selling_price(
            self.buying_price,
            self.shipping_price,
            self.conversion_rate,
            self.profit_margin,
        )
    }

    pub fn unit_profit(&self) -> Amount {
        compute_unit_profit(
            self.buying_price,
            self.shipping_price,
            self.conversion_rate,
            self.profit_margin,
        )
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(PricingError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(PricingError::Negative { field, value });
    }
    Ok(())
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("conversion_rate must be positive (got {0})")]
    NonPositiveRate(f64),

    #[error("pricing is too large: cost, selling price or profit overflows")]
    Overflow,
}

/// Where an item sits in its lifecycle. Deleted items are simply absent
/// from the inventory, so they have no state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    /// At least one unit in stock
    Active,
    /// Sold out; stays listed until deleted
    Depleted,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Active => "active",
            ItemState::Depleted => "depleted",
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to add an item; id and sale totals are assigned by the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub pricing: Pricing,
    pub quantity: u32,
}

impl NewItem {
    pub fn new(name: impl Into<String>, pricing: Pricing, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            pricing,
            quantity,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One row of the inventory table. Field order matches the persisted column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub buying_price: Amount,
    pub shipping_price: Amount,
    pub conversion_rate: f64,
    pub profit_margin: f64,
    /// Units currently in stock
    pub quantity: u32,
    /// Units sold over the item's lifetime
    pub sold: u32,
    /// Accumulated profit in the target currency
    pub total_profit: Amount,
}

impl InventoryItem {
    pub(crate) fn from_new(id: ItemId, new_item: NewItem) -> Self {
        let NewItem {
            name,
            description,
            pricing,
            quantity,
        } = new_item;

        Self {
            id,
            name,
            description,
            buying_price: pricing.buying_price,
            shipping_price: pricing.shipping_price,
            conversion_rate: pricing.conversion_rate,
            profit_margin: pricing.profit_margin,
            quantity,
            sold: 0,
            total_profit: 0.0,
        }
    }

    /// Current pricing fields. Sales always use these, so editing a price only
    /// affects units sold afterwards.
    pub fn pricing(&self) -> Pricing {
        Pricing {
            buying_price: self.buying_price,
            shipping_price: self.shipping_price,
            conversion_rate: self.conversion_rate,
            profit_margin: self.profit_margin,
        }
    }

    pub fn unit_profit(&self) -> Amount {
        self.pricing().unit_profit()
    }

    pub fn selling_price(&self) -> Amount {
        self.pricing().selling_price()
    }

    pub fn state(&self) -> ItemState {
        if self.quantity > 0 {
            ItemState::Active
        } else {
            ItemState::Depleted
        }
    }

    /// Check that a row read back from storage still satisfies the numeric invariants.
    pub fn validate(&self) -> Result<(), PricingError> {
        Pricing::new(
            self.buying_price,
            self.shipping_price,
            self.conversion_rate,
            self.profit_margin,
        )?;
        check_non_negative("total_profit", self.total_profit)
    }
}
