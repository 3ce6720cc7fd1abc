use std::fmt;

use super::api::{CheckoutItem, CheckoutRequest, SensorStatus};

/// A priced line in the current sale.
///
/// `line_total` is fixed when the line is created; later price changes on
/// the backend do not touch lines already in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub name: String,
    pub weight: f64,
    pub unit_price: f64,
    pub quantity: u32,
    pub line_total: f64,
}

impl CartLine {
    pub fn new(name: impl Into<String>, weight: f64, unit_price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            unit_price,
            quantity,
            line_total: weight * unit_price * f64::from(quantity),
        }
    }
}

/// Why a reading can't become a cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRejection {
    Unstable,
    NoWeight,
    NoProduct,
}

impl fmt::Display for AddRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstable => write!(f, "Unstable Weight"),
            Self::NoWeight => write!(f, "Nothing on the scale"),
            Self::NoProduct => write!(f, "No product detected"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.line_total).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Append a line for the current scale reading.
    ///
    /// The cart is left untouched when the reading is unstable, the weight is
    /// not positive, or no product label is known.
    pub fn add_reading(
        &mut self,
        status: &SensorStatus,
        label: Option<&str>,
        quantity: u32,
    ) -> Result<&CartLine, AddRejection> {
        if !status.is_stable {
            return Err(AddRejection::Unstable);
        }
        if status.weight <= 0.0 {
            return Err(AddRejection::NoWeight);
        }
        let name = label.filter(|l| !l.is_empty()).ok_or(AddRejection::NoProduct)?;

        let price = status.price_of(name);
        self.lines
            .push(CartLine::new(name, status.weight, price, quantity.max(1)));
        Ok(&self.lines[self.lines.len() - 1])
    }

    pub fn to_checkout_request(&self, cashier: &str) -> CheckoutRequest {
        CheckoutRequest {
            items: self
                .lines
                .iter()
                .map(|l| CheckoutItem {
                    name: l.name.clone(),
                    weight: l.weight,
                    price: l.unit_price,
                    qty: l.quantity,
                    total: l.line_total,
                })
                .collect(),
            total: self.total(),
            cashier: cashier.to_string(),
        }
    }
}
