//! Basket domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use copperpot_core::{BasketItemId, Price, ProductId, UserId};

/// One basket row: a product held by a user, with a quantity.
///
/// There is at most one row per `(product, owner)` pair; adding the same
/// product again increments `amount` instead of creating a second row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BasketItem {
    /// Unique basket item ID.
    pub id: BasketItemId,
    /// The product in the basket.
    pub product_id: ProductId,
    /// The user who owns this basket row.
    pub owner_id: UserId,
    /// Quantity, at least 1.
    pub amount: i32,
    /// When the row was first created.
    pub created_at: DateTime<Utc>,
}

/// A basket item joined with its product row for display.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BasketLine {
    pub id: BasketItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Price,
    pub amount: i32,
}

impl BasketLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        Price::new(self.unit_price.amount() * Decimal::from(self.amount))
    }
}

/// Sum of line totals for a basket.
#[must_use]
pub fn subtotal(lines: &[BasketLine]) -> Price {
    Price::new(lines.iter().map(|line| line.line_total().amount()).sum())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, price: &str, amount: i32) -> BasketLine {
        BasketLine {
            id: BasketItemId::new(id),
            product_id: ProductId::new(id),
            product_name: format!("product-{id}"),
            unit_price: Price::parse(price).unwrap(),
            amount,
        }
    }

    #[test]
    fn line_total_multiplies_price_by_amount() {
        assert_eq!(line(1, "2.50", 3).line_total().to_string(), "$7.50");
        assert_eq!(line(2, "10", 1).line_total().to_string(), "$10.00");
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let lines = vec![line(1, "2.50", 2), line(2, "4.99", 1)];
        assert_eq!(subtotal(&lines).to_string(), "$9.99");
    }

    #[test]
    fn subtotal_of_empty_basket_is_zero() {
        assert_eq!(subtotal(&[]), Price::ZERO);
    }
}
