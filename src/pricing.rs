//! Authoritative cart totals.
//!
//! The storefront keeps its cart in local storage and posts derived
//! totals at checkout; the backend recomputes them and rejects a
//! payload that disagrees.

use crate::errors::{AppError, AppResult};
use crate::models::{OrderItem, OrderPricing};

/// Orders at or above this subtotal ship free (rupees).
pub const FREE_DELIVERY_THRESHOLD: i64 = 4000;

/// Flat delivery charge below the threshold (rupees).
pub const DELIVERY_CHARGE: i64 = 200;

pub fn delivery_charge(subtotal: i64) -> i64 {
    if subtotal >= FREE_DELIVERY_THRESHOLD {
        0
    } else {
        DELIVERY_CHARGE
    }
}

/// Computes totals for a set of order items.
///
/// Rejects negative line prices and totals that overflow `i64`; the
/// items come straight from the checkout payload, not from the
/// catalog.
pub fn compute(items: &[OrderItem]) -> AppResult<OrderPricing> {
    let mut subtotal: i64 = 0;
    for item in items {
        if item.price < 0 {
            return Err(AppError::Validation(format!(
                "Invalid price for {}",
                item.name
            )));
        }
        let line = item
            .price
            .checked_mul(i64::from(item.quantity))
            .ok_or_else(out_of_range)?;
        subtotal = subtotal.checked_add(line).ok_or_else(out_of_range)?;
    }

    let delivery_charge = delivery_charge(subtotal);
    let total = subtotal.checked_add(delivery_charge).ok_or_else(out_of_range)?;
    Ok(OrderPricing {
        subtotal,
        delivery_charge,
        total,
    })
}

fn out_of_range() -> AppError {
    AppError::Validation("Order total is out of range".into())
}

/// Recomputes totals from `items` and checks the client's copy.
pub fn verify(items: &[OrderItem], claimed: &OrderPricing) -> AppResult<OrderPricing> {
    let actual = compute(items)?;
    if actual != *claimed {
        return Err(AppError::Validation(format!(
            "Order totals mismatch: expected subtotal {} delivery {} total {}",
            actual.subtotal, actual.delivery_charge, actual.total
        )));
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, quantity: i32) -> OrderItem {
        OrderItem {
            product_id: "cap-001".into(),
            name: "Summer Cap".into(),
            price,
            quantity,
            image: String::new(),
        }
    }

    #[test]
    fn charges_delivery_below_threshold() {
        let p = compute(&[item(1500, 2)]).unwrap();
        assert_eq!(p.subtotal, 3000);
        assert_eq!(p.delivery_charge, DELIVERY_CHARGE);
        assert_eq!(p.total, 3200);
    }

    #[test]
    fn free_delivery_at_threshold() {
        let p = compute(&[item(2000, 2)]).unwrap();
        assert_eq!(p.subtotal, 4000);
        assert_eq!(p.delivery_charge, 0);
        assert_eq!(p.total, 4000);
    }

    #[test]
    fn verify_rejects_tampered_total() {
        let items = [item(1500, 1)];
        let mut claimed = compute(&items).unwrap();
        claimed.total -= 100;
        assert!(verify(&items, &claimed).is_err());
    }

    #[test]
    fn verify_accepts_honest_totals() {
        let items = [item(2500, 2), item(900, 1)];
        let claimed = compute(&items).unwrap();
        let verified = verify(&items, &claimed).unwrap();
        assert_eq!(verified.subtotal, 5900);
        assert_eq!(verified.delivery_charge, 0);
    }

    #[test]
    fn negative_price_is_rejected_even_with_matching_totals() {
        let items = [item(-5000, 1)];
        let claimed = OrderPricing {
            subtotal: -5000,
            delivery_charge: DELIVERY_CHARGE,
            total: -4800,
        };
        assert!(compute(&items).is_err());
        assert!(verify(&items, &claimed).is_err());
    }

    #[test]
    fn overflowing_totals_are_rejected_not_panicked() {
        assert!(compute(&[item(i64::MAX, 2)]).is_err());
        assert!(compute(&[item(i64::MAX, 1), item(i64::MAX, 1)]).is_err());
    }
}
