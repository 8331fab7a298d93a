//! HTML templates for transactional mail.
//!
//! Plain string formatting; the copy mirrors what the storefront has
//! always sent.

use crate::models::Order;

pub fn customer_order_confirmation_subject(order: &Order) -> String {
    format!("Order Confirmation - {} | Classic Carry", order.order_number)
}

pub fn owner_order_notification_subject(order: &Order) -> String {
    format!("New Order Received - {}", order.order_number)
}

/// Confirmation mail sent to the customer after checkout.
pub fn customer_order_confirmation(order: &Order) -> String {
    let delivery = if order.pricing.delivery_charge == 0 {
        "FREE".to_string()
    } else {
        format!("Rs {}", order.pricing.delivery_charge)
    };

    format!(
        r#"<html><body style="font-family:Arial,sans-serif;color:#333">
<h2>Thank you for your order, {name}!</h2>
<p>Your order <strong>{number}</strong> has been received and is being processed.</p>
<table width="100%" cellpadding="8" style="border-collapse:collapse">
<tr style="background:#f5f5f5"><th align="left">Item</th><th align="right">Qty</th><th align="right">Price</th></tr>
{rows}
</table>
<p>Subtotal: Rs {subtotal}<br>
Delivery: {delivery}<br>
<strong>Total: Rs {total}</strong></p>
<h3>Delivery Address</h3>
<p>{address}, {city}</p>
<p>We will contact you at {phone} before dispatch.</p>
<p>Classic Carry</p>
</body></html>"#,
        name = order.customer.name,
        number = order.order_number,
        rows = item_rows(order),
        subtotal = order.pricing.subtotal,
        delivery = delivery,
        total = order.pricing.total,
        address = order.customer.address,
        city = order.customer.city,
        phone = order.customer.phone,
    )
}

/// Notification mail sent to the shop owner for every new order.
pub fn owner_order_notification(order: &Order) -> String {
    format!(
        r#"<html><body style="font-family:Arial,sans-serif;color:#333">
<h2>New order {number}</h2>
<p><strong>{name}</strong> &lt;{email}&gt;, {phone}</p>
<p>{address}, {city}</p>
<table width="100%" cellpadding="8" style="border-collapse:collapse">
<tr style="background:#f5f5f5"><th align="left">Item</th><th align="right">Qty</th><th align="right">Price</th></tr>
{rows}
</table>
<p><strong>Total: Rs {total}</strong> (delivery Rs {delivery})</p>
</body></html>"#,
        number = order.order_number,
        name = order.customer.name,
        email = order.customer.email,
        phone = order.customer.phone,
        address = order.customer.address,
        city = order.customer.city,
        rows = item_rows(order),
        total = order.pricing.total,
        delivery = order.pricing.delivery_charge,
    )
}

/// Password-reset mail carrying the raw token.
pub fn password_reset(name: &str, token: &str) -> String {
    format!(
        r#"<html><body style="font-family:Arial,sans-serif;color:#333">
<h2>Password reset</h2>
<p>Hi {name},</p>
<p>A password reset was requested for your Classic Carry account.
Use the token below within one hour; if you did not request this,
ignore this email.</p>
<p style="font-size:18px"><strong>{token}</strong></p>
</body></html>"#,
    )
}

fn item_rows(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|i| {
            format!(
                "<tr><td>{}</td><td align=\"right\">{}</td><td align=\"right\">Rs {}</td></tr>",
                i.name, i.quantity, i.price
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderCustomer, OrderItem, OrderPricing, OrderStatus, PaymentStatus};

    fn sample_order() -> Order {
        Order {
            order_number: "CC-20260829-A1B2C3".into(),
            customer: OrderCustomer {
                name: "Ali".into(),
                email: "ali@example.com".into(),
                phone: "0300-1234567".into(),
                address: "12 Mall Road".into(),
                city: "Lahore".into(),
                postal_code: "54000".into(),
                notes: String::new(),
            },
            items: vec![OrderItem {
                product_id: "cap-001".into(),
                name: "Summer Cap".into(),
                price: 1500,
                quantity: 2,
                image: String::new(),
            }],
            pricing: OrderPricing {
                subtotal: 3000,
                delivery_charge: 200,
                total: 3200,
            },
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn confirmation_names_order_and_items() {
        let order = sample_order();
        let html = customer_order_confirmation(&order);
        assert!(html.contains("CC-20260829-A1B2C3"));
        assert!(html.contains("Summer Cap"));
        assert!(html.contains("Rs 200"));
        assert!(html.contains("Total: Rs 3200"));
    }

    #[test]
    fn free_delivery_is_spelled_out() {
        let mut order = sample_order();
        order.pricing = OrderPricing {
            subtotal: 4500,
            delivery_charge: 0,
            total: 4500,
        };
        assert!(customer_order_confirmation(&order).contains("FREE"));
    }

    #[test]
    fn owner_notification_carries_contact() {
        let html = owner_order_notification(&sample_order());
        assert!(html.contains("ali@example.com"));
        assert!(html.contains("0300-1234567"));
        assert!(html.is_ascii());
    }

    #[test]
    fn reset_mail_contains_token() {
        assert!(password_reset("Ali", "tok-123").contains("tok-123"));
    }
}
