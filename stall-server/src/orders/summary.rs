//! Derived order fields

use shared::models::{OrderItemInput, OrderStatus, PaymentMethod};

/// `"Sate x2, Es Teh x1 (less sugar)"`, items in submission order
pub fn items_summary(items: &[OrderItemInput]) -> String {
    items
        .iter()
        .map(|item| {
            let name = item.name.trim();
            match item.trimmed_note() {
                Some(note) => format!("{name} x{} ({note})", item.quantity),
                None => format!("{name} x{}", item.quantity),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// CASH and QRIS wait for payment; anything else goes straight to the cashier
pub fn initial_status(method: &PaymentMethod) -> OrderStatus {
    match method {
        PaymentMethod::Cash | PaymentMethod::Qris => OrderStatus::awaiting_payment(),
        PaymentMethod::Other(_) => OrderStatus::awaiting_confirmation(),
    }
}
