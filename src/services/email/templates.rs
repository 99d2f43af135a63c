//! Transactional email bodies. Plain string templating; nothing here is
//! user-facing business logic.

use crate::models::{Booking, Order};

use super::EmailMessage;

pub fn booking_confirmation(booking: &Booking) -> EmailMessage {
    let date = booking.scheduled_at.format("%Y-%m-%d").to_string();
    let time = booking.scheduled_at.format("%H:%M").to_string();

    let html = format!(
        "<h1>Booking Confirmation - AnandAyojan</h1>\
         <p>Dear {name},</p>\
         <p>Your booking has been confirmed!</p>\
         <h2>Booking Details:</h2>\
         <ul>\
           <li><strong>Booking ID:</strong> {id}</li>\
           <li><strong>Service:</strong> {service}</li>\
           <li><strong>Date:</strong> {date}</li>\
           <li><strong>Time:</strong> {time}</li>\
           <li><strong>Locking Amount Paid:</strong> ₹{locking}</li>\
           <li><strong>Total Amount:</strong> ₹{total}</li>\
         </ul>\
         <p>Thank you for choosing AnandAyojan!</p>",
        name = booking.name,
        id = booking.id,
        service = booking.service_name,
        date = date,
        time = time,
        locking = booking.locking_amount,
        total = booking.total_amount,
    );

    EmailMessage {
        to: booking.email.clone(),
        subject: format!("Booking Confirmation - {}", booking.id),
        html,
        text: Some(format!(
            "Booking confirmed for {} on {}",
            booking.service_name, date
        )),
    }
}

pub fn order_confirmation(order: &Order) -> EmailMessage {
    let item_count: i64 = order.items.iter().map(|i| i.quantity).sum();

    let html = format!(
        "<h1>Order Confirmation - AnandAyojan</h1>\
         <p>Dear {name},</p>\
         <p>Your order has been confirmed!</p>\
         <h2>Order Details:</h2>\
         <ul>\
           <li><strong>Order ID:</strong> {id}</li>\
           <li><strong>Total Amount:</strong> ₹{total}</li>\
           <li><strong>Items:</strong> {count} items</li>\
         </ul>\
         <p>We will process your order shortly.</p>\
         <p>Thank you for shopping with AnandAyojan!</p>",
        name = order.user_name,
        id = order.id,
        total = order.total_amount,
        count = item_count,
    );

    EmailMessage {
        to: order.user_email.clone(),
        subject: format!("Order Confirmation - {}", order.id),
        html,
        text: Some(format!("Order confirmed - {}", order.id)),
    }
}
