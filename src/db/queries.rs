use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingStatus, CartItem, Feedback, Order, OrderStatus, PaymentStatus, RefundStatus,
    User,
};

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format(DT_FORMAT).to_string()
}

fn parse_dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DT_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, service_id, service_name, package_id, package_name, user_id,
            name, email, phone, city, pincode, notes, scheduled_at, total_amount, locking_amount,
            status, payment_status, refund_status, payment_order_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            booking.id,
            booking.service_id,
            booking.service_name,
            booking.package_id,
            booking.package_name,
            booking.user_id,
            booking.name,
            booking.email,
            booking.phone,
            booking.city,
            booking.pincode,
            booking.notes,
            fmt_dt(&booking.scheduled_at),
            booking.total_amount,
            booking.locking_amount,
            booking.status.as_str(),
            booking.payment_status.as_str(),
            booking.refund_status.as_str(),
            booking.payment_order_id,
            fmt_dt(&booking.created_at),
        ],
    )?;
    Ok(())
}

/// Persist everything a lifecycle transition may have touched. Immutable
/// creation-time fields are deliberately not updatable.
pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let (feedback_rating, feedback_comments, feedback_at) = match &booking.feedback {
        Some(f) => (
            Some(f.rating),
            Some(f.comments.clone()),
            Some(fmt_dt(&f.created_at)),
        ),
        None => (None, None, None),
    };

    let count = conn.execute(
        "UPDATE bookings SET status = ?1, payment_status = ?2, refund_status = ?3,
            payment_order_id = ?4, feedback_rating = ?5, feedback_comments = ?6, feedback_at = ?7,
            cancelled_at = ?8, completed_at = ?9
         WHERE id = ?10",
        params![
            booking.status.as_str(),
            booking.payment_status.as_str(),
            booking.refund_status.as_str(),
            booking.payment_order_id,
            feedback_rating,
            feedback_comments,
            feedback_at,
            booking.cancelled_at.as_ref().map(fmt_dt),
            booking.completed_at.as_ref().map(fmt_dt),
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

const BOOKING_COLUMNS: &str = "id, service_id, service_name, package_id, package_name, user_id,
    name, email, phone, city, pincode, notes, scheduled_at, total_amount, locking_amount,
    status, payment_status, refund_status, payment_order_id, feedback_rating, feedback_comments,
    feedback_at, created_at, cancelled_at, completed_at";

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_booking_row(row)));

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn bookings_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?1 ORDER BY created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: String = row.get(15)?;
    let payment_str: String = row.get(16)?;
    let refund_str: String = row.get(17)?;

    let feedback_rating: Option<i32> = row.get(19)?;
    let feedback = match feedback_rating {
        Some(rating) => {
            let comments: Option<String> = row.get(20)?;
            let at: Option<String> = row.get(21)?;
            Some(Feedback {
                rating,
                comments: comments.unwrap_or_default(),
                created_at: parse_dt(&at.unwrap_or_default()),
            })
        }
        None => None,
    };

    let scheduled_at: String = row.get(12)?;
    let created_at: String = row.get(22)?;
    let cancelled_at: Option<String> = row.get(23)?;
    let completed_at: Option<String> = row.get(24)?;

    Ok(Booking {
        id: row.get(0)?,
        service_id: row.get(1)?,
        service_name: row.get(2)?,
        package_id: row.get(3)?,
        package_name: row.get(4)?,
        user_id: row.get(5)?,
        name: row.get(6)?,
        email: row.get(7)?,
        phone: row.get(8)?,
        city: row.get(9)?,
        pincode: row.get(10)?,
        notes: row.get(11)?,
        scheduled_at: parse_dt(&scheduled_at),
        total_amount: row.get(13)?,
        locking_amount: row.get(14)?,
        status: BookingStatus::parse(&status_str),
        payment_status: PaymentStatus::parse(&payment_str),
        refund_status: RefundStatus::parse(&refund_str),
        payment_order_id: row.get(18)?,
        feedback,
        created_at: parse_dt(&created_at),
        cancelled_at: cancelled_at.as_deref().map(parse_dt),
        completed_at: completed_at.as_deref().map(parse_dt),
    })
}

// ── Orders ──

pub fn create_order(conn: &Connection, order: &Order) -> anyhow::Result<()> {
    let items = serde_json::to_string(&order.items)?;
    conn.execute(
        "INSERT INTO orders (id, user_id, user_name, user_email, items, total_amount, shipping,
            address, status, payment_status, payment_order_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            order.id,
            order.user_id,
            order.user_name,
            order.user_email,
            items,
            order.total_amount,
            order.shipping,
            order.address,
            order.status.as_str(),
            order.payment_status.as_str(),
            order.payment_order_id,
            fmt_dt(&order.created_at),
        ],
    )?;
    Ok(())
}

pub fn update_order(conn: &Connection, order: &Order) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE orders SET status = ?1, payment_status = ?2, payment_order_id = ?3 WHERE id = ?4",
        params![
            order.status.as_str(),
            order.payment_status.as_str(),
            order.payment_order_id,
            order.id,
        ],
    )?;
    Ok(count > 0)
}

const ORDER_COLUMNS: &str = "id, user_id, user_name, user_email, items, total_amount, shipping,
    address, status, payment_status, payment_order_id, created_at";

pub fn get_order(conn: &Connection, id: &str) -> anyhow::Result<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], |row| Ok(parse_order_row(row)));

    match result {
        Ok(order) => Ok(Some(order?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn orders_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<Order>> {
    let sql =
        format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], |row| Ok(parse_order_row(row)))?;

    let mut orders = vec![];
    for row in rows {
        orders.push(row??);
    }
    Ok(orders)
}

fn parse_order_row(row: &rusqlite::Row) -> anyhow::Result<Order> {
    let items_json: String = row.get(4)?;
    let items: Vec<CartItem> = serde_json::from_str(&items_json).unwrap_or_default();

    let status_str: String = row.get(8)?;
    let payment_str: String = row.get(9)?;
    let created_at: String = row.get(11)?;

    Ok(Order {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        user_email: row.get(3)?,
        items,
        total_amount: row.get(5)?,
        shipping: row.get(6)?,
        address: row.get(7)?,
        status: OrderStatus::parse(&status_str),
        payment_status: PaymentStatus::parse(&payment_str),
        payment_order_id: row.get(10)?,
        created_at: parse_dt(&created_at),
    })
}

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, name, password_hash, picture, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.email,
            user.name,
            user.password_hash,
            user.picture,
            fmt_dt(&user.created_at),
        ],
    )?;
    Ok(())
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, email, name, password_hash, picture, created_at FROM users WHERE email = ?1",
        params![email],
        |row| {
            let created_at: String = row.get(5)?;
            Ok(User {
                id: row.get(0)?,
                email: row.get(1)?,
                name: row.get(2)?,
                password_hash: row.get(3)?,
                picture: row.get(4)?,
                created_at: parse_dt(&created_at),
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
