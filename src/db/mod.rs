pub mod queries;

use anyhow::Context;
use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    password_hash TEXT,
    picture       TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bookings (
    id               TEXT PRIMARY KEY,
    service_id       TEXT NOT NULL,
    service_name     TEXT NOT NULL,
    package_id       TEXT NOT NULL,
    package_name     TEXT NOT NULL,
    user_id          TEXT NOT NULL,
    name             TEXT NOT NULL,
    email            TEXT NOT NULL,
    phone            TEXT NOT NULL,
    city             TEXT NOT NULL,
    pincode          TEXT NOT NULL,
    notes            TEXT,
    scheduled_at     TEXT NOT NULL,
    total_amount     INTEGER NOT NULL,
    locking_amount   INTEGER NOT NULL,
    status           TEXT NOT NULL,
    payment_status   TEXT NOT NULL,
    refund_status    TEXT NOT NULL,
    payment_order_id TEXT,
    feedback_rating  INTEGER,
    feedback_comments TEXT,
    feedback_at      TEXT,
    created_at       TEXT NOT NULL,
    cancelled_at     TEXT,
    completed_at     TEXT
);

CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id);
CREATE INDEX IF NOT EXISTS idx_bookings_email ON bookings(email);

CREATE TABLE IF NOT EXISTS orders (
    id               TEXT PRIMARY KEY,
    user_id          TEXT NOT NULL,
    user_name        TEXT NOT NULL,
    user_email       TEXT NOT NULL,
    items            TEXT NOT NULL,
    total_amount     INTEGER NOT NULL,
    shipping         INTEGER NOT NULL,
    address          TEXT NOT NULL,
    status           TEXT NOT NULL,
    payment_status   TEXT NOT NULL,
    payment_order_id TEXT,
    created_at       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id);
";

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    conn.execute_batch(SCHEMA)
        .context("failed to create schema")?;

    Ok(conn)
}
