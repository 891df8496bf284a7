//! Categories for transactions and budget items, e.g. 'Groceries' or 'Salary'.
//!
//! Categories are shared by all users. A default set is inserted when the
//! database is initialized and users can only change their order.

use rusqlite::{Connection, Row, params};
use uuid::Uuid;

use crate::Error;

/// The name shown for transactions without a category.
pub const UNCATEGORIZED_NAME: &str = "Other";
/// The color used for transactions without a category.
pub const UNCATEGORIZED_COLOR: &str = "#94a3b8";

/// The categories every database starts with, as `(name, color, icon)`.
const DEFAULT_CATEGORIES: [(&str, &str, &str); 10] = [
    ("Groceries", "#22c55e", "🛒"),
    ("Housing", "#6366f1", "🏠"),
    ("Transport", "#0ea5e9", "🚗"),
    ("Eating out", "#f97316", "🍽️"),
    ("Health", "#ef4444", "🩺"),
    ("Leisure", "#a855f7", "🎉"),
    ("Shopping", "#ec4899", "🛍️"),
    ("Subscriptions", "#14b8a6", "📺"),
    ("Salary", "#10b981", "💼"),
    ("Savings", "#eab308", "🐷"),
];

/// A category for expenses and income.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    /// A CSS hex color, e.g. "#22c55e".
    pub color: String,
    /// An emoji shown next to the name.
    pub icon: String,
    pub sort_order: i64,
}

pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL,
            icon TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

/// Insert the default categories that are not in the database yet.
pub fn seed_default_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare(
        "INSERT OR IGNORE INTO category (id, name, color, icon, sort_order)
        VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for (sort_order, (name, color, icon)) in DEFAULT_CATEGORIES.iter().enumerate() {
        statement.execute(params![Uuid::new_v4(), name, color, icon, sort_order as i64])?;
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        icon: row.get(3)?,
        sort_order: row.get(4)?,
    })
}

/// Get all categories in display order.
pub fn get_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, color, icon, sort_order FROM category
            ORDER BY sort_order ASC, name ASC",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Check that `id` refers to a category.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if there is no such category.
pub fn ensure_category_exists(id: Uuid, connection: &Connection) -> Result<(), Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM category WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;

    if exists {
        Ok(())
    } else {
        Err(Error::InvalidCategory)
    }
}
