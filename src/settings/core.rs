//! The per-user key/value settings table.

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    Error,
    auth::UserID,
    navigation::{NavItem, ordered_nav_items},
};

const NAV_ORDER_KEY: &str = "nav_order";

pub fn create_setting_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS setting (
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (user_id, key)
        )",
        (),
    )?;

    Ok(())
}

/// Get the raw value stored under `key`, if any.
pub fn get_setting(
    user_id: UserID,
    key: &str,
    connection: &Connection,
) -> Result<Option<String>, Error> {
    connection
        .query_row(
            "SELECT value FROM setting WHERE user_id = ?1 AND key = ?2",
            params![user_id.as_i64(), key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Store `value` under `key`, replacing any previous value.
pub fn set_setting(
    user_id: UserID,
    key: &str,
    value: &str,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO setting (user_id, key, value) VALUES (?1, ?2, ?3)
        ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value",
        params![user_id.as_i64(), key, value],
    )?;

    Ok(())
}

/// Get the saved order of the navigation links as a list of [NavItem] keys.
///
/// Returns an empty list if nothing has been saved or the saved value cannot
/// be parsed.
pub fn get_nav_order(user_id: UserID, connection: &Connection) -> Result<Vec<String>, Error> {
    let Some(value) = get_setting(user_id, NAV_ORDER_KEY, connection)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&value) {
        Ok(keys) => Ok(keys),
        Err(error) => {
            tracing::warn!("could not parse nav order {value:?} for user {user_id}: {error}");
            Ok(Vec::new())
        }
    }
}

/// Save the order of the navigation links.
///
/// Unknown and repeated keys are dropped and missing items are appended, so
/// the stored list always names every [NavItem] exactly once.
pub fn save_nav_order(
    user_id: UserID,
    keys: &[String],
    connection: &Connection,
) -> Result<Vec<NavItem>, Error> {
    let items = ordered_nav_items(keys);
    let stored_keys: Vec<&str> = items.iter().map(|item| item.key()).collect();
    let value = serde_json::to_string(&stored_keys)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    set_setting(user_id, NAV_ORDER_KEY, &value, connection)?;

    Ok(items)
}

#[cfg(test)]
mod settings_tests {
    use crate::{
        navigation::NavItem,
        test_utils::{create_test_user, get_test_connection},
    };

    use super::{NAV_ORDER_KEY, get_nav_order, get_setting, save_nav_order, set_setting};

    #[test]
    fn set_setting_overwrites_previous_value() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);

        set_setting(user_id, "theme", "light", &connection).unwrap();
        set_setting(user_id, "theme", "dark", &connection).unwrap();

        assert_eq!(
            get_setting(user_id, "theme", &connection).unwrap(),
            Some("dark".to_owned())
        );
    }

    #[test]
    fn nav_order_is_empty_by_default() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);

        assert_eq!(get_nav_order(user_id, &connection).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn unparseable_nav_order_is_empty() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        set_setting(user_id, NAV_ORDER_KEY, "{not json", &connection).unwrap();

        assert_eq!(get_nav_order(user_id, &connection).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn save_nav_order_normalizes_keys() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let keys = ["goals", "bogus", "goals", "budget"].map(str::to_owned);

        let items = save_nav_order(user_id, &keys, &connection).unwrap();

        assert_eq!(&items[..2], &[NavItem::Goals, NavItem::Budget]);
        assert_eq!(
            get_nav_order(user_id, &connection).unwrap(),
            ["goals", "budget", "dashboard", "transactions", "summary", "settings"]
        );
    }
}
