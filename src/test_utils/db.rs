use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    account::{Account, create_default_account},
    auth::UserID,
    db::initialize,
};

/// An initialized in-memory database.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// Insert the user "test@example.com" and return their ID.
pub(crate) fn create_test_user(connection: &Connection) -> UserID {
    create_test_user_with_email("test@example.com", connection)
}

pub(crate) fn create_test_user_with_email(email: &str, connection: &Connection) -> UserID {
    connection
        .execute(
            "INSERT INTO user (email, password) VALUES (?1, 'not a real hash')",
            [email],
        )
        .expect("Could not create test user");

    UserID::new(connection.last_insert_rowid())
}

/// An initialized database with a test user who owns the default account.
pub(crate) fn get_test_db_with_account() -> (Arc<Mutex<Connection>>, UserID, Account) {
    let connection = get_test_connection();
    let user_id = create_test_user(&connection);
    let account = create_default_account(user_id, &connection).expect("Could not create account");

    (Arc::new(Mutex::new(connection)), user_id, account)
}
