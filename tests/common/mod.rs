//! Shared test utilities

use solace_companion::{db, DbPool};

/// Set up an in-memory test database
#[must_use]
pub fn setup_test_db() -> DbPool {
    db::init_memory().expect("failed to init test db")
}

/// Create a test user in the database
#[allow(dead_code)]
pub fn create_test_user(db: &DbPool, id: i64) -> solace_companion::db::User {
    let repo = solace_companion::db::UserRepo::new(db.clone());
    repo.find_or_create(id).expect("failed to create test user")
}
