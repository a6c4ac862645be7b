//! Database layer (relational user store).

pub mod users;

pub use users::UserStore;

/// Table names as constants.
pub mod tables {
    pub const USER: &str = "user";
}
