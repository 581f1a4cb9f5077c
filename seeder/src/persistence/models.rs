//! Internal Diesel row structs for the users table.

use diesel::prelude::*;

use super::schema::users;

/// Insertable struct for new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: String,
    pub password: &'a str,
}

impl<'a> From<&'a user_generation::UserRow> for NewUserRow<'a> {
    fn from(row: &'a user_generation::UserRow) -> Self {
        Self {
            name: &row.display_name,
            email: row.email(),
            password: &row.password_hash,
        }
    }
}
