//! Diesel table definitions for the seeder.

diesel::table! {
    /// Application users. `email` carries a unique constraint, which is the
    /// natural key generated rows conflict on.
    users (id) {
        /// Surrogate primary key.
        id -> Int8,
        /// Display name.
        name -> Varchar,
        /// Unique email address.
        email -> Varchar,
        /// Password hash in PHC string format.
        password -> Varchar,
    }
}
