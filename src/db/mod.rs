/// Data access layer: explicit SQL over the sqlx pool, one module per table.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod schema;
pub mod users;

pub use schema::ensure_schema;
