//! Parameterized SQL construction.

mod builder;
mod params;

pub use builder::{delete, insert, select_all, select_by_id, update, QueryBuf};
pub use params::PgBindValue;
