//! Filmoteca: movie catalog REST API over PostgreSQL.

pub mod entity;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod schema;
pub mod sql;
pub mod state;

pub use entity::{entity_by_path, EntityDef, ENTITIES};
pub use error::AppError;
pub use gateway::{Gateway, PgGateway};
pub use routes::{api_routes, common_routes};
pub use schema::{apply_schema, ensure_database_exists};
pub use state::AppState;
