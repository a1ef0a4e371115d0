//! Fixed join/aggregate reports over movies. Each is a read-only query
//! with no input parameters.

use crate::error::AppError;
use crate::response;
use crate::state::AppState;
use axum::{extract::State, response::Response};

/// Inner join: movies without a resolvable director are excluded.
const WITH_DIRECTOR: &str = "\
SELECT p.\"titulo\", d.\"nombre\" AS director \
FROM \"pelicula\" p \
JOIN \"director\" d ON p.\"idDirector\" = d.\"id\"";

/// Inner join: movies with zero ratings are excluded. The mean arrives as a
/// JSON number (numeric would decode as text).
const AVERAGE_RATING: &str = "\
SELECT p.\"id\", p.\"titulo\", ROUND(AVG(c.\"calificacion\")::numeric, 1)::float8 AS promedio_calificacion \
FROM \"pelicula\" p \
JOIN \"calificacion\" c ON p.\"id\" = c.\"id_pelicula\" \
GROUP BY p.\"id\", p.\"titulo\" \
ORDER BY promedio_calificacion DESC";

const WITH_ACTORS: &str = "\
SELECT p.\"titulo\", a.\"nombre\" AS actor \
FROM \"peliculaactor\" pa \
JOIN \"pelicula\" p ON pa.\"id_pelicula\" = p.\"id\" \
JOIN \"actor\" a ON pa.\"id_actor\" = a.\"id\" \
ORDER BY p.\"titulo\", a.\"nombre\"";

const TOP_RATED: &str = "\
SELECT p.\"id\", p.\"titulo\", ROUND(AVG(c.\"calificacion\")::numeric, 1)::float8 AS promedio_calificacion \
FROM \"pelicula\" p \
JOIN \"calificacion\" c ON p.\"id\" = c.\"id_pelicula\" \
GROUP BY p.\"id\", p.\"titulo\" \
HAVING AVG(c.\"calificacion\") > 8.5 \
ORDER BY promedio_calificacion DESC";

/// Left join so zero-rating movies count as 0; they only drop out at the
/// HAVING filter.
const RATING_COUNTS: &str = "\
SELECT p.\"id\", p.\"titulo\", COUNT(c.\"id\") AS cantidad_calificaciones \
FROM \"pelicula\" p \
LEFT JOIN \"calificacion\" c ON p.\"id\" = c.\"id_pelicula\" \
GROUP BY p.\"id\", p.\"titulo\" \
HAVING COUNT(c.\"id\") > 1 \
ORDER BY cantidad_calificaciones DESC";

async fn run(state: &AppState, sql: &str) -> Result<Response, AppError> {
    let rows = state.gateway.fetch_all(sql, &[]).await?;
    Ok(response::rows(rows))
}

pub async fn with_director(State(state): State<AppState>) -> Result<Response, AppError> {
    run(&state, WITH_DIRECTOR).await
}

pub async fn average_rating(State(state): State<AppState>) -> Result<Response, AppError> {
    run(&state, AVERAGE_RATING).await
}

pub async fn with_actors(State(state): State<AppState>) -> Result<Response, AppError> {
    run(&state, WITH_ACTORS).await
}

pub async fn top_rated(State(state): State<AppState>) -> Result<Response, AppError> {
    run(&state, TOP_RATED).await
}

pub async fn rating_counts(State(state): State<AppState>) -> Result<Response, AppError> {
    run(&state, RATING_COUNTS).await
}
