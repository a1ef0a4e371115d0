//! Startup DDL and database bootstrap. The schema is applied idempotently
//! every start; referential integrity lives here, not in the handlers.

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS "director" (
        "id" BIGSERIAL PRIMARY KEY,
        "nombre" TEXT NOT NULL,
        "nacionalidad" TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "actor" (
        "id" BIGSERIAL PRIMARY KEY,
        "nombre" TEXT NOT NULL,
        "fecha_nacimiento" DATE,
        "nacionalidad" TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "pelicula" (
        "id" BIGSERIAL PRIMARY KEY,
        "titulo" TEXT NOT NULL,
        "titulo_original" TEXT,
        "year_estreno" INT,
        "duracion" INT,
        "pais_estreno" TEXT,
        "idDirector" BIGINT NOT NULL REFERENCES "director"("id"),
        "genero" TEXT,
        "url" TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "calificacion" (
        "id" BIGSERIAL PRIMARY KEY,
        "id_pelicula" BIGINT NOT NULL REFERENCES "pelicula"("id"),
        "nombre_completo" TEXT,
        "calificacion" DOUBLE PRECISION NOT NULL,
        "comentario" TEXT,
        "fecha" DATE
    )
    "#,
    // No uniqueness on the pair: duplicate associations are allowed.
    r#"
    CREATE TABLE IF NOT EXISTS "peliculaactor" (
        "id" BIGSERIAL PRIMARY KEY,
        "id_pelicula" BIGINT NOT NULL REFERENCES "pelicula"("id"),
        "id_actor" BIGINT NOT NULL REFERENCES "actor"("id")
    )
    "#,
];

/// Create the five tables in dependency order.
pub async fn apply_schema(pool: &PgPool) -> Result<(), AppError> {
    for ddl in TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects
/// to the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
