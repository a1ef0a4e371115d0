//! Static entity descriptors. One descriptor per table drives the whole
//! generic CRUD surface: route resolution, statement building, and the
//! fixed confirmation messages.

/// One non-key column: name plus the PostgreSQL type used as an explicit
/// cast on its bind placeholder (values always bind as text, see sql::params).
#[derive(Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub pg_type: &'static str,
}

#[derive(Debug)]
pub struct EntityDef {
    pub table: &'static str,
    /// API path segment under /api (e.g. "peliculas").
    pub path_segment: &'static str,
    pub pk: &'static str,
    /// Columns in insert order, primary key excluded.
    pub columns: &'static [ColumnDef],
    pub updated_message: &'static str,
    pub deleted_message: &'static str,
}

pub const ENTITIES: &[EntityDef] = &[
    EntityDef {
        table: "pelicula",
        path_segment: "peliculas",
        pk: "id",
        columns: &[
            ColumnDef { name: "titulo", pg_type: "text" },
            ColumnDef { name: "titulo_original", pg_type: "text" },
            ColumnDef { name: "year_estreno", pg_type: "int4" },
            ColumnDef { name: "duracion", pg_type: "int4" },
            ColumnDef { name: "pais_estreno", pg_type: "text" },
            ColumnDef { name: "idDirector", pg_type: "int8" },
            ColumnDef { name: "genero", pg_type: "text" },
            ColumnDef { name: "url", pg_type: "text" },
        ],
        updated_message: "Película actualizada",
        deleted_message: "Película eliminada",
    },
    EntityDef {
        table: "actor",
        path_segment: "actores",
        pk: "id",
        columns: &[
            ColumnDef { name: "nombre", pg_type: "text" },
            ColumnDef { name: "fecha_nacimiento", pg_type: "date" },
            ColumnDef { name: "nacionalidad", pg_type: "text" },
        ],
        updated_message: "Actor actualizado",
        deleted_message: "Actor eliminado",
    },
    EntityDef {
        table: "director",
        path_segment: "directores",
        pk: "id",
        columns: &[
            ColumnDef { name: "nombre", pg_type: "text" },
            ColumnDef { name: "nacionalidad", pg_type: "text" },
        ],
        updated_message: "Director actualizado",
        deleted_message: "Director eliminado",
    },
    EntityDef {
        table: "calificacion",
        path_segment: "calificaciones",
        pk: "id",
        columns: &[
            ColumnDef { name: "id_pelicula", pg_type: "int8" },
            ColumnDef { name: "nombre_completo", pg_type: "text" },
            ColumnDef { name: "calificacion", pg_type: "float8" },
            ColumnDef { name: "comentario", pg_type: "text" },
            ColumnDef { name: "fecha", pg_type: "date" },
        ],
        updated_message: "Calificación actualizada",
        deleted_message: "Calificación eliminada",
    },
    EntityDef {
        table: "peliculaactor",
        path_segment: "pelicula-actores",
        pk: "id",
        columns: &[
            ColumnDef { name: "id_pelicula", pg_type: "int8" },
            ColumnDef { name: "id_actor", pg_type: "int8" },
        ],
        updated_message: "Asociación actualizada",
        deleted_message: "Asociación eliminada",
    },
];

pub fn entity_by_path(segment: &str) -> Option<&'static EntityDef> {
    ENTITIES.iter().find(|e| e.path_segment == segment)
}
