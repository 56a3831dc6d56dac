//! SQL schema for the registry database.
//!
//! Table layouts match databases created by earlier deployments, so an
//! existing file is opened as-is. Every statement is idempotent.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS trabajadores (
    id                   INTEGER PRIMARY KEY,
    seccion              TEXT NOT NULL,
    apellido_paterno     TEXT NOT NULL,
    apellido_materno     TEXT,
    nombres              TEXT NOT NULL,
    curp                 TEXT NOT NULL UNIQUE,
    codigo_de_puesto     TEXT NOT NULL,
    lugar_de_adscripcion TEXT NOT NULL,
    telefono             TEXT,
    correo_electronico   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS becarios (
    id                  INTEGER PRIMARY KEY,
    curp_trabajador     TEXT NOT NULL REFERENCES trabajadores(curp),
    apellido_paterno    TEXT NOT NULL,
    apellido_materno    TEXT,
    nombres             TEXT NOT NULL,
    curp                TEXT NOT NULL UNIQUE,
    fecha_de_nacimiento TEXT NOT NULL,
    sexo                TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS datos_becario (
    id                   INTEGER PRIMARY KEY,
    curp_becario         TEXT NOT NULL REFERENCES becarios(curp),
    anio                 TEXT NOT NULL,
    anterior_obtuvo_beca TEXT NOT NULL,
    grado_cursado        TEXT NOT NULL,
    promedio             FLOAT
);

-- Older files were created without UNIQUE constraints; these indexes bring
-- them in line and fail loudly if duplicates are already present.
CREATE UNIQUE INDEX IF NOT EXISTS trabajadores_curp_idx  ON trabajadores(curp);
CREATE UNIQUE INDEX IF NOT EXISTS becarios_curp_idx      ON becarios(curp);
CREATE UNIQUE INDEX IF NOT EXISTS datos_becario_key_idx  ON datos_becario(curp_becario, anio);
";
