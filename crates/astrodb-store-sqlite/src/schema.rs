//! SQL schema for the astrodb SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys are enforced but never cascade: deleting a body that a star
/// or picture still references fails.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS celestial_body (
    cb_name     TEXT NOT NULL,
    coordinate  TEXT NOT NULL,
    visible     INTEGER NOT NULL DEFAULT 1,
    distance    REAL,
    diameter    REAL,
    PRIMARY KEY (cb_name, coordinate)
);

-- Shared lookup: one row per temperature, referenced by every star at it.
CREATE TABLE IF NOT EXISTS star1 (
    temperature       INTEGER PRIMARY KEY,
    spectral_class    TEXT,
    luminosity_class  TEXT,
    color             TEXT
);

CREATE TABLE IF NOT EXISTS star (
    cb_name     TEXT NOT NULL,
    coordinate  TEXT NOT NULL,
    age         REAL CHECK (age >= 0),
    temperature INTEGER NOT NULL REFERENCES star1(temperature),
    PRIMARY KEY (cb_name, coordinate),
    FOREIGN KEY (cb_name, coordinate)
        REFERENCES celestial_body(cb_name, coordinate)
);

CREATE TABLE IF NOT EXISTS observatory1 (
    obs_name TEXT PRIMARY KEY,
    address  TEXT
);

CREATE TABLE IF NOT EXISTS observatory (
    obs_id   INTEGER PRIMARY KEY,
    obs_name TEXT NOT NULL UNIQUE REFERENCES observatory1(obs_name)
);

CREATE TABLE IF NOT EXISTS tel_housed_at1 (
    tel_name TEXT PRIMARY KEY,
    obs_id   INTEGER NOT NULL REFERENCES observatory(obs_id)
);

CREATE TABLE IF NOT EXISTS tel_housed_at (
    tel_name          TEXT PRIMARY KEY REFERENCES tel_housed_at1(tel_name),
    manufactured_date TEXT NOT NULL,   -- YYYY-MM-DD
    model             TEXT
);

CREATE TABLE IF NOT EXISTS picture_taken_by (
    picture_id INTEGER PRIMARY KEY,
    date_taken TEXT NOT NULL,          -- YYYY-MM-DD
    link       TEXT,
    tel_name   TEXT NOT NULL REFERENCES tel_housed_at1(tel_name)
);

CREATE TABLE IF NOT EXISTS taken_of (
    picture_id INTEGER PRIMARY KEY REFERENCES picture_taken_by(picture_id),
    cb_name    TEXT NOT NULL,
    coordinate TEXT NOT NULL,
    FOREIGN KEY (cb_name, coordinate)
        REFERENCES celestial_body(cb_name, coordinate)
);

CREATE TABLE IF NOT EXISTS astronomer (
    ast_id   INTEGER PRIMARY KEY,
    ast_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS authored (
    ast_id  INTEGER NOT NULL REFERENCES astronomer(ast_id),
    th_name TEXT NOT NULL,
    ph_name TEXT NOT NULL,
    PRIMARY KEY (ast_id, th_name, ph_name)
);

CREATE INDEX IF NOT EXISTS star_temperature_idx ON star(temperature);
CREATE INDEX IF NOT EXISTS tel_obs_idx          ON tel_housed_at1(obs_id);
CREATE INDEX IF NOT EXISTS picture_tel_idx      ON picture_taken_by(tel_name);
CREATE INDEX IF NOT EXISTS taken_of_body_idx    ON taken_of(cb_name, coordinate);

PRAGMA user_version = 1;
";
