//! Dataset fixtures for tests
//!
//! Writes small `world.db` and `community.db` files into a temp directory
//! so the read-only stores can be exercised against real SQLite files.

use std::path::{Path, PathBuf};

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, SqliteConnection};
use tempfile::TempDir;

use super::Dataset;

pub const COUNTRY_COUNT: usize = 7;

const WORLD_SCHEMA: &str = r#"
CREATE TABLE countries (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    iso2 TEXT NOT NULL,
    iso3 TEXT NOT NULL,
    capital TEXT,
    currency TEXT,
    region TEXT,
    population INTEGER
);
CREATE TABLE states (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    country_code TEXT NOT NULL,
    state_code TEXT
);
CREATE TABLE cities (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    country_code TEXT NOT NULL,
    state_code TEXT,
    latitude REAL,
    longitude REAL
);

INSERT INTO countries (name, iso2, iso3, capital, currency, region, population) VALUES
    ('Afghanistan', 'AF', 'AFG', 'Kabul', 'AFN', 'Asia', 41128771),
    ('France', 'FR', 'FRA', 'Paris', 'EUR', 'Europe', 67750000),
    ('Germany', 'DE', 'DEU', 'Berlin', 'EUR', 'Europe', 83240000),
    ('Japan', 'JP', 'JPN', 'Tokyo', 'JPY', 'Asia', 125700000),
    ('Mexico', 'MX', 'MEX', 'Mexico City', 'MXN', 'Americas', 126700000),
    ('United States', 'US', 'USA', 'Washington', 'USD', 'Americas', 331900000),
    ('United Kingdom', 'GB', 'GBR', 'London', 'GBP', 'Europe', NULL);

INSERT INTO states (name, country_code, state_code) VALUES
    ('Berlin', 'DE', 'BE'),
    ('Bavaria', 'DE', 'BY'),
    ('California', 'US', 'CA'),
    ('Illinois', 'US', 'IL'),
    ('New York', 'US', 'NY'),
    ('Querétaro', 'MX', 'QUE');

INSERT INTO cities (name, country_code, state_code, latitude, longitude) VALUES
    ('New York', 'US', 'NY', 40.7128, -74.006),
    ('San Francisco', 'US', 'CA', 37.7749, -122.4194),
    ('Chicago', 'US', 'IL', 41.8781, -87.6298),
    ('Santiago de Querétaro', 'MX', 'QUE', 20.5888, -100.3899),
    ('Mexico City', 'MX', 'CMX', 19.4326, -99.1332),
    ('Paris', 'FR', 'IDF', 48.8566, 2.3522),
    ('Munich', 'DE', 'BY', 48.1351, 11.582),
    ('Tokyo', 'JP', '13', 35.6762, 139.6503);
"#;

const COMMUNITY_SCHEMA: &str = r#"
CREATE TABLE chatters (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    messages INTEGER NOT NULL,
    joined TEXT
);

INSERT INTO chatters (name, messages, joined) VALUES
    ('grace', 150, '2023-02-01'),
    ('ada', 420, '2022-11-12'),
    ('linus', 300, NULL);
"#;

/// Temp directory holding both dataset files; removed on drop
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn world_path(&self) -> PathBuf {
        self.dir.path().join(Dataset::World.file_name())
    }
}

pub async fn fixture() -> FixtureDir {
    let dir = tempfile::tempdir().unwrap();
    seed(&dir.path().join(Dataset::World.file_name()), WORLD_SCHEMA).await;
    seed(&dir.path().join(Dataset::Community.file_name()), COMMUNITY_SCHEMA).await;
    FixtureDir { dir }
}

async fn seed(path: &Path, script: &str) {
    let mut conn: SqliteConnection = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    sqlx::raw_sql(script).execute(&mut conn).await.unwrap();
    conn.close().await.unwrap();
}
