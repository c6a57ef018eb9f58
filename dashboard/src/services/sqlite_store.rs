//! SQLite-backed measurement store
//!
//! Places and measurements live in two tables. A refresh drops and recreates
//! both inside one transaction, so readers see either the old snapshot or the
//! new one.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

use shared::{component_debug, component_info, Component, Measurement, Place, PlaceBatch, PlaceKey};
use crate::error::{DashboardError, DashboardResult};
use crate::traits::MeasurementStore;
use crate::types::{PlaceValues, StoreCounts};

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS place (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        country TEXT NOT NULL,
        city TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS measurement (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        datetime TEXT,
        value REAL NOT NULL,
        place_id INTEGER NOT NULL REFERENCES place(id)
    );
    CREATE INDEX IF NOT EXISTS idx_place_country_city ON place(country, city);
    CREATE INDEX IF NOT EXISTS idx_measurement_place ON measurement(place_id);
";

const DROP_SCHEMA: &str = "
    DROP TABLE IF EXISTS measurement;
    DROP TABLE IF EXISTS place;
";

/// Real measurement store over a single SQLite connection.
///
/// Connection work runs on the blocking thread pool; the mutex serializes it.
#[derive(Clone)]
pub struct SqliteMeasurementStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMeasurementStore {
    /// Open (or create) the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        component_info!(Component::Store, "Opened database {}", path.as_ref().display());
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> DashboardResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DashboardResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `work` against the connection on a blocking thread
    async fn with_connection<T, F>(&self, work: F) -> DashboardResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> DashboardResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || -> DashboardResult<T> {
            let mut guard = conn
                .lock()
                .map_err(|_| DashboardError::StoreTask("connection lock poisoned".to_string()))?;
            work(&mut guard)
        })
        .await
        .map_err(|e| DashboardError::StoreTask(e.to_string()))?
    }
}

fn insert_snapshot(conn: &mut Connection, batches: &[PlaceBatch]) -> DashboardResult<StoreCounts> {
    let tx = conn.transaction()?;
    tx.execute_batch(DROP_SCHEMA)?;
    tx.execute_batch(CREATE_SCHEMA)?;

    let mut counts = StoreCounts::default();
    {
        let mut insert_place = tx.prepare("INSERT INTO place (country, city) VALUES (?1, ?2)")?;
        let mut insert_measurement =
            tx.prepare("INSERT INTO measurement (datetime, value, place_id) VALUES (?1, ?2, ?3)")?;

        for batch in batches {
            insert_place.execute(params![batch.key.country, batch.key.city])?;
            let place_id = tx.last_insert_rowid();
            counts.places += 1;

            for reading in &batch.measurements {
                insert_measurement.execute(params![reading.date.utc, reading.value, place_id])?;
                counts.measurements += 1;
            }
        }
    }
    // Dropping an uncommitted transaction rolls it back
    tx.commit()?;
    Ok(counts)
}

fn group_by_place(rows: Vec<(Place, Option<f64>)>) -> Vec<PlaceValues> {
    let mut grouped: Vec<PlaceValues> = Vec::new();
    for (place, value) in rows {
        let same_place = grouped.last().is_some_and(|last| last.place.id == place.id);
        if !same_place {
            grouped.push(PlaceValues {
                place,
                values: Vec::new(),
            });
        }
        if let (Some(value), Some(entry)) = (value, grouped.last_mut()) {
            entry.values.push(value);
        }
    }
    grouped
}

fn row_to_place(row: &Row<'_>) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get(0)?,
        country: row.get(1)?,
        city: row.get(2)?,
    })
}

fn row_to_measurement(row: &Row<'_>) -> rusqlite::Result<Measurement> {
    Ok(Measurement {
        id: row.get(0)?,
        datetime: row.get(1)?,
        value: row.get(2)?,
        place_id: row.get(3)?,
    })
}

#[async_trait]
impl MeasurementStore for SqliteMeasurementStore {
    async fn initialize(&self) -> DashboardResult<()> {
        self.with_connection(|conn| {
            conn.execute_batch(CREATE_SCHEMA)?;
            Ok(())
        })
        .await
    }

    async fn replace_all(&self, batches: Vec<PlaceBatch>) -> DashboardResult<StoreCounts> {
        let counts = self
            .with_connection(move |conn| insert_snapshot(conn, &batches))
            .await?;

        component_info!(
            Component::Store,
            "Replaced store contents: {} places, {} measurements",
            counts.places,
            counts.measurements
        );
        Ok(counts)
    }

    async fn find_place(&self, key: &PlaceKey) -> DashboardResult<Option<Place>> {
        let lookup = key.clone();
        let place = self
            .with_connection(move |conn| {
                let place = conn
                    .query_row(
                        "SELECT id, country, city FROM place WHERE country = ?1 AND city = ?2 ORDER BY id LIMIT 1",
                        params![lookup.country, lookup.city],
                        row_to_place,
                    )
                    .optional()?;
                Ok(place)
            })
            .await?;
        component_debug!(Component::Store, "Lookup {} -> {:?}", key, place.as_ref().map(|p| p.id));
        Ok(place)
    }

    async fn measurements_for(&self, place_id: i64) -> DashboardResult<Vec<Measurement>> {
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, datetime, value, place_id FROM measurement WHERE place_id = ?1 ORDER BY id",
            )?;
            let measurements = stmt
                .query_map(params![place_id], row_to_measurement)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(measurements)
        })
        .await
    }

    async fn country_values(&self, country: &str) -> DashboardResult<Vec<PlaceValues>> {
        let country = country.to_string();
        let rows = self
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT p.id, p.country, p.city, m.value
                     FROM place p LEFT JOIN measurement m ON m.place_id = p.id
                     WHERE p.country = ?1
                     ORDER BY p.id, m.id",
                )?;
                let rows = stmt
                    .query_map(params![country], |row| {
                        Ok((row_to_place(row)?, row.get::<_, Option<f64>>(3)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;
        Ok(group_by_place(rows))
    }

    async fn places(&self) -> DashboardResult<Vec<Place>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, country, city FROM place ORDER BY country, city, id")?;
            let places = stmt
                .query_map([], row_to_place)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(places)
        })
        .await
    }

    async fn countries(&self) -> DashboardResult<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT country FROM place ORDER BY country")?;
            let countries = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            Ok(countries)
        })
        .await
    }
}
