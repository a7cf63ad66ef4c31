//! SQLite-backed store of raw Nutritionix responses.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::nutrients::ParsedNutrients;
use crate::FructResult;

/// Normalizes a query into its cache key.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// One stored search, without its raw payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSearch {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub name: Option<String>,
    pub serving_unit: Option<String>,
    pub serving_size_grams: Option<f64>,
    pub item: Option<String>,
    pub measure: Option<String>,
    pub quantity: Option<f64>,
    pub fructose: Option<f64>,
    pub glucose: Option<f64>,
    pub sucrose: Option<f64>,
}

/// Append-only cache of searches keyed by normalized query text.
pub struct SearchCache {
    conn: Connection,
}

impl SearchCache {
    /// Opens or creates the cache database.
    pub fn open(db_path: &Path) -> FructResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(db_path)?)
    }

    /// Creates a throwaway cache held in memory.
    pub fn in_memory() -> FructResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> FructResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS searches (
                id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                timestamp TEXT NOT NULL,
                query TEXT NOT NULL,
                raw TEXT NOT NULL DEFAULT '',
                name TEXT,
                serving_unit TEXT,
                serving_size_grams REAL,
                item TEXT,
                measure TEXT,
                quantity REAL,
                fructose_n REAL,
                glucose_n REAL,
                sucrose REAL
            );

            CREATE INDEX IF NOT EXISTS idx_searches_query ON searches(query);
        "#,
        )?;

        Ok(Self { conn })
    }

    /// Returns the newest non-empty payload stored for `query`.
    ///
    /// Missing rows, unparseable payloads and null/empty payloads are all
    /// misses. Nothing here is reported as an error.
    pub fn lookup(&self, query: &str) -> Option<Value> {
        let key = normalize_query(query);

        let raw: Option<String> = match self
            .conn
            .query_row(
                "SELECT raw FROM searches
                 WHERE query = ? AND raw != ''
                 ORDER BY id DESC
                 LIMIT 1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(query = %key, error = %e, "cache lookup failed, treating as miss");
                return None;
            }
        };

        let Some(raw) = raw else {
            tracing::debug!(query = %key, "no match in cache");
            return None;
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(payload) if is_empty_payload(&payload) => {
                tracing::debug!(query = %key, "cached payload is empty");
                None
            }
            Ok(payload) => {
                tracing::debug!(query = %key, "match in cache");
                Some(payload)
            }
            Err(e) => {
                tracing::debug!(query = %key, error = %e, "cached payload is not valid JSON");
                None
            }
        }
    }

    /// Appends a new record and returns its id.
    pub fn store(&self, query: &str, fields: &ParsedNutrients, raw: &str) -> FructResult<i64> {
        let key = normalize_query(query);

        self.conn.execute(
            "INSERT INTO searches (timestamp, query, raw, name, serving_unit, serving_size_grams,
                                   item, measure, quantity, fructose_n, glucose_n, sucrose)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                Utc::now().to_rfc3339(),
                key,
                raw,
                fields.name,
                fields.serving_unit,
                fields.serving_size_grams,
                fields.item,
                fields.measure,
                fields.quantity,
                fields.fructose,
                fields.glucose,
                fields.sucrose
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(query = %key, id, "wrote search to cache");
        Ok(id)
    }

    /// Most recent searches, newest first.
    pub fn recent(&self, limit: usize) -> FructResult<Vec<CachedSearch>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, query, name, serving_unit, serving_size_grams,
                    item, measure, quantity, fructose_n, glucose_n, sucrose
             FROM searches
             ORDER BY id DESC
             LIMIT ?",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let searches = stmt
            .query_map(params![limit], |row| {
                Ok(CachedSearch {
                    id: row.get(0)?,
                    timestamp: row
                        .get::<_, String>(1)?
                        .parse()
                        .unwrap_or_else(|_| Utc::now()),
                    query: row.get(2)?,
                    name: row.get(3)?,
                    serving_unit: row.get(4)?,
                    serving_size_grams: row.get(5)?,
                    item: row.get(6)?,
                    measure: row.get(7)?,
                    quantity: row.get(8)?,
                    fructose: row.get(9)?,
                    glucose: row.get(10)?,
                    sucrose: row.get(11)?,
                })
            })?
            .filter_map(|r| match r {
                Ok(search) => Some(search),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable cache row");
                    None
                }
            })
            .collect();

        Ok(searches)
    }

    /// Number of stored searches.
    pub fn count(&self) -> FructResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM searches", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn fields(name: &str) -> ParsedNutrients {
        ParsedNutrients {
            name: name.to_string(),
            serving_unit: "medium".to_string(),
            serving_size_grams: 182.0,
            item: Some(name.to_string()),
            measure: None,
            quantity: 1.0,
            fructose: 10.8,
            glucose: 4.4,
            sucrose: 3.8,
            t_fructose: 12.7,
            t_glucose: 6.3,
            t_sugar: 18.9,
            t_sugar_calc: 19.0,
        }
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Green APPLE "), "green apple");
    }

    #[test]
    fn test_lookup_empty_cache() {
        let cache = SearchCache::in_memory().unwrap();
        assert!(cache.lookup("apple").is_none());
        assert_eq!(cache.count().unwrap(), 0);
    }

    #[test]
    fn test_store_then_lookup_is_case_insensitive() {
        let cache = SearchCache::in_memory().unwrap();
        let payload = json!({"foods": [{"food_name": "apple"}]});

        cache
            .store("Apple", &fields("apple"), &payload.to_string())
            .unwrap();

        assert_eq!(cache.lookup("apple"), Some(payload.clone()));
        assert_eq!(cache.lookup("APPLE"), Some(payload));
    }

    #[test]
    fn test_lookup_prefers_newest_row() {
        let cache = SearchCache::in_memory().unwrap();
        let old = json!({"foods": [{"food_name": "old"}]});
        let new = json!({"foods": [{"food_name": "new"}]});

        cache.store("pear", &fields("pear"), &old.to_string()).unwrap();
        cache.store("pear", &fields("pear"), &new.to_string()).unwrap();

        assert_eq!(cache.lookup("pear"), Some(new));
        assert_eq!(cache.count().unwrap(), 2);
    }

    #[test]
    fn test_empty_raw_is_a_miss() {
        let cache = SearchCache::in_memory().unwrap();
        cache.store("kiwi", &fields("kiwi"), "").unwrap();
        assert!(cache.lookup("kiwi").is_none());
    }

    #[test]
    fn test_empty_raw_row_does_not_hide_older_payload() {
        let cache = SearchCache::in_memory().unwrap();
        let payload = json!({"foods": [{"food_name": "kiwi"}]});

        cache
            .store("kiwi", &fields("kiwi"), &payload.to_string())
            .unwrap();
        cache.store("kiwi", &fields("kiwi"), "").unwrap();

        assert_eq!(cache.lookup("kiwi"), Some(payload));
    }

    #[test]
    fn test_null_and_empty_json_are_misses() {
        let cache = SearchCache::in_memory().unwrap();
        cache.store("a", &fields("a"), "null").unwrap();
        cache.store("b", &fields("b"), "{}").unwrap();
        cache.store("c", &fields("c"), "[]").unwrap();

        assert!(cache.lookup("a").is_none());
        assert!(cache.lookup("b").is_none());
        assert!(cache.lookup("c").is_none());
    }

    #[test]
    fn test_invalid_json_is_a_miss() {
        let cache = SearchCache::in_memory().unwrap();
        cache.store("mango", &fields("mango"), "{not json").unwrap();
        assert!(cache.lookup("mango").is_none());
    }

    #[test]
    fn test_recent_lists_newest_first() {
        let cache = SearchCache::in_memory().unwrap();
        cache.store("apple", &fields("apple"), "{}").unwrap();
        cache.store("banana", &fields("banana"), "{}").unwrap();
        cache.store("cherry", &fields("cherry"), "{}").unwrap();

        let recent = cache.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].query, "cherry");
        assert_eq!(recent[1].query, "banana");
        assert_eq!(recent[0].fructose, Some(10.8));
        assert!(recent[0].measure.is_none());
    }

    #[test]
    fn test_recent_with_huge_limit() {
        let cache = SearchCache::in_memory().unwrap();
        for query in ["apple", "pear", "kiwi"] {
            cache.store(query, &fields(query), "{}").unwrap();
        }

        assert_eq!(cache.recent(usize::MAX).unwrap().len(), 3);
        assert_eq!(cache.recent(2).unwrap().len(), 2);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("searches.db");

        let cache = SearchCache::open(&db_path).unwrap();
        cache.store("fig", &fields("fig"), "{\"foods\":[]}").unwrap();
        drop(cache);

        assert!(db_path.exists());
        let reopened = SearchCache::open(&db_path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
