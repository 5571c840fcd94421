//! Persistence seam for formations and events.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::calendar_index::SkippedRecord;
use crate::error::{OdcError, OdcResult};
use crate::event::Event;
use crate::formation::Formation;
use crate::occurrence::OccurrenceKind;

/// Backend holding the formation and event tables.
///
/// Stores return rows undecoded. Each row is decoded on its own, so a
/// malformed row is dropped without taking its table down with it.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_formation_rows(&self) -> OdcResult<Vec<Value>>;
    async fn fetch_event_rows(&self) -> OdcResult<Vec<Value>>;

    /// Every formation that decodes; unreadable rows are logged and left out.
    async fn fetch_formations(&self) -> OdcResult<Vec<Formation>> {
        let rows = self.fetch_formation_rows().await?;
        Ok(decode_rows(OccurrenceKind::Formation, rows).records)
    }

    async fn fetch_events(&self) -> OdcResult<Vec<Event>> {
        let rows = self.fetch_event_rows().await?;
        Ok(decode_rows(OccurrenceKind::Event, rows).records)
    }

    /// Insert or replace by id. Returns the record as stored.
    async fn save_formation(&self, formation: &Formation) -> OdcResult<Formation>;
    async fn delete_formation(&self, id: &str) -> OdcResult<()>;

    async fn save_event(&self, event: &Event) -> OdcResult<Event>;
    async fn delete_event(&self, id: &str) -> OdcResult<()>;
}

/// Rows that decoded, and the ones that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub rejected: Vec<SkippedRecord>,
}

/// Decode `rows` one by one, keeping input order.
pub fn decode_rows<T: DeserializeOwned>(kind: OccurrenceKind, rows: Vec<Value>) -> Decoded<T> {
    let mut decoded = Decoded {
        records: Vec::with_capacity(rows.len()),
        rejected: Vec::new(),
    };

    for (position, row) in rows.into_iter().enumerate() {
        let record_id = row_id(&row, position);
        match serde_json::from_value(row) {
            Ok(record) => decoded.records.push(record),
            Err(e) => {
                warn!(
                    kind = kind.label(),
                    record_id = %record_id,
                    error = %e,
                    "unreadable row skipped"
                );
                decoded.rejected.push(SkippedRecord {
                    kind,
                    record_id,
                    reason: format!("unreadable row: {}", e),
                });
            }
        }
    }
    decoded
}

/// The row's id, or its 1-based position when it has none.
fn row_id(row: &Value, position: usize) -> String {
    match row.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("row {}", position + 1),
    }
}

/// Both lists as loaded from a store, plus the rows that could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Records {
    pub formations: Vec<Formation>,
    pub events: Vec<Event>,
    pub rejected: Vec<SkippedRecord>,
}

/// Fetch both lists. A failed fetch is logged and yields an empty list, so
/// the calendar still shows whatever did load.
pub async fn load_records(store: &dyn RecordStore) -> Records {
    let mut records = Records::default();

    match store.fetch_formation_rows().await {
        Ok(rows) => {
            let decoded = decode_rows(OccurrenceKind::Formation, rows);
            records.formations = decoded.records;
            records.rejected.extend(decoded.rejected);
        }
        Err(e) => warn!(error = %e, "could not load formations"),
    }
    match store.fetch_event_rows().await {
        Ok(rows) => {
            let decoded = decode_rows(OccurrenceKind::Event, rows);
            records.events = decoded.records;
            records.rejected.extend(decoded.rejected);
        }
        Err(e) => warn!(error = %e, "could not load events"),
    }

    info!(
        formations = records.formations.len(),
        events = records.events.len(),
        rejected = records.rejected.len(),
        "records loaded"
    );
    records
}

/// The JSON file behind `LocalStore`. Rows stay undecoded so that saving one
/// record never drops another that failed to read.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    formations: Vec<Value>,
    #[serde(default)]
    events: Vec<Value>,
}

/// Records kept in a single JSON file.
///
/// A missing file reads as empty; it is created on the first save.
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> OdcResult<Document> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            OdcError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write(&self, document: &Document) -> OdcResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(document)
            .map_err(|e| OdcError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn update<T>(&self, change: impl FnOnce(&mut Document) -> OdcResult<T>) -> OdcResult<T> {
        let mut document = self.read()?;
        let result = change(&mut document)?;
        self.write(&document)?;
        Ok(result)
    }
}

fn has_id(row: &Value, id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
}

fn upsert<T: Serialize + Clone>(rows: &mut Vec<Value>, id: &str, item: &T) -> OdcResult<T> {
    let row = serde_json::to_value(item).map_err(|e| OdcError::Serialization(e.to_string()))?;
    match rows.iter().position(|existing| has_id(existing, id)) {
        Some(i) => rows[i] = row,
        None => rows.push(row),
    }
    Ok(item.clone())
}

fn remove(rows: &mut Vec<Value>, id: &str) -> OdcResult<()> {
    let before = rows.len();
    rows.retain(|row| !has_id(row, id));
    if rows.len() == before {
        return Err(OdcError::NotFound(id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl RecordStore for LocalStore {
    async fn fetch_formation_rows(&self) -> OdcResult<Vec<Value>> {
        Ok(self.read()?.formations)
    }

    async fn fetch_event_rows(&self) -> OdcResult<Vec<Value>> {
        Ok(self.read()?.events)
    }

    async fn save_formation(&self, formation: &Formation) -> OdcResult<Formation> {
        self.update(|doc| upsert(&mut doc.formations, &formation.id, formation))
    }

    async fn delete_formation(&self, id: &str) -> OdcResult<()> {
        self.update(|doc| remove(&mut doc.formations, id))
    }

    async fn save_event(&self, event: &Event) -> OdcResult<Event> {
        self.update(|doc| upsert(&mut doc.events, &event.id, event))
    }

    async fn delete_event(&self, id: &str) -> OdcResult<()> {
        self.update(|doc| remove(&mut doc.events, id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fixtures::{d, event, formation};

    struct Broken;

    #[async_trait]
    impl RecordStore for Broken {
        async fn fetch_formation_rows(&self) -> OdcResult<Vec<Value>> {
            Err(OdcError::Store("offline".into()))
        }
        async fn fetch_event_rows(&self) -> OdcResult<Vec<Value>> {
            Ok(vec![serde_json::to_value(event("e", d(2024, 3, 5))).unwrap()])
        }
        async fn save_formation(&self, _: &Formation) -> OdcResult<Formation> {
            Err(OdcError::Store("offline".into()))
        }
        async fn delete_formation(&self, _: &str) -> OdcResult<()> {
            Err(OdcError::Store("offline".into()))
        }
        async fn save_event(&self, _: &Event) -> OdcResult<Event> {
            Err(OdcError::Store("offline".into()))
        }
        async fn delete_event(&self, _: &str) -> OdcResult<()> {
            Err(OdcError::Store("offline".into()))
        }
    }

    #[tokio::test]
    async fn failed_fetch_falls_back_to_empty() {
        let records = load_records(&Broken).await;
        assert!(records.formations.is_empty());
        assert_eq!(records.events.len(), 1);
        assert!(records.rejected.is_empty());
    }

    #[tokio::test]
    async fn local_store_round_trips_and_upserts() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("nested/records.json"));
        assert!(store.fetch_formations().await.unwrap().is_empty());

        let mut f = formation("f", d(2024, 3, 4), d(2024, 3, 6));
        store.save_formation(&f).await.unwrap();
        f.title = "Renamed".into();
        store.save_formation(&f).await.unwrap();
        store.save_event(&event("e", d(2024, 3, 5))).await.unwrap();

        let records = load_records(&store).await;
        assert_eq!(records.formations, vec![f]);
        assert_eq!(records.events.len(), 1);
    }

    #[tokio::test]
    async fn deleting_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("records.json"));
        store.save_event(&event("e", d(2024, 3, 5))).await.unwrap();

        assert!(matches!(store.delete_event("nope").await, Err(OdcError::NotFound(_))));
        store.delete_event("e").await.unwrap();
        assert!(store.fetch_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_row_does_not_hide_its_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let good = serde_json::to_value(formation("good", d(2024, 3, 4), d(2024, 3, 5))).unwrap();
        let mut bad = good.clone();
        bad["id"] = json!("bad");
        bad["time_start"] = Value::Null;
        let mut unknown_city = serde_json::to_value(event("far", d(2024, 3, 6))).unwrap();
        unknown_city["city"] = json!("paris");
        let document = json!({ "formations": [good, bad], "events": [unknown_city] });
        std::fs::write(&path, document.to_string()).unwrap();

        let store = LocalStore::new(&path);
        let records = load_records(&store).await;
        let ids: Vec<_> = records.formations.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);
        assert!(records.events.is_empty());

        let rejected: Vec<_> = records
            .rejected
            .iter()
            .map(|r| (r.kind, r.record_id.as_str()))
            .collect();
        assert_eq!(
            rejected,
            vec![(OccurrenceKind::Formation, "bad"), (OccurrenceKind::Event, "far")]
        );

        // Saving another record keeps the unreadable row on disk.
        store.save_formation(&formation("new", d(2024, 3, 7), d(2024, 3, 7))).await.unwrap();
        assert_eq!(store.fetch_formation_rows().await.unwrap().len(), 3);
        assert_eq!(store.fetch_formations().await.unwrap().len(), 2);
    }

    #[test]
    fn rows_without_an_id_are_named_by_position() {
        let decoded: Decoded<Event> =
            decode_rows(OccurrenceKind::Event, vec![json!({ "title": "no id" })]);
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.rejected[0].record_id, "row 1");
    }
}
