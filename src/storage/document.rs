use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::fs::operations::{read_locked, write_atomic};

use super::entities::Store;

/// Interface for abstracting storage of the document.
pub trait DocumentStore {
    /// Reads the document. A missing document is created with default contents.
    fn load(&self) -> impl Future<Output = Result<Store>>;

    /// Durably replaces the document. Either the whole document is written or nothing is.
    fn save(&self, store: &Store) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> DocumentStore for T
where
    T::Target: DocumentStore,
{
    fn load(&self) -> impl Future<Output = Result<Store>> {
        self.deref().load()
    }

    fn save(&self, store: &Store) -> impl Future<Output = Result<()>> {
        self.deref().save(store)
    }
}

/// The main realization of [DocumentStore].
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent().filter(|v| !v.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    async fn load(&self) -> Result<Store> {
        debug!("Loading {:?}", self.path);
        let data = match read_locked(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No document at {:?}, creating an empty one", self.path);
                let store = Store::default();
                self.save(&store).await?;
                return Ok(store);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };

        let store: Store = serde_json::from_slice(&data)
            .with_context(|| format!("{:?} is not a valid pom document", self.path))?;
        store
            .validate()
            .with_context(|| format!("{:?} contains an inconsistent pom", self.path))?;
        Ok(store)
    }

    async fn save(&self, store: &Store) -> Result<()> {
        let mut buffer = serde_json::to_vec_pretty(store)?;
        buffer.push(b'\n');
        write_atomic(&self.path, &buffer)
            .await
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        debug!("Saved {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        error::PomError,
        storage::entities::{ArchivedPom, DayRecord, Note, Pom, PomId, PomStatus, Store},
        utils::hours::Hours,
    };

    use super::{DocumentStore, JsonFileStore};

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn sample_store() -> Store {
        let created = Utc.from_utc_datetime(&TEST_START_DATE);
        let mut store = Store::default();

        store.poms.insert(
            PomId::generate(),
            Pom::new("todo".into(), Hours::new_opt(0.5).unwrap(), created),
        );

        let mut active = Pom::new("active".into(), Hours::new_opt(2.).unwrap(), created);
        active.status = PomStatus::Active;
        active.started = Some(created + Duration::minutes(5));
        active.notes.push(Note {
            text: "went for it".into(),
            timestamp: Some(created + Duration::minutes(5)),
        });
        store.poms.insert(PomId::generate(), active);

        let mut finished = Pom::new("finished".into(), Hours::new_opt(1.).unwrap(), created);
        finished.status = PomStatus::Finished;
        finished.started = Some(created);
        finished.finished = Some(created + Duration::minutes(80));
        finished.actual = Hours::new_opt(1.33);
        store.days.push(DayRecord {
            date: TEST_START_DATE.date(),
            accuracy: 0.33,
            poms: vec![ArchivedPom {
                id: Some(PomId::generate()),
                pom: finished,
            }],
        });
        store
    }

    #[tokio::test]
    async fn test_load_creates_default_document() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("metodo.json");
        let storage = JsonFileStore::new(path.clone())?;

        let store = storage.load().await?;

        assert_eq!(store, Store::default());
        let written: serde_json::Value = serde_json::from_slice(&std::fs::read(&path)?)?;
        assert_eq!(written, serde_json::json!({ "poms": {}, "days": [] }));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_load_round_trip_is_stable() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metodo.json");
        let storage = JsonFileStore::new(path.clone())?;
        let store = sample_store();

        storage.save(&store).await?;
        let first = std::fs::read(&path)?;

        let loaded = storage.load().await?;
        assert_eq!(loaded, store);

        storage.save(&loaded).await?;
        assert_eq!(std::fs::read(&path)?, first);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_document_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metodo.json");
        std::fs::write(&path, "{ \"poms\": ")?;
        let storage = JsonFileStore::new(path.clone())?;

        assert!(storage.load().await.is_err());
        // The broken document must not be replaced with a default one.
        assert_eq!(std::fs::read_to_string(&path)?, "{ \"poms\": ");
        Ok(())
    }

    #[tokio::test]
    async fn test_inconsistent_document_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metodo.json");
        let id = PomId::generate();
        std::fs::write(
            &path,
            serde_json::to_vec(&serde_json::json!({
                "poms": {
                    id.to_string(): {
                        "title": "Broken",
                        "estimate": 1,
                        "status": "active",
                        "created": "2018-07-04T00:00:00Z",
                    }
                },
                "days": [],
            }))?,
        )?;
        let storage = JsonFileStore::new(path)?;

        let error = storage.load().await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<PomError>(),
            Some(PomError::Corrupt { id: corrupt, .. }) if *corrupt == id
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_document_with_hours_as_text() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("metodo.json");
        std::fs::write(
            &path,
            r#"{
  "poms": {
    "2c5ea4c0-4067-11e9-8bad-9b1deb4d3b7d": {
      "created": "2019-03-08T09:15:00+01:00",
      "title": "Review",
      "status": "todo",
      "estimate": "2",
      "notes": []
    }
  },
  "days": [
    {
      "date": "2019-03-07",
      "accuracy": -1,
      "poms": [
        {
          "created": "2019-03-07T09:00:00+01:00",
          "title": "Plan",
          "status": "finished",
          "estimate": "2",
          "notes": [{ "notes": "go", "timestamp": "2019-03-07T09:05:00+01:00" }],
          "started": "2019-03-07T09:05:00+01:00",
          "finished": "2019-03-07T10:05:00+01:00",
          "actual": "1.00"
        }
      ]
    }
  ]
}"#,
        )?;
        let storage = JsonFileStore::new(path)?;

        let store = storage.load().await?;

        let pom = store.poms.values().next().unwrap();
        assert_eq!(pom.estimate, Hours::new_opt(2.).unwrap());
        let archived = &store.days[0].poms[0].pom;
        assert_eq!(archived.actual, Hours::new_opt(1.));
        assert_eq!(archived.notes[0].text, "go");
        Ok(())
    }
}
