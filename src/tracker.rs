use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::{
    engine::{
        archive::{archive_day, ArchiveOutcome},
        lifecycle::{
            add_pom, delete_pom, finish_pom, inspect, start_pom, FinishSummary, PomReport,
        },
        query::PomSelector,
    },
    error::PomError,
    storage::{
        document::DocumentStore,
        entities::{Pom, PomId, Store},
    },
    utils::{clock::Clock, hours::Hours, time::local_date},
};

/// Handle that every command goes through. Owns the loaded document and makes sure each change is
/// written before the method returns.
pub struct PomTracker<S: DocumentStore> {
    storage: S,
    document: Store,
    clock: Box<dyn Clock>,
}

impl<S: DocumentStore> PomTracker<S> {
    pub async fn open(storage: S, clock: Box<dyn Clock>) -> Result<Self> {
        let document = storage.load().await?;
        debug!(
            "Loaded {} poms and {} days",
            document.poms.len(),
            document.days.len()
        );
        Ok(Self {
            storage,
            document,
            clock,
        })
    }

    pub fn document(&self) -> &Store {
        &self.document
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.time()
    }

    /// Applies `operation` to a copy of the document and persists the copy in one write. When the
    /// operation fails, or the write does, the document stays as it was. Unchanged documents aren't
    /// written at all.
    async fn commit<T>(
        &mut self,
        operation: impl FnOnce(&mut Store, DateTime<Utc>) -> Result<T, PomError>,
    ) -> Result<T> {
        let mut draft = self.document.clone();
        let value = operation(&mut draft, self.clock.time())?;
        if draft != self.document {
            self.storage.save(&draft).await?;
            self.document = draft;
        }
        Ok(value)
    }

    #[instrument(skip(self))]
    pub async fn add(&mut self, title: &str, estimate: Hours) -> Result<PomId> {
        let id = self
            .commit(|store, now| add_pom(store, title, estimate, now))
            .await?;
        info!("Added pom {id}");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn start(&mut self, id: PomId, notes: Option<&str>) -> Result<()> {
        self.commit(|store, now| start_pom(store, id, notes, now))
            .await?;
        info!("Started pom {id}");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn finish(
        &mut self,
        id: PomId,
        actual: Option<Hours>,
        notes: Option<&str>,
    ) -> Result<FinishSummary> {
        let summary = self
            .commit(|store, now| finish_pom(store, id, actual, notes, now))
            .await?;
        info!("Finished pom {id} in {} hours", *summary.actual);
        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: PomId, confirmed: bool) -> Result<Option<Pom>> {
        let removed = self
            .commit(|store, _| delete_pom(store, id, confirmed))
            .await?;
        if removed.is_some() {
            info!("Deleted pom {id}");
        }
        Ok(removed)
    }

    pub fn inspect(&self, selector: PomSelector) -> Result<PomReport> {
        Ok(inspect(&self.document, selector, self.clock.time())?)
    }

    #[instrument(skip(self))]
    pub async fn archive_day(&mut self) -> Result<ArchiveOutcome> {
        let outcome = self
            .commit(|store, now| Ok(archive_day(store, local_date(now))))
            .await?;
        if let ArchiveOutcome::Archived {
            date,
            accuracy,
            count,
        } = &outcome
        {
            info!("Archived {count} poms for {date} with accuracy {accuracy}");
        }
        Ok(outcome)
    }
}
