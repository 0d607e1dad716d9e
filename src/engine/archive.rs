use std::{collections::BTreeMap, mem};

use chrono::NaiveDate;

use crate::storage::entities::{ArchivedPom, DayRecord, Pom, PomId, PomStatus, Store};

#[derive(Debug, Clone, PartialEq)]
pub enum ArchiveOutcome {
    /// There was nothing to archive, the store wasn't touched.
    NothingFinished,
    Archived {
        date: NaiveDate,
        accuracy: f64,
        count: usize,
    },
}

/// Moves every finished pom into a new [DayRecord] for `today`. Both the new record and the removal
/// happen on the same `store`, so callers persisting it never observe one without the other.
pub fn archive_day(store: &mut Store, today: NaiveDate) -> ArchiveOutcome {
    if !store
        .poms
        .values()
        .any(|pom| pom.status == PomStatus::Finished)
    {
        return ArchiveOutcome::NothingFinished;
    }

    let (finished, live): (BTreeMap<PomId, Pom>, BTreeMap<PomId, Pom>) = mem::take(&mut store.poms)
        .into_iter()
        .partition(|(_, pom)| pom.status == PomStatus::Finished);
    store.poms = live;

    let accuracy = accuracy(finished.values());
    let count = finished.len();
    store.days.push(DayRecord {
        date: today,
        accuracy,
        poms: finished
            .into_iter()
            .map(|(id, pom)| ArchivedPom { id: Some(id), pom })
            .collect(),
    });

    ArchiveOutcome::Archived {
        date: today,
        accuracy,
        count,
    }
}

/// Sum of `actual - estimate`. Positive values mean that more time was spent than estimated.
pub fn accuracy<'a>(poms: impl IntoIterator<Item = &'a Pom>) -> f64 {
    poms.into_iter().fold(0., |acc, pom| {
        acc - *pom.estimate + pom.actual.map_or(0., |actual| *actual)
    })
}
