use chrono::{DateTime, Utc};

use crate::storage::entities::{Pom, PomId, PomStatus, Store};

/// An option offered to the user when a pom has to be picked.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub name: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Choice<U> {
        Choice {
            name: self.name,
            value: f(self.value),
        }
    }
}

/// Addresses either a live pom or a pom inside an archived day. Days archived by old versions
/// don't keep ids, so archived poms are addressed by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomSelector {
    Live(PomId),
    Archived { day: usize, position: usize },
}

/// Display oriented projection of a pom.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub title: String,
    pub estimate: String,
    pub status: PomStatus,
    pub notes: String,
    pub started: Option<DateTime<Utc>>,
    pub actual: String,
}

/// Live poms with the given status, oldest first.
pub fn by_status(store: &Store, status: PomStatus) -> Vec<Choice<PomId>> {
    let mut poms = store
        .poms
        .iter()
        .filter(|(_, pom)| pom.status == status)
        .collect::<Vec<_>>();
    poms.sort_by_key(|(id, pom)| (pom.created, **id));
    poms.into_iter()
        .map(|(id, pom)| Choice {
            name: pom.title.clone(),
            value: *id,
        })
        .collect()
}

/// Concatenation of [by_status] for every status in order.
pub fn by_statuses(store: &Store, statuses: &[PomStatus]) -> Vec<Choice<PomId>> {
    statuses
        .iter()
        .flat_map(|status| by_status(store, *status))
        .collect()
}

/// Live poms grouped as todo, active, finished.
pub fn live_poms(store: &Store) -> Vec<&Pom> {
    by_statuses(
        store,
        &[PomStatus::Todo, PomStatus::Active, PomStatus::Finished],
    )
    .into_iter()
    .filter_map(|choice| store.poms.get(&choice.value))
    .collect()
}

pub fn archived_poms(store: &Store) -> impl Iterator<Item = &Pom> {
    store
        .days
        .iter()
        .flat_map(|day| day.poms.iter().map(|archived| &archived.pom))
}

pub fn archived_choices(store: &Store) -> Vec<Choice<PomSelector>> {
    store
        .days
        .iter()
        .enumerate()
        .flat_map(|(day, record)| {
            record
                .poms
                .iter()
                .enumerate()
                .map(move |(position, archived)| Choice {
                    name: format!("[ {} ]", archived.pom.title),
                    value: PomSelector::Archived { day, position },
                })
        })
        .collect()
}

pub fn list_view<'a>(poms: impl IntoIterator<Item = &'a Pom>) -> Vec<ListRow> {
    poms.into_iter()
        .map(|pom| ListRow {
            title: pom.title.clone(),
            estimate: pom.estimate.to_string(),
            status: pom.status,
            notes: pom
                .notes
                .iter()
                .map(|note| note.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            started: pom.started,
            actual: pom.actual.map(|v| v.to_string()).unwrap_or_default(),
        })
        .collect()
}
