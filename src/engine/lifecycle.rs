use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    error::PomError,
    storage::entities::{Note, Pom, PomId, PomStatus, Store},
    utils::{
        hours::Hours,
        time::{
            date_to_record_name, difference, elapsed_hours, format_full, humanize, total_hours,
        },
    },
};

use super::query::PomSelector;

/// What the user sees once a pom is finished.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishSummary {
    pub title: String,
    pub actual: Hours,
}

/// Full description of a single pom.
#[derive(Debug, Clone, PartialEq)]
pub struct PomReport {
    pub title: String,
    pub status: PomStatus,
    pub created: DateTime<Utc>,
    pub estimate: Hours,
    /// Only for active poms.
    pub elapsed: Option<f64>,
    /// Only for finished poms.
    pub actual: Option<Hours>,
    /// `estimate - actual`, only for finished poms.
    pub difference: Option<f64>,
    pub started: Option<DateTime<Utc>>,
    pub finished: Option<DateTime<Utc>>,
    /// Notes that carry a timestamp, in the order they were written.
    pub notes: Vec<(DateTime<Utc>, String)>,
    /// Day the pom was archived on.
    pub archived: Option<NaiveDate>,
}

impl PomReport {
    fn new(pom: &Pom, now: DateTime<Utc>, archived: Option<NaiveDate>) -> Self {
        let finished = pom.status == PomStatus::Finished;
        Self {
            title: pom.title.clone(),
            status: pom.status,
            created: pom.created,
            estimate: pom.estimate,
            elapsed: pom
                .started
                .filter(|_| pom.status == PomStatus::Active)
                .map(|started| elapsed_hours(started, now)),
            actual: pom.actual.filter(|_| finished),
            difference: pom
                .actual
                .filter(|_| finished)
                .map(|actual| difference(*pom.estimate, *actual)),
            started: pom.started,
            finished: pom.finished,
            notes: pom
                .notes
                .iter()
                .filter_map(|note| note.timestamp.map(|time| (time, note.text.clone())))
                .collect(),
            archived,
        }
    }

    /// Labeled, human readable rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Created", format_full(self.created)),
            ("Title", self.title.clone()),
            ("Status", self.status.to_string()),
            ("Original Estimate", self.estimate.to_string()),
        ];
        if let Some(elapsed) = self.elapsed {
            rows.push(("Elapsed Time", humanize(elapsed)));
        }
        if let Some(actual) = self.actual {
            rows.push(("Actual Time", actual.to_string()));
        }
        if let Some(difference) = self.difference {
            rows.push(("Difference", humanize(difference)));
        }
        if let Some(started) = self.started {
            rows.push(("Started", format_full(started)));
        }
        if let Some(finished) = self.finished {
            rows.push(("Finished", format_full(finished)));
        }
        if let Some(archived) = self.archived {
            rows.push(("Archived", date_to_record_name(archived)));
        }
        rows
    }
}

pub fn add_pom(
    store: &mut Store,
    title: &str,
    estimate: Hours,
    now: DateTime<Utc>,
) -> Result<PomId, PomError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PomError::EmptyTitle);
    }
    if estimate.is_zero() {
        return Err(PomError::InvalidEstimate(*estimate));
    }

    let id = PomId::generate();
    store.poms.insert(id, Pom::new(title.to_string(), estimate, now));
    Ok(id)
}

pub fn start_pom(
    store: &mut Store,
    id: PomId,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), PomError> {
    let pom = store.get_mut(id)?;
    check_transition(id, pom, PomStatus::Active)?;

    pom.status = PomStatus::Active;
    pom.started = Some(now);
    push_note(pom, notes, now);
    Ok(())
}

/// Without `actual` the time between start and now is used.
pub fn finish_pom(
    store: &mut Store,
    id: PomId,
    actual: Option<Hours>,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<FinishSummary, PomError> {
    let pom = store.get_mut(id)?;
    check_transition(id, pom, PomStatus::Finished)?;
    let started = pom.started.ok_or(PomError::Corrupt {
        id,
        reason: "active pom has no start time",
    })?;

    let actual = match actual {
        Some(actual) => actual,
        // Clock going backwards shouldn't produce negative durations
        None => Hours::try_from(total_hours(started, now).max(0.))?,
    };

    pom.status = PomStatus::Finished;
    pom.finished = Some(now);
    pom.actual = Some(actual);
    push_note(pom, notes, now);

    Ok(FinishSummary {
        title: pom.title.clone(),
        actual,
    })
}

/// Removes the pom only when `confirmed`, otherwise nothing happens.
pub fn delete_pom(store: &mut Store, id: PomId, confirmed: bool) -> Result<Option<Pom>, PomError> {
    if !confirmed {
        return Ok(None);
    }
    store
        .poms
        .remove(&id)
        .map(Some)
        .ok_or(PomError::UnknownPom(id))
}

pub fn inspect_pom(store: &Store, id: PomId, now: DateTime<Utc>) -> Result<PomReport, PomError> {
    Ok(PomReport::new(store.get(id)?, now, None))
}

pub fn inspect(
    store: &Store,
    selector: PomSelector,
    now: DateTime<Utc>,
) -> Result<PomReport, PomError> {
    match selector {
        PomSelector::Live(id) => inspect_pom(store, id, now),
        PomSelector::Archived { day, position } => {
            let record = store.days.get(day);
            let archived = record
                .and_then(|record| record.poms.get(position))
                .ok_or(PomError::UnknownArchivedPom { day, position })?;
            Ok(PomReport::new(
                &archived.pom,
                now,
                record.map(|record| record.date),
            ))
        }
    }
}

fn check_transition(id: PomId, pom: &Pom, next: PomStatus) -> Result<(), PomError> {
    if pom.status.can_become(next) {
        Ok(())
    } else {
        Err(PomError::InvalidTransition {
            id,
            from: pom.status,
            to: next,
        })
    }
}

fn push_note(pom: &mut Pom, notes: Option<&str>, now: DateTime<Utc>) {
    if let Some(text) = notes.map(str::trim).filter(|v| !v.is_empty()) {
        pom.notes.push(Note {
            text: text.to_string(),
            timestamp: Some(now),
        });
    }
}
