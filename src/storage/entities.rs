use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::PomError, utils::hours::Hours};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PomId(Uuid);

impl PomId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for PomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PomId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomStatus {
    Todo,
    Active,
    Finished,
}

impl PomStatus {
    /// Poms only move forward, one state at a time.
    pub fn can_become(self, next: PomStatus) -> bool {
        matches!(
            (self, next),
            (PomStatus::Todo, PomStatus::Active) | (PomStatus::Active, PomStatus::Finished)
        )
    }
}

impl Display for PomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PomStatus::Todo => write!(f, "todo"),
            PomStatus::Active => write!(f, "active"),
            PomStatus::Finished => write!(f, "finished"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(alias = "notes")]
    pub text: String,
    /// Notes written by old versions may lack a timestamp. Such notes are kept but never displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A single unit of estimated work. The id isn't part of the entity, poms are keyed by it in
/// [Store::poms].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pom {
    pub title: String,
    pub estimate: Hours,
    pub status: PomStatus,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Hours>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Pom {
    pub fn new(title: String, estimate: Hours, created: DateTime<Utc>) -> Self {
        Self {
            title,
            estimate,
            status: PomStatus::Todo,
            created,
            started: None,
            finished: None,
            actual: None,
            notes: vec![],
        }
    }

    /// Describes the first violated relation between the status and the timestamps, if any.
    pub fn inconsistency(&self) -> Option<&'static str> {
        let started_expected = matches!(self.status, PomStatus::Active | PomStatus::Finished);
        let finished_expected = self.status == PomStatus::Finished;
        if self.estimate.is_zero() {
            Some("estimate is not positive")
        } else if self.started.is_some() != started_expected {
            Some("start time doesn't match the status")
        } else if self.finished.is_some() != finished_expected {
            Some("finish time doesn't match the status")
        } else if self.actual.is_some() != finished_expected {
            Some("actual time doesn't match the status")
        } else {
            None
        }
    }
}

/// Finished pom as it was at the moment its day got archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedPom {
    /// Missing for days archived by old versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PomId>,
    #[serde(flatten)]
    pub pom: Pom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// Sum of `actual - estimate`. Positive means the day took longer than planned.
    pub accuracy: f64,
    pub poms: Vec<ArchivedPom>,
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Store {
    #[serde(default)]
    pub poms: BTreeMap<PomId, Pom>,
    #[serde(default)]
    pub days: Vec<DayRecord>,
}

impl Store {
    pub fn get(&self, id: PomId) -> Result<&Pom, PomError> {
        self.poms.get(&id).ok_or(PomError::UnknownPom(id))
    }

    pub fn get_mut(&mut self, id: PomId) -> Result<&mut Pom, PomError> {
        self.poms.get_mut(&id).ok_or(PomError::UnknownPom(id))
    }

    /// Live poms are checked only. Archived ones are historical and shown as is.
    pub fn validate(&self) -> Result<(), PomError> {
        for (id, pom) in &self.poms {
            if let Some(reason) = pom.inconsistency() {
                return Err(PomError::Corrupt { id: *id, reason });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use serde_json::json;

    use crate::{error::PomError, utils::hours::Hours};

    use super::{Pom, PomId, PomStatus, Store};

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn hours(value: f64) -> Hours {
        Hours::new_opt(value).unwrap()
    }

    #[test]
    fn transitions_only_move_forward() {
        use PomStatus::*;
        assert!(Todo.can_become(Active));
        assert!(Active.can_become(Finished));
        assert!(!Todo.can_become(Finished));
        assert!(!Active.can_become(Active));
        assert!(!Finished.can_become(Active));
        assert!(!Finished.can_become(Todo));
        assert!(!Active.can_become(Todo));
    }

    #[test]
    fn empty_document_has_default_shape() -> Result<()> {
        assert_eq!(
            serde_json::to_value(Store::default())?,
            json!({ "poms": {}, "days": [] })
        );
        assert_eq!(serde_json::from_value::<Store>(json!({}))?, Store::default());
        Ok(())
    }

    #[test]
    fn pom_serializes_without_absent_fields() -> Result<()> {
        let created = Utc.from_utc_datetime(&TEST_START_DATE);
        let pom = Pom::new("Write spec".into(), hours(2.), created);
        assert_eq!(
            serde_json::to_value(&pom)?,
            json!({
                "title": "Write spec",
                "estimate": 2.0,
                "status": "todo",
                "created": "2018-07-04T00:00:00Z",
                "notes": [],
            })
        );
        Ok(())
    }

    #[test]
    fn reads_documents_with_legacy_notes_and_archives() -> Result<()> {
        let id = PomId::generate();
        let document = json!({
            "poms": {
                id.to_string(): {
                    "title": "Old",
                    "estimate": 1,
                    "status": "active",
                    "created": "2018-07-04T10:00:00-07:00",
                    "started": "2018-07-04T11:00:00-07:00",
                    "notes": [{ "notes": "no timestamp" }],
                }
            },
            "days": [{
                "date": "2018-07-03",
                "accuracy": -0.5,
                "poms": [{
                    "title": "Archived",
                    "estimate": 1.5,
                    "status": "finished",
                    "created": "2018-07-03T10:00:00Z",
                    "started": "2018-07-03T10:00:00Z",
                    "finished": "2018-07-03T11:00:00Z",
                    "actual": 1,
                }]
            }]
        });
        let store = serde_json::from_value::<Store>(document)?;
        let pom = store.get(id)?;
        assert_eq!(pom.notes[0].text, "no timestamp");
        assert_eq!(pom.notes[0].timestamp, None);
        assert_eq!(
            pom.created,
            Utc.from_utc_datetime(&TEST_START_DATE.date().and_hms_opt(17, 0, 0).unwrap())
        );
        assert_eq!(store.days[0].poms[0].id, None);
        assert_eq!(store.days[0].poms[0].pom.actual, Some(hours(1.)));
        store.validate()?;
        Ok(())
    }

    #[test]
    fn reads_hours_stored_as_text() -> Result<()> {
        let live = PomId::generate();
        let document = json!({
            "poms": {
                live.to_string(): {
                    "title": "Typed in",
                    "estimate": "2",
                    "status": "finished",
                    "created": "2018-07-04T10:00:00-07:00",
                    "started": "2018-07-04T11:00:00-07:00",
                    "finished": "2018-07-04T12:00:00-07:00",
                    "actual": "1.00",
                    "notes": [],
                }
            },
            "days": [{
                "date": "2018-07-03",
                "accuracy": -1,
                "poms": [{
                    "title": "Archived",
                    "estimate": "2",
                    "status": "finished",
                    "created": "2018-07-03T10:00:00Z",
                    "started": "2018-07-03T10:00:00Z",
                    "finished": "2018-07-03T11:00:00Z",
                    "actual": "1.00",
                    "notes": [],
                }]
            }]
        });
        let store = serde_json::from_value::<Store>(document)?;
        store.validate()?;

        let pom = store.get(live)?;
        assert_eq!(pom.estimate, hours(2.));
        assert_eq!(pom.actual, Some(hours(1.)));
        let archived = &store.days[0].poms[0].pom;
        assert_eq!(archived.estimate, hours(2.));
        assert_eq!(archived.actual, Some(hours(1.)));

        let saved = serde_json::to_value(&store)?;
        assert_eq!(saved["poms"][live.to_string()]["estimate"], json!(2.0));
        assert_eq!(saved["days"][0]["poms"][0]["actual"], json!(1.0));
        Ok(())
    }

    #[test]
    fn validation_catches_status_mismatch() {
        let created = Utc.from_utc_datetime(&TEST_START_DATE);
        let id = PomId::generate();
        let mut pom = Pom::new("Broken".into(), hours(1.), created);
        pom.status = PomStatus::Finished;
        pom.started = Some(created);

        let mut store = Store::default();
        store.poms.insert(id, pom);

        assert_eq!(
            store.validate(),
            Err(PomError::Corrupt {
                id,
                reason: "finish time doesn't match the status"
            })
        );
    }

    #[test]
    fn validation_rejects_zero_estimate() {
        let created = Utc.from_utc_datetime(&TEST_START_DATE);
        let id = PomId::generate();
        let mut store = Store::default();
        store
            .poms
            .insert(id, Pom::new("Free".into(), hours(0.), created));

        assert!(matches!(store.validate(), Err(PomError::Corrupt { .. })));
    }
}
