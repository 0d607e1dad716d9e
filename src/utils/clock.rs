use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing dates across application. Lifecycle operations
/// never call `Utc::now` directly so that tests can pin time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
