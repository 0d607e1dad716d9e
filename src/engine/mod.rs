//! Rules for poms. Everything in here works on a borrowed [Store](crate::storage::entities::Store)
//! and takes the current time as an argument, so none of it touches the disk or the clock.

pub mod archive;
pub mod lifecycle;
pub mod query;
