use anyhow::Result;
use tracing::debug;

use crate::{
    engine::query::{
        archived_choices, archived_poms, by_status, by_statuses, list_view, live_poms, PomSelector,
    },
    storage::{document::DocumentStore, entities::PomStatus},
    tracker::PomTracker,
    utils::hours::Hours,
};

use super::{
    output::{
        render_archive_outcome, render_finish_summary, render_list, render_report, MSG_NO_POMS,
    },
    prompt,
};

const ALL_STATUSES: [PomStatus; 3] = [PomStatus::Todo, PomStatus::Active, PomStatus::Finished];

pub async fn add<S: DocumentStore>(
    tracker: &mut PomTracker<S>,
    title: Option<String>,
    estimate: Option<Hours>,
) -> Result<()> {
    let title = match title {
        Some(title) => title,
        None => prompt::text("Title", false).await?,
    };
    let estimate = match estimate {
        Some(estimate) => estimate,
        None => match prompt::hours("Estimate (hours)", false).await? {
            Some(estimate) => estimate,
            None => return Ok(()),
        },
    };
    tracker.add(&title, estimate).await?;
    Ok(())
}

pub async fn start<S: DocumentStore>(
    tracker: &mut PomTracker<S>,
    notes: Option<String>,
) -> Result<()> {
    let choices = by_status(tracker.document(), PomStatus::Todo);
    if choices.is_empty() {
        println!("{MSG_NO_POMS}");
        return Ok(());
    }
    let Some(id) = prompt::select("Choose", choices).await? else {
        return Ok(());
    };
    let notes = match notes {
        Some(notes) => notes,
        None => prompt::text("Notes?", true).await?,
    };
    tracker.start(id, Some(&notes)).await
}

pub async fn finish<S: DocumentStore>(
    tracker: &mut PomTracker<S>,
    actual: Option<Hours>,
    notes: Option<String>,
) -> Result<()> {
    let choices = by_status(tracker.document(), PomStatus::Active);
    if choices.is_empty() {
        println!("{MSG_NO_POMS}");
        return Ok(());
    }
    let Some(id) = prompt::select("Choose", choices).await? else {
        return Ok(());
    };
    let actual = match actual {
        Some(actual) => Some(actual),
        None => prompt::hours("Actual (hours)", true).await?,
    };
    let notes = match notes {
        Some(notes) => notes,
        None => prompt::text("Notes?", true).await?,
    };

    let summary = tracker.finish(id, actual, Some(&notes)).await?;
    println!("{}", render_finish_summary(&summary));
    Ok(())
}

pub async fn delete<S: DocumentStore>(tracker: &mut PomTracker<S>, yes: bool) -> Result<()> {
    let choices = by_statuses(tracker.document(), &ALL_STATUSES);
    if choices.is_empty() {
        println!("{MSG_NO_POMS}");
        return Ok(());
    }
    let Some(id) = prompt::select("Choose", choices).await? else {
        return Ok(());
    };
    let sure = yes || prompt::confirm("Are you sure?").await?;
    debug!("Deleting {id}, confirmed: {sure}");
    tracker.delete(id, sure).await?;
    Ok(())
}

pub async fn info<S: DocumentStore>(tracker: &PomTracker<S>, all: bool) -> Result<()> {
    let mut choices = by_statuses(tracker.document(), &ALL_STATUSES)
        .into_iter()
        .map(|choice| choice.map(PomSelector::Live))
        .collect::<Vec<_>>();
    if all {
        choices.extend(archived_choices(tracker.document()));
    }
    if choices.is_empty() {
        println!("{MSG_NO_POMS}");
        return Ok(());
    }
    let Some(selector) = prompt::select("Choose", choices).await? else {
        return Ok(());
    };
    println!("{}", render_report(&tracker.inspect(selector)?));
    Ok(())
}

pub fn list<S: DocumentStore>(tracker: &PomTracker<S>, all: bool) {
    let document = tracker.document();
    let mut poms = live_poms(document);
    if all {
        poms.extend(archived_poms(document));
    }
    println!("{}", render_list(&list_view(poms), tracker.now()));
}

pub async fn archive<S: DocumentStore>(tracker: &mut PomTracker<S>) -> Result<()> {
    let outcome = tracker.archive_day().await?;
    println!("{}", render_archive_outcome(&outcome));
    Ok(())
}
