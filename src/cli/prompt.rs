//! Interactive questions. dialoguer blocks the thread while waiting for the user, so every prompt is
//! moved onto the blocking pool.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use tokio::task::spawn_blocking;

use crate::{engine::query::Choice, utils::hours::Hours};

/// Lets the user pick one of `choices`. `None` when the user escapes.
pub async fn select<T>(prompt: &'static str, choices: Vec<Choice<T>>) -> Result<Option<T>> {
    let names = choices.iter().map(|v| v.name.clone()).collect::<Vec<_>>();
    let index = spawn_blocking(move || {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&names)
            .default(0)
            .interact_opt()
    })
    .await??;

    Ok(index.and_then(|index| choices.into_iter().nth(index).map(|v| v.value)))
}

pub async fn text(prompt: &'static str, allow_empty: bool) -> Result<String> {
    let value = spawn_blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()
    })
    .await??;
    Ok(value)
}

/// Asks for an amount of hours. With `optional` an empty answer gives `None`.
pub async fn hours(prompt: &'static str, optional: bool) -> Result<Option<Hours>> {
    let value = spawn_blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(optional)
            .validate_with(|input: &String| -> Result<(), String> {
                if input.trim().is_empty() {
                    return Ok(());
                }
                input
                    .parse::<Hours>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
    })
    .await??;

    if value.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.parse()?))
    }
}

pub async fn confirm(prompt: &'static str) -> Result<bool> {
    let value = spawn_blocking(move || {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
    })
    .await??;
    Ok(value)
}
