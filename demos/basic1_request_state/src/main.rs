use futures::StreamExt;
use futures_signals::signal::{Mutable, SignalExt};
use requeststate::{execute_into, RequestError, RequestState, RequestStateSignalExt, TextRenderer};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn, Level};

#[derive(Debug, Clone, PartialEq)]
struct Profile {
    name: String,
    followers: u32,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .init();

    info!("==========================================");
    warn!("A. Plain state transitions");

    let states: Vec<RequestState<Profile>> = vec![
        RequestState::NotStarted,
        RequestState::Loading,
        RequestState::success(Profile {
            name: "ada".to_string(),
            followers: 42,
        }),
        RequestState::failure(RequestError::message("profile service unavailable")),
    ];
    let mut renderer = TextRenderer::new();
    for state in states {
        let followers = state.clone().map(|profile| profile.followers).unwrap_or(0);
        let line = state.render(&mut renderer, None, |profile| format!("{} ({} followers)", profile.name, followers));
        info!("Main | {line}");
    }

    info!("==========================================");
    warn!("B. Single-shot execution published into a cell");

    let profile: Mutable<RequestState<Profile>> = Mutable::new(RequestState::NotStarted);
    let mut followers = profile.signal_cloned().unwrap_or_none().to_stream();

    let cell = profile.clone();
    tokio::spawn(async move {
        execute_into(&cell, true, fetch_profile("grace")).await;
        // Background refresh: the previous profile stays visible meanwhile.
        execute_into(&cell, false, fetch_profile("grace")).await;
    });

    while let Some(current) = followers.next().await {
        info!("Main | Current profile: {:?}", current);
        if profile.lock_ref().is_complete() && current.is_some() {
            break;
        }
    }

    sleep(Duration::from_millis(300)).await;
    info!("Main | Refreshed: {:?}", profile.get_cloned());

    info!("==========================================");
    info!("Main | Finish");
}

async fn fetch_profile(name: &str) -> Result<Profile, RequestError> {
    sleep(Duration::from_millis(200)).await;
    Ok(Profile {
        name: name.to_string(),
        followers: 1_000,
    })
}
