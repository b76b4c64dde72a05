//! Fetch/submit controller.
//!
//! Receives commands from presentation layers, runs store calls as independent
//! tasks and emits events back. Overlapping refreshes are neither merged nor
//! cancelled; whichever finishes last is applied last.

use crate::error::Operation;
use crate::model::{AppEvent, NewMovie, StoreConfig};
use crate::store::StoreClient;
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Refresh,
    Submit(NewMovie),
    Quit,
}

fn start_refresh(
    client: &StoreClient,
    event_tx: &UnboundedSender<AppEvent>,
    tasks: &mut JoinSet<()>,
) {
    let _ = event_tx.send(AppEvent::LoadStarted);
    let client = client.clone();
    let event_tx = event_tx.clone();
    tasks.spawn(async move {
        match client.fetch_movies().await {
            Ok(movies) => {
                info!(count = movies.len(), "fetched movies");
                let _ = event_tx.send(AppEvent::LoadSucceeded { movies });
            }
            Err(e) => {
                error!(error = %e, url = client.url(), "fetching movies failed");
                let _ = event_tx.send(AppEvent::LoadFailed {
                    message: e.user_message(Operation::Fetch),
                });
            }
        }
    });
}

fn start_submit(
    client: &StoreClient,
    event_tx: &UnboundedSender<AppEvent>,
    tasks: &mut JoinSet<()>,
    movie: NewMovie,
) {
    let _ = event_tx.send(AppEvent::SubmitStarted {
        title: movie.title.clone(),
    });
    let client = client.clone();
    let event_tx = event_tx.clone();
    tasks.spawn(async move {
        match client.add_movie(&movie).await {
            Ok(()) => {
                info!(title = %movie.title, "movie added");
                let _ = event_tx.send(AppEvent::SubmitSucceeded { title: movie.title });
            }
            Err(e) => {
                error!(error = %e, title = %movie.title, "adding movie failed");
                let _ = event_tx.send(AppEvent::SubmitFailed {
                    message: e.user_message(Operation::Submit),
                    title: movie.title,
                });
            }
        }
    });
}

/// Serve UI commands until Quit or until the command channel closes.
pub(crate) async fn run_controller(
    cfg: &StoreConfig,
    fetch_on_launch: bool,
    event_tx: UnboundedSender<AppEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let client = match StoreClient::new(cfg) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            let _ = event_tx.send(AppEvent::Info(format!("Cannot start: {e}")));
            return Err(anyhow::Error::new(e).context("failed to build HTTP client"));
        }
    };
    let mut tasks = JoinSet::new();

    if fetch_on_launch {
        start_refresh(&client, &event_tx, &mut tasks);
    }

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Refresh) => start_refresh(&client, &event_tx, &mut tasks),
                    Some(UiCommand::Submit(movie)) => {
                        start_submit(&client, &event_tx, &mut tasks, movie)
                    }
                    Some(UiCommand::Quit) | None => {
                        if !tasks.is_empty() {
                            info!(in_flight = tasks.len(), "abandoning in-flight requests");
                        }
                        tasks.abort_all();
                        break;
                    }
                }
            }
            // Reap finished tasks so the set does not grow; park when nothing is running.
            done = async {
                if tasks.is_empty() {
                    futures::future::pending().await
                } else {
                    tasks.join_next().await
                }
            } => {
                if let Some(Err(e)) = done {
                    if !e.is_cancelled() {
                        warn!(error = %e, "request task failed");
                        let _ = event_tx.send(AppEvent::Info(format!("Request task failed: {e}")));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{AppState, View};
    use crate::model::ResponseShape;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Store whose first GET is slow and later GETs answer immediately.
    async fn spawn_store(post_status: StatusCode) -> String {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new().route(
            "/movies.json",
            get(move || {
                let hits = hits.clone();
                async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst);
                    if n == 0 {
                        tokio::time::sleep(Duration::from_millis(200)).await;
                    }
                    Json(json!({"results":[{
                        "episode_id": n + 1,
                        "title": format!("call {n}"),
                        "opening_crawl": "txt",
                        "release_date": "2020-01-01",
                    }]}))
                }
            })
            .post(move |Json(_body): Json<Value>| async move {
                (post_status, Json(json!({"name": "-Nnew"})))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    fn config(base_url: String) -> StoreConfig {
        StoreConfig {
            base_url,
            shape: ResponseShape::Enveloped,
            user_agent: "movies-tui-test".into(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event timeout")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn overlapping_refreshes_do_not_leave_loading() {
        let cfg = config(spawn_store(StatusCode::OK).await);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle =
            tokio::spawn(async move { run_controller(&cfg, false, event_tx, cmd_rx).await });

        cmd_tx.send(UiCommand::Refresh).unwrap();
        cmd_tx.send(UiCommand::Refresh).unwrap();

        let mut state = AppState::default();
        let mut completed = 0;
        let mut last_title = String::new();
        while completed < 2 {
            let ev = next_event(&mut event_rx).await;
            match &ev {
                AppEvent::LoadSucceeded { movies } => {
                    completed += 1;
                    last_title = movies[0].title.clone();
                }
                AppEvent::LoadFailed { .. } => completed += 1,
                _ => {}
            }
            state = state.apply(&ev);
        }

        assert!(!state.is_loading());
        // The slow first request lands last and wins.
        assert_eq!(last_title, "call 0");
        assert!(matches!(state.view(), View::Movies(m) if m[0].title == "call 0"));

        cmd_tx.send(UiCommand::Quit).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn fetch_on_launch_emits_load_cycle() {
        let cfg = config(spawn_store(StatusCode::OK).await);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle =
            tokio::spawn(async move { run_controller(&cfg, true, event_tx, cmd_rx).await });

        assert!(matches!(next_event(&mut event_rx).await, AppEvent::LoadStarted));
        assert!(matches!(
            next_event(&mut event_rx).await,
            AppEvent::LoadSucceeded { ref movies } if movies.len() == 1
        ));

        drop(cmd_tx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn failed_submit_is_reported_and_does_not_refresh() {
        let cfg = config(spawn_store(StatusCode::INTERNAL_SERVER_ERROR).await);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle =
            tokio::spawn(async move { run_controller(&cfg, false, event_tx, cmd_rx).await });

        cmd_tx
            .send(UiCommand::Submit(NewMovie {
                title: "A".into(),
                opening_text: "txt".into(),
                release_date: "2020-01-01".into(),
            }))
            .unwrap();

        assert!(matches!(
            next_event(&mut event_rx).await,
            AppEvent::SubmitStarted { ref title } if title == "A"
        ));
        match next_event(&mut event_rx).await {
            AppEvent::SubmitFailed { title, message } => {
                assert_eq!(title, "A");
                assert_eq!(
                    message,
                    "Could not add movie: server responded 500 Internal Server Error"
                );
            }
            other => panic!("unexpected {other:?}"),
        }

        cmd_tx.send(UiCommand::Quit).unwrap();
        handle.await.unwrap().unwrap();
        while let Ok(ev) = event_rx.try_recv() {
            assert!(!matches!(ev, AppEvent::LoadStarted), "unexpected refresh");
        }
    }

    #[tokio::test]
    async fn unreachable_store_reports_generic_message() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let cfg = config(format!("http://{addr}"));
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle =
            tokio::spawn(async move { run_controller(&cfg, true, event_tx, cmd_rx).await });

        let mut state = AppState::default();
        loop {
            let ev = next_event(&mut event_rx).await;
            state = state.apply(&ev);
            if matches!(ev, AppEvent::LoadFailed { .. }) {
                break;
            }
        }
        assert_eq!(state.view(), View::Error("Something went wrong!"));
        assert!(!state.is_loading());

        cmd_tx.send(UiCommand::Quit).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn client_build_failure_is_reported_and_closes_events() {
        let mut cfg = config("http://127.0.0.1:1".into());
        cfg.user_agent = "bad\nagent".into();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (_cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let res = run_controller(&cfg, true, event_tx, cmd_rx).await;
        assert!(res.is_err());

        match event_rx.recv().await {
            Some(AppEvent::Info(msg)) => assert!(msg.starts_with("Cannot start:")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(event_rx.recv().await.is_none());
    }
}
