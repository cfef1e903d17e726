mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{error, info, warn};

use crate::{
    config::MapSettings,
    engine::Engine,
    geolocation::{BrowserGeolocation, PositionReport},
    state::{AppState, Transition, WithdrawAmount},
    view::StateView,
};

#[derive(Clone)]
struct SharedState {
    broadcaster: broadcast::Sender<String>,
    app: Arc<Mutex<AppState>>,
    geolocation: BrowserGeolocation,
    map: MapSettings,
}

impl SharedState {
    fn view(&self) -> StateView {
        let app = self.app.lock().expect("app state lock poisoned");
        StateView::from_state(&app, &self.map)
    }

    /// Applies `transition` and pushes the new view to every subscriber.
    fn apply(&self, transition: Transition) -> StateView {
        let view = {
            let mut app = self.app.lock().expect("app state lock poisoned");
            app.apply(transition);
            StateView::from_state(&app, &self.map)
        };
        match serde_json::to_string(&view) {
            Ok(payload) => {
                let _ = self.broadcaster.send(payload);
            }
            Err(err) => warn!("unable to encode state update: {err}"),
        }
        view
    }
}

pub struct WebServerConfig {
    pub engine: Engine,
    pub map: MapSettings,
    pub host: String,
    pub port: u16,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        mut engine,
        map,
        host,
        port,
    } = config;

    let (tx, _) = broadcast::channel::<String>(64);
    let state = SharedState {
        broadcaster: tx,
        app: Arc::new(Mutex::new(AppState::new())),
        geolocation: BrowserGeolocation::new(),
        map,
    };

    let locator = state.clone();
    tokio::spawn(async move {
        let provider = locator.geolocation.clone();
        for transition in engine.locate(&provider).await {
            locator.apply(transition);
        }
        info!("location flow settled");
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/assets/:name", get(asset))
        .route("/api/config", get(map_config))
        .route("/api/state", get(latest_state))
        .route("/api/events", get(stream_events))
        .route("/api/position", post(report_position))
        .route("/api/amount", post(change_amount))
        .with_state(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!("ATM finder live at http://{addr} (Ctrl+C to stop)");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("unable to bind {addr}"))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("unable to listen for shutdown signal: {err}");
    }
    info!("shutting down web UI");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn asset(Path(name): Path<String>) -> Response {
    match assets::lookup(&name) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapConfigResponse {
    api_key: Option<String>,
    map_id: String,
    zoom: u8,
}

async fn map_config(State(state): State<SharedState>) -> Json<MapConfigResponse> {
    Json(MapConfigResponse {
        api_key: state.map.api_key.clone(),
        map_id: state.map.map_id.clone(),
        zoom: state.map.zoom,
    })
}

async fn latest_state(State(state): State<SharedState>) -> Json<StateView> {
    Json(state.view())
}

async fn report_position(
    State(state): State<SharedState>,
    Json(report): Json<PositionReport>,
) -> StatusCode {
    if state.geolocation.report(report) {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CONFLICT
    }
}

#[derive(Deserialize)]
struct AmountRequest {
    amount: String,
}

async fn change_amount(
    State(state): State<SharedState>,
    Json(request): Json<AmountRequest>,
) -> Json<StateView> {
    let amount = WithdrawAmount::coerce(&request.amount);
    Json(state.apply(Transition::AmountChanged(amount)))
}

async fn stream_events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
