// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use cardsmith_core::Date;
use cardsmith_core::StudySession;
use cardsmith_core::export_pdf;
use cardsmith_core::pdf::EXPORT_FAILED;
use cardsmith_core::rng::TinyRng;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use crate::cmd::drill::get::get_handler;
use crate::cmd::drill::post::post_handler;
use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::cmd::export::read_deck;
use crate::error::Fallible;
use crate::utils::CACHE_CONTROL_IMMUTABLE;
use crate::utils::clock_seed;

pub struct ServerConfig {
    pub deck_path: String,
    pub host: String,
    pub port: u16,
    pub shuffle: bool,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let deck = read_deck(&config.deck_path)?;
    if deck.flashcards.is_empty() {
        println!("No cards in deck.");
        return Ok(());
    }

    let mut rng = TinyRng::from_seed(clock_seed());
    let mut session = StudySession::new(deck.flashcards.clone());
    if config.shuffle {
        session.shuffle(&mut rng);
    }

    // Create shutdown channel
    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        port: config.port,
        title: deck.title().map(str::to_string),
        mutable: Arc::new(Mutex::new(MutableState { session, rng })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.route("/deck.pdf", get(pdf_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C or shutdown button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;
    Ok(())
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static str) {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/javascript"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

/// The deck as a printable PDF, in the session's current card order.
async fn pdf_handler(State(state): State<ServerState>) -> Response {
    let cards = state.lock().session.cards().to_vec();
    match export_pdf(&cards, state.title.as_deref(), Date::today()) {
        Ok(pdf) => (
            StatusCode::OK,
            [
                (CONTENT_TYPE, "application/pdf".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", pdf.file_name),
                ),
            ],
            pdf.bytes,
        )
            .into_response(),
        Err(e) => {
            log::error!("PDF export failed on port {}: {e}", state.port);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "text/plain")],
                EXPORT_FAILED,
            )
                .into_response()
        }
    }
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
