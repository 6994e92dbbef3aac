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

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use serde::Deserialize;

use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;

#[derive(Clone, Copy, Debug, Deserialize)]
pub enum Action {
    Flip,
    Next,
    Previous,
    Shuffle,
    Reset,
    Shutdown,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Response {
    log::debug!("Action: {:?}", form.action);
    {
        let mut mutable = state.lock();
        let mutable = &mut *mutable;
        match form.action {
            Action::Flip => mutable.session.flip(),
            Action::Next => mutable.session.next(),
            Action::Previous => mutable.session.prev(),
            Action::Shuffle => mutable.session.shuffle(&mut mutable.rng),
            Action::Reset => mutable.session.reset(),
            Action::Shutdown => {}
        }
    }
    if let Action::Shutdown = form.action {
        state.shutdown();
        let body = maud::html! {
            div.finished {
                h1 { "Session Ended" }
                div.summary { "You can close this tab." }
            }
        };
        return Html(page_template(state.title.as_deref(), body).into_string()).into_response();
    }
    Redirect::to("/").into_response()
}
