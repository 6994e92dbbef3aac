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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use cardsmith_core::StudySession;
use cardsmith_core::markdown::markdown_to_html;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::cmd::drill::state::ServerState;
use crate::cmd::drill::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let body = {
        let mutable = state.lock();
        render_session(&state, &mutable.session)
    };
    let html = page_template(state.title.as_deref(), body);
    (StatusCode::OK, Html(html.into_string()))
}

fn render_session(state: &ServerState, session: &StudySession) -> Markup {
    let (Some(text), Some(tier)) = (session.visible_text(), session.visible_tier()) else {
        return render_empty();
    };
    let position = session.index() + 1;
    let total = session.len();
    let percent = (position * 100) / total;
    let progress_style = format!("width: {percent}%;");
    let (side, label) = if session.is_flipped() {
        ("back", "Definition")
    } else {
        ("front", "Term")
    };
    let title = state.title.as_deref().unwrap_or("Flashcards");
    html! {
        div.root {
            div.header {
                form.header-action action="/" method="post" {
                    input #shuffle type="submit" name="action" value="Shuffle" title="Shuffle the deck. Shortcut: s.";
                }
                div.progress-bar {
                    div.progress-fill style=(progress_style) {}
                }
                form.header-action action="/" method="post" {
                    input #reset type="submit" name="action" value="Reset" title="Go back to the first card. Shortcut: r.";
                }
            }
            div.card-container {
                div.card data-side=(side) {
                    div.card-header {
                        h1 { (title) }
                        span.counter { "Card " (position) " of " (total) }
                    }
                    div.card-content {
                        div.label { (label) }
                        div class={ "rich-text " (tier.practice_class(false)) } {
                            (PreEscaped(markdown_to_html(text)))
                        }
                    }
                }
            }
            div.controls {
                form action="/" method="post" {
                    input #previous type="submit" name="action" value="Previous" title="Previous card. Shortcut: left arrow.";
                    input #flip type="submit" name="action" value="Flip" title="Flip the card. Shortcut: space or enter.";
                    input #next type="submit" name="action" value="Next" title="Next card. Shortcut: right arrow.";
                }
            }
            div.footer {
                a #download href="/deck.pdf" { "Download PDF" }
                form action="/" method="post" {
                    input #shutdown .shutdown-button type="submit" name="action" value="Shutdown" title="Shut down the server";
                }
            }
        }
    }
}

fn render_empty() -> Markup {
    html! {
        div.finished {
            h1 { "This deck has no cards." }
            div.shutdown-container {
                form action="/" method="post" {
                    input #shutdown .shutdown-button type="submit" name="action" value="Shutdown" title="Shut down the server";
                }
            }
        }
    }
}
