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

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::session::Face;
use crate::session::SessionSnapshot;
use crate::tree::FolderView;
use crate::types::card::Card;
use crate::web::state::MutableState;
use crate::web::state::Screen;
use crate::web::state::ServerState;
use crate::web::template::action_button;
use crate::web::template::page_template;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut mutable = state.mutable.lock().unwrap();
    mutable.recover_path();
    let body = if mutable.session.is_active() {
        render_session(&mutable)
    } else {
        let editing: Option<Card> = match &mutable.screen {
            Screen::EditCard(id) => match mutable.tree.find_card(&mutable.path, id) {
                Ok(card) => card.cloned(),
                Err(_) => None,
            },
            Screen::Browse => None,
        };
        match editing {
            Some(card) => render_editor(&card),
            None => {
                mutable.screen = Screen::Browse;
                render_browser(&mutable)
            }
        }
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

pub async fn session_handler(State(state): State<ServerState>) -> Json<SessionSnapshot> {
    let mutable = state.mutable.lock().unwrap();
    Json(mutable.session.snapshot())
}

fn render_browser(mutable: &MutableState) -> Markup {
    // The path was recovered by the caller, so it resolves.
    let view: FolderView = match mutable.tree.resolve(&mutable.path) {
        Ok(view) => view,
        Err(_) => {
            return html! {
                p { "Folder not found." }
            };
        }
    };
    let timer = mutable.settings.timer_duration_seconds().to_string();
    html! {
        div.settings {
            form action="/" method="post" {
                label {
                    "Timer (seconds): "
                    input #timer-input type="number" name="seconds" min="1" value=(timer);
                }
                button type="submit" name="action" value="SaveTimer" { "Save" }
            }
        }
        (render_breadcrumbs(mutable))
        @if let Some(name) = view.name {
            h2.folder-title { (name) }
        }
        ul.folder-list {
            @for folder in view.children {
                li.folder {
                    span.folder-name { (folder.name) }
                    span.controls {
                        (action_button("Open", "Open", &[("id", folder.id.as_str())], "open"))
                        (action_button("DeleteFolder", "Delete", &[("id", folder.id.as_str())], "delete"))
                    }
                }
            }
        }
        form.input-group action="/" method="post" {
            input #new-folder type="text" name="name" placeholder="Add folder (subject/chapter)";
            button type="submit" name="action" value="AddFolder" { "Add" }
        }
        @if !mutable.path.is_root() {
            ul.card-list {
                @for card in view.cards {
                    li.card {
                        span.question { (card.html_summary()) }
                        span.controls {
                            (action_button("Edit", "Edit", &[("id", card.id.as_str())], "edit"))
                            (action_button("DeleteCard", "Delete", &[("id", card.id.as_str())], "delete"))
                        }
                    }
                }
            }
            form.input-group action="/" method="post" {
                input #new-q type="text" name="question" placeholder="Question";
                input #new-a type="text" name="answer" placeholder="Answer";
                button type="submit" name="action" value="AddCard" { "Add" }
            }
        }
        @if !view.cards.is_empty() {
            (action_button("Start", "Start Flashcards", &[], "start"))
        }
    }
}

fn render_breadcrumbs(mutable: &MutableState) -> Markup {
    let segments = mutable.path.segments();
    html! {
        div.breadcrumbs {
            @if segments.is_empty() {
                b { "Root" }
            } @else {
                (action_button("Navigate", "Root", &[("depth", "0")], "crumb"))
                @for (i, segment) in segments.iter().enumerate() {
                    " > "
                    @let depth = (i + 1).to_string();
                    @if i + 1 == segments.len() {
                        b { (segment.name) }
                    } @else {
                        (action_button("Navigate", &segment.name, &[("depth", depth.as_str())], "crumb"))
                    }
                }
            }
        }
    }
}

fn render_editor(card: &Card) -> Markup {
    html! {
        div.flashcard {
            div.label { "Edit Card" }
            form action="/" method="post" {
                input type="hidden" name="id" value=(card.id.as_str());
                input #edit-q type="text" name="question" value=(card.question);
                input #edit-a type="text" name="answer" value=(card.answer);
                button type="submit" name="action" value="SaveCard" { "Save" }
                button.delete type="submit" name="action" value="CancelEdit" { "Cancel" }
            }
        }
    }
}

fn render_session(mutable: &MutableState) -> Markup {
    let session = &mutable.session;
    let status = session.status().as_str();
    let ticket = session.ticket().map(|t| t.to_string()).unwrap_or_default();
    let progress = format!(
        "{} / {}",
        (session.position() + 1).min(session.total()),
        session.total()
    );
    let content: Markup = match session.face() {
        Some(Face::Question(card)) => {
            let seconds = session.seconds_left().unwrap_or(0);
            html! {
                div.flashcard {
                    div.label { "Question:" }
                    div.content .rich-text { (card.html_front()) }
                }
                div #timer .timer { "Time left: " span #seconds { (seconds) } "s" }
                div.controls {
                    (action_button("Reveal", "Show Answer", &[], "reveal"))
                    (action_button("Quit", "Quit", &[], "delete"))
                }
            }
        }
        Some(Face::Answer(card)) => {
            html! {
                div.flashcard {
                    div.label { "Answer:" }
                    div.content .rich-text { (card.html_back()) }
                    @if session.timed_out() {
                        div.timeout { "Time's up!" }
                    }
                }
                div.controls {
                    (action_button("Next", "Next", &[], "next"))
                    (action_button("Quit", "Quit", &[], "delete"))
                }
            }
        }
        None => {
            let summary = session.summary();
            html! {
                div.flashcard .finished {
                    b { "Done!" }
                    @if let Some(summary) = summary {
                        p.summary {
                            (format!(
                                "{} cards in {}s, {} timed out.",
                                summary.card_count, summary.elapsed_seconds, summary.timeout_count
                            ))
                        }
                    }
                }
                div.controls {
                    (action_button("Quit", "Back", &[], "back"))
                }
            }
        }
    };
    html! {
        div.session data-status=(status) data-position=(session.position()) data-ticket=(ticket) {
            @if !session.is_completed() {
                div.progress { (progress) }
            }
            (content)
        }
    }
}
