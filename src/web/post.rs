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
use axum::response::Redirect;
use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::settings::SessionSettings;
use crate::tree::TreeError;
use crate::types::id::CardId;
use crate::types::id::FolderId;
use crate::web::countdown::sync_countdown;
use crate::web::state::MutableState;
use crate::web::state::Screen;
use crate::web::state::ServerState;

#[derive(Debug, Deserialize, PartialEq)]
enum Action {
    Navigate,
    Open,
    AddFolder,
    DeleteFolder,
    AddCard,
    DeleteCard,
    Edit,
    SaveCard,
    CancelEdit,
    SaveTimer,
    Start,
    Reveal,
    Next,
    Quit,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    id: Option<String>,
    name: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    seconds: Option<String>,
    depth: Option<String>,
}

pub async fn post_handler(State(state): State<ServerState>, Form(form): Form<FormData>) -> Redirect {
    match action_handler(state, form) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to("/")
}

fn action_handler(state: ServerState, form: FormData) -> Fallible<()> {
    let mut guard = state.mutable.lock().unwrap();
    let mutable: &mut MutableState = &mut guard;
    mutable.recover_path();
    let result = apply(mutable, &form);
    // Every session transition must leave the countdown task in step with
    // the engine, including after a failed action.
    sync_countdown(&state.mutable, mutable);
    result
}

fn apply(mutable: &mut MutableState, form: &FormData) -> Fallible<()> {
    log::debug!("Action: {:?}", form.action);
    match form.action {
        Action::Navigate => {
            let depth: usize = match form.depth.as_deref().map(str::parse) {
                Some(Ok(depth)) => depth,
                _ => return fail("invalid depth."),
            };
            mutable.path = mutable.path.truncate(depth);
            mutable.screen = Screen::Browse;
        }
        Action::Open => {
            let id = FolderId::from(required(&form.id)?);
            let view = mutable.tree.resolve(&mutable.path)?;
            let folder = view
                .children
                .iter()
                .find(|f| f.id == id)
                .ok_or(TreeError::NotFound)?;
            mutable.path = mutable.path.child(folder);
            mutable.screen = Screen::Browse;
        }
        Action::AddFolder => {
            let name = form.name.as_deref().unwrap_or_default();
            match mutable.tree.add_folder(&mutable.path, name) {
                Ok(_) => mutable.persist_tree()?,
                Err(TreeError::InvalidInput) => log::debug!("Ignoring empty folder name"),
                Err(e) => return Err(e.into()),
            }
        }
        Action::DeleteFolder => {
            let id = FolderId::from(required(&form.id)?);
            if mutable.tree.delete_folder(&mutable.path, &id)? {
                mutable.persist_tree()?;
            }
        }
        Action::AddCard => {
            let question = form.question.as_deref().unwrap_or_default();
            let answer = form.answer.as_deref().unwrap_or_default();
            match mutable.tree.add_card(&mutable.path, question, answer) {
                Ok(_) => mutable.persist_tree()?,
                Err(TreeError::InvalidInput) => log::debug!("Ignoring incomplete card"),
                Err(e) => return Err(e.into()),
            }
        }
        Action::DeleteCard => {
            let id = CardId::from(required(&form.id)?);
            if mutable.tree.delete_card(&mutable.path, &id)? {
                mutable.persist_tree()?;
            }
        }
        Action::Edit => {
            let id = CardId::from(required(&form.id)?);
            mutable.screen = Screen::EditCard(id);
        }
        Action::SaveCard => {
            let id = CardId::from(required(&form.id)?);
            let question = form.question.as_deref().unwrap_or_default();
            let answer = form.answer.as_deref().unwrap_or_default();
            match mutable.tree.edit_card(&mutable.path, &id, question, answer) {
                Ok(changed) => {
                    if changed {
                        mutable.persist_tree()?;
                    }
                    mutable.screen = Screen::Browse;
                }
                // Keep the editor open.
                Err(TreeError::InvalidInput) => log::debug!("Ignoring incomplete card"),
                Err(e) => return Err(e.into()),
            }
        }
        Action::CancelEdit => {
            mutable.screen = Screen::Browse;
        }
        Action::SaveTimer => {
            let input = form.seconds.as_deref().unwrap_or_default();
            match SessionSettings::parse_input(input) {
                Ok(settings) => {
                    mutable.settings = settings;
                    mutable.persist_settings()?;
                }
                Err(_) => log::debug!("Ignoring invalid timer value {input:?}"),
            }
        }
        Action::Start => {
            let view = mutable.tree.resolve(&mutable.path)?;
            if view.cards.is_empty() {
                log::debug!("Not starting a session without cards");
            } else {
                mutable.session.start(view.cards, &mutable.settings);
            }
        }
        Action::Reveal => {
            mutable.session.reveal();
        }
        Action::Next => {
            mutable.session.next();
        }
        Action::Quit => {
            mutable.session.quit();
            mutable.screen = Screen::Browse;
        }
    }
    Ok(())
}

fn required(field: &Option<String>) -> Fallible<&str> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => fail("missing form field."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Status;
    use crate::storage::MemoryStore;
    use crate::storage::TIMER_KEY;
    use crate::storage::TREE_KEY;
    use crate::tree::TreeStore;
    use crate::types::path::Path;

    fn state() -> ServerState {
        ServerState::new(
            Box::new(MemoryStore::new()),
            TreeStore::new(),
            SessionSettings::default(),
        )
    }

    fn form(action: Action) -> FormData {
        FormData {
            action,
            id: None,
            name: None,
            question: None,
            answer: None,
            seconds: None,
            depth: None,
        }
    }

    fn post(state: &ServerState, form: FormData) -> Fallible<()> {
        action_handler(state.clone(), form)
    }

    fn open_new_folder(state: &ServerState, name: &str) -> Fallible<FolderId> {
        post(
            state,
            FormData {
                name: Some(name.to_string()),
                ..form(Action::AddFolder)
            },
        )?;
        let id = {
            let mutable = state.mutable.lock().unwrap();
            let view = mutable.tree.resolve(&mutable.path)?;
            view.children.last().unwrap().id.clone()
        };
        post(
            state,
            FormData {
                id: Some(id.as_str().to_string()),
                ..form(Action::Open)
            },
        )?;
        Ok(id)
    }

    #[test]
    fn test_action_names() {
        let form: FormData = serde_json::from_str(r#"{"action":"AddFolder","name":"x"}"#).unwrap();
        assert_eq!(form.action, Action::AddFolder);
        assert_eq!(form.name.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn test_folders_and_cards_are_persisted() -> Fallible<()> {
        let state = state();
        open_new_folder(&state, "Math")?;
        post(
            &state,
            FormData {
                question: Some("1+1".to_string()),
                answer: Some("2".to_string()),
                ..form(Action::AddCard)
            },
        )?;
        let mutable = state.mutable.lock().unwrap();
        assert_eq!(mutable.path.depth(), 1);
        let record = mutable.store.get(TREE_KEY)?.unwrap();
        assert_eq!(TreeStore::try_deserialize(&record)?, mutable.tree);
        assert_eq!(mutable.tree.folders()[0].cards[0].question, "1+1");
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_folder_name_is_ignored() -> Fallible<()> {
        let state = state();
        post(
            &state,
            FormData {
                name: Some("   ".to_string()),
                ..form(Action::AddFolder)
            },
        )?;
        let mutable = state.mutable.lock().unwrap();
        assert!(mutable.tree.folders().is_empty());
        assert_eq!(mutable.store.get(TREE_KEY)?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_navigate_to_root() -> Fallible<()> {
        let state = state();
        open_new_folder(&state, "A")?;
        open_new_folder(&state, "B")?;
        post(
            &state,
            FormData {
                depth: Some("1".to_string()),
                ..form(Action::Navigate)
            },
        )?;
        assert_eq!(state.mutable.lock().unwrap().path.depth(), 1);
        post(
            &state,
            FormData {
                depth: Some("0".to_string()),
                ..form(Action::Navigate)
            },
        )?;
        assert!(state.mutable.lock().unwrap().path.is_root());
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_viewed_folder_recovers_path() -> Fallible<()> {
        let state = state();
        let a = open_new_folder(&state, "A")?;
        open_new_folder(&state, "B")?;
        {
            let mut mutable = state.mutable.lock().unwrap();
            mutable.tree.delete_folder(&Path::root(), &a)?;
        }
        post(&state, form(Action::CancelEdit))?;
        assert!(state.mutable.lock().unwrap().path.is_root());
        Ok(())
    }

    #[tokio::test]
    async fn test_timer_setting() -> Fallible<()> {
        let state = state();
        post(
            &state,
            FormData {
                seconds: Some("12".to_string()),
                ..form(Action::SaveTimer)
            },
        )?;
        post(
            &state,
            FormData {
                seconds: Some("0".to_string()),
                ..form(Action::SaveTimer)
            },
        )?;
        post(
            &state,
            FormData {
                seconds: Some("abc".to_string()),
                ..form(Action::SaveTimer)
            },
        )?;
        let mutable = state.mutable.lock().unwrap();
        assert_eq!(mutable.settings.timer_duration_seconds(), 12);
        assert_eq!(mutable.store.get(TIMER_KEY)?, Some("12".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_card() -> Fallible<()> {
        let state = state();
        open_new_folder(&state, "F")?;
        post(
            &state,
            FormData {
                question: Some("q".to_string()),
                answer: Some("a".to_string()),
                ..form(Action::AddCard)
            },
        )?;
        let id = state.mutable.lock().unwrap().tree.folders()[0].cards[0]
            .id
            .clone();
        post(
            &state,
            FormData {
                id: Some(id.as_str().to_string()),
                ..form(Action::Edit)
            },
        )?;
        assert_eq!(
            state.mutable.lock().unwrap().screen,
            Screen::EditCard(id.clone())
        );
        post(
            &state,
            FormData {
                id: Some(id.as_str().to_string()),
                question: Some("Q2".to_string()),
                answer: Some("A2".to_string()),
                ..form(Action::SaveCard)
            },
        )?;
        let mutable = state.mutable.lock().unwrap();
        assert_eq!(mutable.screen, Screen::Browse);
        assert_eq!(mutable.tree.folders()[0].cards[0].question, "Q2");
        Ok(())
    }

    #[tokio::test]
    async fn test_session_actions() -> Fallible<()> {
        let state = state();
        open_new_folder(&state, "F")?;
        for (q, a) in [("A", "1"), ("B", "2")] {
            post(
                &state,
                FormData {
                    question: Some(q.to_string()),
                    answer: Some(a.to_string()),
                    ..form(Action::AddCard)
                },
            )?;
        }
        post(&state, form(Action::Start))?;
        {
            let mutable = state.mutable.lock().unwrap();
            assert_eq!(mutable.session.status(), Status::Presenting);
            assert!(mutable.countdown.is_some());
        }
        post(&state, form(Action::Reveal))?;
        assert!(state.mutable.lock().unwrap().countdown.is_none());
        post(&state, form(Action::Next))?;
        post(&state, form(Action::Reveal))?;
        post(&state, form(Action::Next))?;
        assert_eq!(
            state.mutable.lock().unwrap().session.status(),
            Status::Completed
        );
        post(&state, form(Action::Quit))?;
        let mutable = state.mutable.lock().unwrap();
        assert_eq!(mutable.session.status(), Status::Idle);
        assert!(mutable.countdown.is_none());
        assert_eq!(mutable.tree.folders()[0].cards.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_start_without_cards_does_nothing() -> Fallible<()> {
        let state = state();
        post(&state, form(Action::Start))?;
        assert!(!state.mutable.lock().unwrap().session.is_active());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_id_is_an_error() {
        let state = state();
        assert!(post(&state, form(Action::Open)).is_err());
        assert!(post(&state, form(Action::DeleteFolder)).is_err());
    }
}
