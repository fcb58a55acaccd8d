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

use crate::error::Fallible;
use crate::session::SessionEngine;
use crate::settings::SessionSettings;
use crate::storage::KeyValueStore;
use crate::storage::save_settings;
use crate::storage::save_tree;
use crate::tree::TreeStore;
use crate::types::id::CardId;
use crate::types::path::Path;
use crate::web::countdown::CountdownTask;

#[derive(Clone)]
pub struct ServerState {
    pub mutable: Arc<Mutex<MutableState>>,
}

/// What the browser shows when no session is running.
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Browse,
    EditCard(CardId),
}

pub struct MutableState {
    pub store: Box<dyn KeyValueStore + Send>,
    pub tree: TreeStore,
    pub settings: SessionSettings,
    /// The folder being viewed.
    pub path: Path,
    pub screen: Screen,
    pub session: SessionEngine,
    /// The background task ticking the session's countdown, if any.
    pub countdown: Option<CountdownTask>,
}

impl ServerState {
    pub fn new(
        store: Box<dyn KeyValueStore + Send>,
        tree: TreeStore,
        settings: SessionSettings,
    ) -> Self {
        Self {
            mutable: Arc::new(Mutex::new(MutableState {
                store,
                tree,
                settings,
                path: Path::root(),
                screen: Screen::Browse,
                session: SessionEngine::new(),
                countdown: None,
            })),
        }
    }
}

impl MutableState {
    pub fn persist_tree(&mut self) -> Fallible<()> {
        save_tree(self.store.as_mut(), &self.tree)
    }

    pub fn persist_settings(&mut self) -> Fallible<()> {
        save_settings(self.store.as_mut(), &self.settings)
    }

    /// Moves the cursor to the nearest folder that still exists.
    pub fn recover_path(&mut self) {
        let valid = self.tree.nearest_valid(&self.path);
        if valid.depth() != self.path.depth() {
            log::warn!(
                "Folder at depth {} no longer exists, showing its nearest ancestor",
                valid.depth() + 1
            );
            self.screen = Screen::Browse;
        }
        self.path = valid;
    }
}
