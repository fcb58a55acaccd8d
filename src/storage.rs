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

#[cfg(test)]
use std::collections::HashMap;

use crate::error::Fallible;
use crate::settings::SessionSettings;
use crate::tree::TreeStore;

/// Key of the tree record.
pub const TREE_KEY: &str = "flashcards_data";

/// Key of the settings record.
pub const TIMER_KEY: &str = "flashcards_timer";

/// A durable store of string records addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Fallible<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Fallible<()>;
}

/// A store that lives only as long as the process.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// What loading a record found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// The record was present and well-formed.
    Intact,
    /// The record was absent; the default was used.
    Missing,
    /// The record was unreadable or malformed; the default was used.
    Recovered,
}

pub struct Loaded<T> {
    pub value: T,
    pub status: RecordStatus,
}

/// Loads the tree. Never fails: a missing or corrupt record gives an empty
/// tree.
pub fn load_tree<S: KeyValueStore + ?Sized>(store: &S) -> Loaded<TreeStore> {
    let record = match store.get(TREE_KEY) {
        Ok(record) => record,
        Err(e) => {
            log::warn!("Failed to read the tree record: {e}");
            return Loaded {
                value: TreeStore::new(),
                status: RecordStatus::Recovered,
            };
        }
    };
    match record {
        None => Loaded {
            value: TreeStore::new(),
            status: RecordStatus::Missing,
        },
        Some(record) => match TreeStore::try_deserialize(&record) {
            Ok(tree) => Loaded {
                value: tree,
                status: RecordStatus::Intact,
            },
            Err(_) => Loaded {
                value: TreeStore::deserialize(&record),
                status: RecordStatus::Recovered,
            },
        },
    }
}

pub fn save_tree<S: KeyValueStore + ?Sized>(store: &mut S, tree: &TreeStore) -> Fallible<()> {
    let record = tree.serialize()?;
    store.set(TREE_KEY, &record)
}

/// Loads the settings. Never fails: a missing or malformed record gives the
/// default timer.
pub fn load_settings<S: KeyValueStore + ?Sized>(store: &S) -> Loaded<SessionSettings> {
    match store.get(TIMER_KEY) {
        Ok(None) => Loaded {
            value: SessionSettings::default(),
            status: RecordStatus::Missing,
        },
        Ok(Some(record)) => match SessionSettings::parse_input(&record) {
            Ok(settings) => Loaded {
                value: settings,
                status: RecordStatus::Intact,
            },
            Err(_) => Loaded {
                value: SessionSettings::from_record(Some(&record)),
                status: RecordStatus::Recovered,
            },
        },
        Err(e) => {
            log::warn!("Failed to read the timer record: {e}");
            Loaded {
                value: SessionSettings::default(),
                status: RecordStatus::Recovered,
            }
        }
    }
}

pub fn save_settings<S: KeyValueStore + ?Sized>(
    store: &mut S,
    settings: &SessionSettings,
) -> Fallible<()> {
    store.set(TIMER_KEY, &settings.to_record())
}
