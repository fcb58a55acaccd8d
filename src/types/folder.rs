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

use serde::Deserialize;
use serde::Serialize;

use crate::types::card::Card;
use crate::types::id::FolderId;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    /// Subfolders, in insertion order.
    #[serde(default)]
    pub children: Vec<Folder>,
    /// Cards, in insertion order.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Folder {
    /// Creates an empty folder with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FolderId::fresh(),
            name: name.into().trim().to_string(),
            children: Vec::new(),
            cards: Vec::new(),
        }
    }

    /// Visits this folder and all its descendants, depth-first.
    #[cfg(test)]
    pub fn walk(&self, f: &mut impl FnMut(&Folder)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name() {
        let folder = Folder::new("  Physics ");
        assert_eq!(folder.name, "Physics");
        assert!(folder.id.as_str().starts_with('_'));
    }

    #[test]
    fn test_missing_sequences_default_to_empty() {
        let folder: Folder = serde_json::from_str(r#"{"id":"_x","name":"X"}"#).unwrap();
        assert!(folder.children.is_empty());
        assert!(folder.cards.is_empty());
    }
}
