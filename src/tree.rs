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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::folder::Folder;
use crate::types::id::CardId;
use crate::types::id::FolderId;
use crate::types::path::Path;
use crate::types::path::PathSegment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// A path segment names a folder that no longer exists.
    NotFound,
    /// The input was empty after trimming, or targets the root's cards.
    InvalidInput,
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::NotFound => write!(f, "folder not found"),
            TreeError::InvalidInput => write!(f, "invalid input"),
        }
    }
}

impl Error for TreeError {}

impl From<TreeError> for ErrorReport {
    fn from(value: TreeError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

/// A read-only view of a resolved folder. The root has no name, and never
/// holds cards.
pub struct FolderView<'a> {
    pub name: Option<&'a str>,
    pub children: &'a [Folder],
    pub cards: &'a [Card],
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub folder_count: usize,
    pub card_count: usize,
    pub max_depth: usize,
}

/// The folder forest. The top-level sequence holds the children of the
/// implicit root.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TreeStore {
    folders: Vec<Folder>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self {
            folders: Vec::new(),
        }
    }

    pub fn from_folders(folders: Vec<Folder>) -> Self {
        Self { folders }
    }

    #[cfg(test)]
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn resolve(&self, path: &Path) -> Result<FolderView<'_>, TreeError> {
        let mut folder: Option<&Folder> = None;
        for segment in path.segments() {
            let children = match folder {
                Some(f) => &f.children,
                None => &self.folders,
            };
            let next = children
                .iter()
                .find(|f| f.id == segment.id)
                .ok_or(TreeError::NotFound)?;
            folder = Some(next);
        }
        let view = match folder {
            Some(f) => FolderView {
                name: Some(f.name.as_str()),
                children: &f.children,
                cards: &f.cards,
            },
            None => FolderView {
                name: None,
                children: &self.folders,
                cards: &[],
            },
        };
        Ok(view)
    }

    /// The longest prefix of `path` that still resolves. Segment names are
    /// refreshed from the tree.
    pub fn nearest_valid(&self, path: &Path) -> Path {
        let mut valid = Path::root();
        let mut children: &[Folder] = &self.folders;
        for segment in path.segments() {
            match children.iter().find(|f| f.id == segment.id) {
                Some(folder) => {
                    valid = valid.child(folder);
                    children = &folder.children;
                }
                None => break,
            }
        }
        valid
    }

    /// Builds a path from a chain of folder ids, looking up each name.
    #[cfg(test)]
    pub fn path_from_ids(&self, ids: &[FolderId]) -> Result<Path, TreeError> {
        let mut path = Path::root();
        let mut children: &[Folder] = &self.folders;
        for id in ids {
            let folder = children
                .iter()
                .find(|f| &f.id == id)
                .ok_or(TreeError::NotFound)?;
            path = path.child(folder);
            children = &folder.children;
        }
        Ok(path)
    }

    pub fn add_folder(&mut self, parent: &Path, name: &str) -> Result<FolderId, TreeError> {
        let name = name.trim();
        let children = self.children_mut(parent)?;
        if name.is_empty() {
            return Err(TreeError::InvalidInput);
        }
        let folder = Folder::new(name);
        let id = folder.id.clone();
        log::debug!("Adding folder {id} ({name:?})");
        children.push(folder);
        Ok(id)
    }

    /// Removes a child folder and its entire subtree. Returns whether a
    /// folder was removed.
    pub fn delete_folder(&mut self, parent: &Path, id: &FolderId) -> Result<bool, TreeError> {
        let children = self.children_mut(parent)?;
        let before = children.len();
        children.retain(|f| &f.id != id);
        let removed = children.len() != before;
        if removed {
            log::debug!("Deleted folder {id}");
        }
        Ok(removed)
    }

    pub fn add_card(
        &mut self,
        parent: &Path,
        question: &str,
        answer: &str,
    ) -> Result<CardId, TreeError> {
        let folder = self.folder_mut(parent)?;
        let (question, answer) = (question.trim(), answer.trim());
        if question.is_empty() || answer.is_empty() {
            return Err(TreeError::InvalidInput);
        }
        let card = Card::new(question, answer);
        let id = card.id.clone();
        log::debug!("Adding card {id} to folder {}", folder.id);
        folder.cards.push(card);
        Ok(id)
    }

    /// Removes a card. Returns whether a card was removed.
    pub fn delete_card(&mut self, parent: &Path, id: &CardId) -> Result<bool, TreeError> {
        if parent.is_root() {
            return Ok(false);
        }
        let folder = self.folder_mut(parent)?;
        let before = folder.cards.len();
        folder.cards.retain(|c| &c.id != id);
        let removed = folder.cards.len() != before;
        if removed {
            log::debug!("Deleted card {id}");
        }
        Ok(removed)
    }

    /// Overwrites a card's question and answer. Returns whether a card was
    /// changed; an unknown card id changes nothing.
    pub fn edit_card(
        &mut self,
        parent: &Path,
        id: &CardId,
        question: &str,
        answer: &str,
    ) -> Result<bool, TreeError> {
        let folder = self.folder_mut(parent)?;
        let (question, answer) = (question.trim(), answer.trim());
        if question.is_empty() || answer.is_empty() {
            return Err(TreeError::InvalidInput);
        }
        match folder.cards.iter_mut().find(|c| &c.id == id) {
            Some(card) => {
                card.question = question.to_string();
                card.answer = answer.to_string();
                log::debug!("Edited card {id}");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn find_card(&self, parent: &Path, id: &CardId) -> Result<Option<&Card>, TreeError> {
        let view = self.resolve(parent)?;
        Ok(view.cards.iter().find(|c| &c.id == id))
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            folder_count: 0,
            card_count: 0,
            max_depth: 0,
        };
        fn visit(folders: &[Folder], depth: usize, stats: &mut TreeStats) {
            for folder in folders {
                stats.folder_count += 1;
                stats.card_count += folder.cards.len();
                stats.max_depth = stats.max_depth.max(depth);
                visit(&folder.children, depth + 1, stats);
            }
        }
        visit(&self.folders, 1, &mut stats);
        stats
    }

    pub fn serialize(&self) -> Fallible<String> {
        Ok(serde_json::to_string(&self.folders)?)
    }

    pub fn serialize_pretty(&self) -> Fallible<String> {
        Ok(serde_json::to_string_pretty(&self.folders)?)
    }

    /// Parses a tree record, failing on malformed input.
    pub fn try_deserialize(record: &str) -> Fallible<Self> {
        let folders: Vec<Folder> = serde_json::from_str(record)?;
        Ok(Self::from_folders(folders))
    }

    /// Parses a tree record. Malformed input yields an empty tree.
    pub fn deserialize(record: &str) -> Self {
        match Self::try_deserialize(record) {
            Ok(tree) => tree,
            Err(e) => {
                log::warn!("Discarding corrupt tree record: {e}");
                Self::new()
            }
        }
    }

    fn children_mut(&mut self, path: &Path) -> Result<&mut Vec<Folder>, TreeError> {
        if path.is_root() {
            Ok(&mut self.folders)
        } else {
            Ok(&mut self.folder_mut(path)?.children)
        }
    }

    /// The folder a non-root path points to. The root cannot be borrowed as
    /// a folder, so the root path is invalid input here.
    fn folder_mut(&mut self, path: &Path) -> Result<&mut Folder, TreeError> {
        if path.is_root() {
            return Err(TreeError::InvalidInput);
        }
        descend_mut(&mut self.folders, path.segments()).ok_or(TreeError::NotFound)
    }
}

fn descend_mut<'a>(folders: &'a mut [Folder], segments: &[PathSegment]) -> Option<&'a mut Folder> {
    let (first, rest) = segments.split_first()?;
    let folder = folders.iter_mut().find(|f| f.id == first.id)?;
    if rest.is_empty() {
        Some(folder)
    } else {
        descend_mut(&mut folder.children, rest)
    }
}
