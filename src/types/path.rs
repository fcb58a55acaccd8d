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

use crate::types::folder::Folder;
use crate::types::id::FolderId;

/// One step of a path: the folder's id, plus its name for breadcrumbs.
#[derive(Clone, PartialEq, Debug)]
pub struct PathSegment {
    pub id: FolderId,
    pub name: String,
}

/// A navigation cursor from the root to a folder.
///
/// A path does not own anything in the tree. It must be resolved against
/// the live tree every time it is used, since the folders it names may have
/// been deleted in the meantime.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The path to the implicit root folder.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The path to `folder`, a child of the folder this path points to.
    pub fn child(&self, folder: &Folder) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment {
            id: folder.id.clone(),
            name: folder.name.clone(),
        });
        Self { segments }
    }

    /// The prefix of this path with `depth` segments. Depth zero is the root.
    pub fn truncate(&self, depth: usize) -> Self {
        let depth = depth.min(self.segments.len());
        Self {
            segments: self.segments[..depth].to_vec(),
        }
    }
}
