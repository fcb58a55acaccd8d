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

use std::fs::read_to_string;
use std::path::Path;

use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;
use crate::storage::KeyValueStore;
use crate::storage::save_tree;
use crate::tree::TreeStats;
use crate::tree::TreeStore;

pub fn import_tree(file: &Path, database: &str) -> Fallible<()> {
    if !file.exists() {
        return fail(format!("file {} does not exist.", file.display()));
    }
    let content = read_to_string(file)?;
    let mut db = Database::new(database)?;
    let stats = apply_import(&mut db, &content)?;
    println!(
        "Imported {} folders and {} cards.",
        stats.folder_count, stats.card_count
    );
    Ok(())
}

/// Replaces the stored tree. Unlike loading, malformed input is an error and
/// leaves the store untouched.
fn apply_import<S: KeyValueStore + ?Sized>(store: &mut S, content: &str) -> Fallible<TreeStats> {
    let tree = TreeStore::try_deserialize(content)?;
    save_tree(store, &tree)?;
    log::debug!("Saved imported tree.");
    Ok(tree.stats())
}
