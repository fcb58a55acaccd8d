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

use serde::Serialize;

use crate::db::Database;
use crate::error::Fallible;
use crate::storage::KeyValueStore;
use crate::storage::load_settings;
use crate::storage::load_tree;

pub fn print_stats(database: &str) -> Fallible<()> {
    let db = Database::new(database)?;
    let stats = collect_stats(&db);
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{}", stats_json);
    Ok(())
}

fn collect_stats<S: KeyValueStore + ?Sized>(store: &S) -> Stats {
    let tree = load_tree(store).value.stats();
    Stats {
        folder_count: tree.folder_count,
        card_count: tree.card_count,
        max_depth: tree.max_depth,
        timer_duration_seconds: load_settings(store).value.timer_duration_seconds(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    folder_count: usize,
    card_count: usize,
    max_depth: usize,
    timer_duration_seconds: u32,
}
