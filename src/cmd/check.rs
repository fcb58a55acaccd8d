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

use crate::db::Database;
use crate::error::Fallible;
use crate::storage::KeyValueStore;
use crate::storage::RecordStatus;
use crate::storage::load_settings;
use crate::storage::load_tree;

pub fn check_records(database: &str) -> Fallible<()> {
    let db = Database::new(database)?;
    let (tree, timer) = probe(&db);
    println!("tree: {}", describe(tree));
    println!("timer: {}", describe(timer));
    if tree != RecordStatus::Recovered && timer != RecordStatus::Recovered {
        println!("ok");
    }
    Ok(())
}

fn probe<S: KeyValueStore + ?Sized>(store: &S) -> (RecordStatus, RecordStatus) {
    (load_tree(store).status, load_settings(store).status)
}

fn describe(status: RecordStatus) -> &'static str {
    match status {
        RecordStatus::Intact => "intact",
        RecordStatus::Missing => "missing, using default",
        RecordStatus::Recovered => "unreadable, using default",
    }
}
