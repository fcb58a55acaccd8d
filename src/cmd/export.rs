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
use crate::storage::load_tree;

pub fn export_tree(database: &str) -> Fallible<()> {
    let db = Database::new(database)?;
    let json = render_export(&db)?;
    println!("{json}");
    Ok(())
}

fn render_export<S: KeyValueStore + ?Sized>(store: &S) -> Fallible<String> {
    load_tree(store).value.serialize_pretty()
}
