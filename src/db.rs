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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;

use crate::error::Fallible;
use crate::storage::KeyValueStore;

/// A SQLite file holding one row per record.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        log::debug!("Opening database {database_path}");
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let sql = "select value from records where key = ?;";
        let value: Option<String> = self
            .conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let sql = "insert into records (key, value) values (?, ?) on conflict (key) do update set value = excluded.value;";
        tx.execute(sql, (key, value))?;
        tx.commit()?;
        Ok(())
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["records"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_get_missing_key() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap())?;
        assert_eq!(db.get("nope")?, None);
        Ok(())
    }

    #[test]
    fn test_set_and_overwrite() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("test.db");
        let mut db = Database::new(path.to_str().unwrap())?;
        db.set("k", "v1")?;
        assert_eq!(db.get("k")?, Some("v1".to_string()));
        db.set("k", "v2")?;
        assert_eq!(db.get("k")?, Some("v2".to_string()));
        Ok(())
    }

    #[test]
    fn test_values_survive_reopen() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("test.db");
        {
            let mut db = Database::new(path.to_str().unwrap())?;
            db.set("flashcards_timer", "9")?;
        }
        let db = Database::new(path.to_str().unwrap())?;
        assert_eq!(db.get("flashcards_timer")?, Some("9".to_string()));
        Ok(())
    }
}
