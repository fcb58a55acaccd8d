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
use crate::settings::SessionSettings;
use crate::storage::KeyValueStore;
use crate::storage::load_settings;
use crate::storage::save_settings;

pub fn timer_command(seconds: Option<String>, database: &str) -> Fallible<()> {
    let mut db = Database::new(database)?;
    let settings = match seconds {
        Some(input) => set_timer(&mut db, &input)?,
        None => load_settings(&db).value,
    };
    println!("{}", settings.timer_duration_seconds());
    Ok(())
}

fn set_timer<S: KeyValueStore + ?Sized>(store: &mut S, input: &str) -> Fallible<SessionSettings> {
    let settings = SessionSettings::parse_input(input)?;
    save_settings(store, &settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::storage::TIMER_KEY;

    #[test]
    fn test_set_timer() -> Fallible<()> {
        let mut store = MemoryStore::new();
        let settings = set_timer(&mut store, " 30 ")?;
        assert_eq!(settings.timer_duration_seconds(), 30);
        assert_eq!(store.get(TIMER_KEY)?, Some("30".to_string()));
        Ok(())
    }

    #[test]
    fn test_invalid_timer_is_rejected() -> Fallible<()> {
        let mut store = MemoryStore::new();
        for input in ["0", "-3", "abc", ""] {
            assert!(set_timer(&mut store, input).is_err());
        }
        assert_eq!(store.get(TIMER_KEY)?, None);
        Ok(())
    }

    #[test]
    fn test_timer_command() -> Fallible<()> {
        let dir = tempdir()?;
        let database = dir.path().join("cards.db");
        let database = database.to_str().unwrap();
        timer_command(Some("12".to_string()), database)?;
        timer_command(None, database)?;
        assert!(timer_command(Some("zero".to_string()), database).is_err());
        let db = Database::new(database)?;
        assert_eq!(load_settings(&db).value.timer_duration_seconds(), 12);
        Ok(())
    }
}
