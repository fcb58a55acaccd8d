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

use std::fmt::Display;
use std::fmt::Formatter;

use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Number of random characters after the leading underscore.
const ID_LENGTH: usize = 9;

/// Generates a random token: an underscore followed by nine base-36
/// characters. Collisions are not checked for.
fn fresh_token() -> String {
    let mut rng = rand::thread_rng();
    let mut token = String::with_capacity(ID_LENGTH + 1);
    token.push('_');
    for _ in 0..ID_LENGTH {
        let idx = rng.gen_range(0..ID_ALPHABET.len());
        token.push(ID_ALPHABET[idx] as char);
    }
    token
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    pub fn fresh() -> Self {
        Self(fresh_token())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FolderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for FolderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn fresh() -> Self {
        Self(fresh_token())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_token_format() {
        let id = FolderId::fresh();
        let s = id.as_str();
        assert_eq!(s.len(), ID_LENGTH + 1);
        assert!(s.starts_with('_'));
        assert!(
            s[1..]
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_tokens_differ() {
        let ids: HashSet<CardId> = (0..1000).map(|_| CardId::fresh()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = CardId::from("_abc123xyz");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"_abc123xyz\"");
    }
}
