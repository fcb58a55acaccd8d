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

use crate::error::ErrorReport;

/// Timer duration used when the stored value is missing or malformed.
pub const DEFAULT_TIMER_SECONDS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// The timer value is not a positive integer.
    InvalidInput,
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::InvalidInput => write!(f, "timer must be a whole number of seconds, at least 1"),
        }
    }
}

impl Error for SettingsError {}

impl From<SettingsError> for ErrorReport {
    fn from(value: SettingsError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

/// Settings applied to every card of a session. Read once when the session
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    timer_duration_seconds: u32,
}

impl SessionSettings {
    pub fn new(timer_duration_seconds: u32) -> Result<Self, SettingsError> {
        if timer_duration_seconds == 0 {
            return Err(SettingsError::InvalidInput);
        }
        Ok(Self {
            timer_duration_seconds,
        })
    }

    pub fn timer_duration_seconds(&self) -> u32 {
        self.timer_duration_seconds
    }

    /// Parses user input for the timer field.
    pub fn parse_input(input: &str) -> Result<Self, SettingsError> {
        let seconds: u32 = input
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidInput)?;
        Self::new(seconds)
    }

    /// Parses the stored settings record. Anything unusable reads as the
    /// default.
    pub fn from_record(record: Option<&str>) -> Self {
        match record {
            None => Self::default(),
            Some(value) => match Self::parse_input(value) {
                Ok(settings) => settings,
                Err(_) => {
                    log::warn!("Ignoring malformed timer setting {value:?}");
                    Self::default()
                }
            },
        }
    }

    /// The record form: the decimal string of the duration.
    pub fn to_record(&self) -> String {
        self.timer_duration_seconds.to_string()
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timer_duration_seconds: DEFAULT_TIMER_SECONDS,
        }
    }
}
