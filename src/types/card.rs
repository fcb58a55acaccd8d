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

use maud::Markup;
use maud::PreEscaped;
use maud::html;
use serde::Deserialize;
use serde::Serialize;

use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;
use crate::types::id::CardId;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub question: String,
    pub answer: String,
}

impl Card {
    /// Creates a card with a fresh id. The caller is responsible for
    /// rejecting empty fields.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: CardId::fresh(),
            question: question.into().trim().to_string(),
            answer: answer.into().trim().to_string(),
        }
    }

    pub fn html_front(&self) -> Markup {
        html! {
            (PreEscaped(markdown_to_html(&self.question)))
        }
    }

    pub fn html_back(&self) -> Markup {
        html! {
            (PreEscaped(markdown_to_html(&self.answer)))
        }
    }

    /// The question as a single line, for card listings.
    pub fn html_summary(&self) -> Markup {
        html! {
            (PreEscaped(markdown_to_html_inline(&self.question)))
        }
    }
}
