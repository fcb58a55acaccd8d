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

mod countdown;
mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;
    use tokio::net::TcpListener;
    use tokio::net::TcpStream;
    use tokio::spawn;
    use tokio::time::sleep;

    use crate::error::Fallible;
    use crate::settings::SessionSettings;
    use crate::storage::MemoryStore;
    use crate::tree::TreeStore;
    use crate::web::server::serve;
    use crate::web::state::ServerState;

    async fn post(base: &str, form: &[(&str, &str)]) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(base)
            .form(form)
            .send()
            .await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        Ok(response.text().await?)
    }

    /// Extracts the value of the first `name="id"` hidden input following
    /// `marker` in the page.
    fn id_after(html: &str, marker: &str) -> String {
        let start = html.find(marker).unwrap();
        let rest = &html[start..];
        let key = "name=\"id\" value=\"";
        let start = rest.find(key).unwrap() + key.len();
        let end = rest[start..].find('"').unwrap();
        rest[start..start + end].to_string()
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let port = portpicker::pick_unused_port().unwrap();
        let bind = format!("127.0.0.1:{port}");
        let base = format!("http://{bind}/");
        let state = ServerState::new(
            Box::new(MemoryStore::new()),
            TreeStore::new(),
            SessionSettings::default(),
        );
        let listener = TcpListener::bind(&bind).await?;
        spawn(async move { serve(listener, state).await });
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }

        // Static assets.
        let response = reqwest::get(format!("{base}style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");
        let response = reqwest::get(format!("{base}script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Not found.
        let response = reqwest::get(format!("{base}herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Empty root.
        let response = reqwest::get(&base).await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Root"));
        assert!(!html.contains("Start Flashcards"));

        // Add a folder and open it.
        let html = post(&base, &[("action", "AddFolder"), ("name", "Geography")]).await?;
        assert!(html.contains("Geography"));
        let id = id_after(&html, "Geography");
        let html = post(&base, &[("action", "Open"), ("id", &id)]).await?;
        assert!(html.contains("Question"));
        assert!(html.contains("<h2 class=\"folder-title\">Geography</h2>"));

        // Add two cards.
        post(
            &base,
            &[
                ("action", "AddCard"),
                ("question", "Capital of France?"),
                ("answer", "Paris"),
            ],
        )
        .await?;
        let html = post(
            &base,
            &[
                ("action", "AddCard"),
                ("question", "Capital of Peru?"),
                ("answer", "Lima"),
            ],
        )
        .await?;
        assert!(html.contains("Capital of France?"));
        assert!(html.contains("Capital of Peru?"));
        assert!(html.contains("Start Flashcards"));

        // Run the session.
        let html = post(&base, &[("action", "Start")]).await?;
        assert!(html.contains("1 / 2"));
        assert!(html.contains("Reveal"));
        let snapshot: serde_json::Value =
            reqwest::get(format!("{base}session.json")).await?.json().await?;
        assert_eq!(snapshot["status"], "presenting");
        assert_eq!(snapshot["total"], 2);
        assert_eq!(snapshot["secondsLeft"], 5);

        let html = post(&base, &[("action", "Reveal")]).await?;
        assert!(html.contains("Next"));
        let html = post(&base, &[("action", "Next")]).await?;
        assert!(html.contains("2 / 2"));
        post(&base, &[("action", "Reveal")]).await?;
        let html = post(&base, &[("action", "Next")]).await?;
        assert!(html.contains("Done!"));

        let snapshot: serde_json::Value =
            reqwest::get(format!("{base}session.json")).await?.json().await?;
        assert_eq!(snapshot["status"], "completed");

        // Back to the folder.
        let html = post(&base, &[("action", "Quit")]).await?;
        assert!(html.contains("Start Flashcards"));
        assert!(html.contains("Geography"));
        Ok(())
    }
}
