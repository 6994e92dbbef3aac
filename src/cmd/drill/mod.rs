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

mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use cardsmith_core::Card;
    use cardsmith_core::LearningContent;
    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use tempfile::TempDir;
    use tempfile::tempdir;
    use tokio::spawn;

    use crate::cmd::drill::server::ServerConfig;
    use crate::cmd::drill::server::start_server;
    use crate::error::Fallible;
    use crate::utils::wait_for_server;

    const TEST_HOST: &str = "127.0.0.1";

    fn write_deck(dir: &Path, cards: Vec<Card>) -> Fallible<String> {
        let deck = LearningContent {
            title: "Cell Biology: Basics".to_string(),
            summary: "Organelles.".to_string(),
            flashcards: cards,
        };
        let path = dir.join("deck.json");
        std::fs::write(&path, deck.to_json()?)?;
        Ok(path.display().to_string())
    }

    fn test_deck() -> Fallible<(TempDir, String)> {
        let dir = tempdir()?;
        let path = write_deck(
            dir.path(),
            vec![
                Card::new("Mitochondria", "Powerhouse of the cell"),
                Card::new("Ribosome", "Site of *protein* synthesis"),
            ],
        )?;
        Ok((dir, path))
    }

    fn config(deck_path: String, port: u16) -> ServerConfig {
        ServerConfig {
            deck_path,
            host: TEST_HOST.to_string(),
            port,
            shuffle: false,
        }
    }

    async fn post_action(port: u16, action: &str) -> Fallible<String> {
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", action)])
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    #[tokio::test]
    async fn test_start_server_on_non_existent_deck() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let result = start_server(config("./derpherp.json".to_string(), port)).await;
        let err = result.err().unwrap();
        assert_eq!(
            err.to_string(),
            "error: deck file ./derpherp.json does not exist."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_empty_deck() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let dir = tempdir()?;
        let path = write_deck(dir.path(), Vec::new())?;
        start_server(config(path, port)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let (_dir, path) = test_deck()?;
        let server = spawn(async move { start_server(config(path, port)).await });
        wait_for_server(TEST_HOST, port).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("Mitochondria"));
        assert!(html.contains("Card 1 of 2"));
        assert!(html.contains("text-large"));

        // Flip to the back.
        let html = post_action(port, "Flip").await?;
        assert!(html.contains("Powerhouse of the cell"));
        assert!(!html.contains("Mitochondria"));

        // Next card, front side up.
        let html = post_action(port, "Next").await?;
        assert!(html.contains("Ribosome"));
        assert!(html.contains("Card 2 of 2"));

        let html = post_action(port, "Flip").await?;
        assert!(html.contains("Site of <em>protein</em> synthesis"));

        // Next wraps around to the first card.
        let html = post_action(port, "Next").await?;
        assert!(html.contains("Mitochondria"));

        // Previous wraps around to the last card.
        let html = post_action(port, "Previous").await?;
        assert!(html.contains("Ribosome"));

        let html = post_action(port, "Reset").await?;
        assert!(html.contains("Card 1 of 2"));

        let html = post_action(port, "Shuffle").await?;
        assert!(html.contains("Card 1 of 2"));

        // Download the PDF.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/deck.pdf")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/pdf"
        );
        assert_eq!(
            response.headers().get("content-disposition").unwrap(),
            "attachment; filename=\"CellBiologyBasics.pdf\""
        );
        let bytes = response.bytes().await?;
        assert!(bytes.starts_with(b"%PDF-"));

        // Shut down.
        let html = post_action(port, "Shutdown").await?;
        assert!(html.contains("Session Ended"));
        server.await.unwrap()?;

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_action_is_rejected() -> Fallible<()> {
        let port = pick_unused_port().unwrap();
        let (_dir, path) = test_deck()?;
        spawn(async move { start_server(config(path, port)).await });
        wait_for_server(TEST_HOST, port).await?;

        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(&[("action", "Good")])
            .send()
            .await?;
        assert!(response.status().is_client_error());

        // The session is untouched.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        let html = response.text().await?;
        assert!(html.contains("Mitochondria"));
        Ok(())
    }
}
