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

use std::process::exit;

use cardsmith_core::Difficulty;
use clap::Parser;
use tokio::spawn;

use crate::cmd::drill::server::ServerConfig;
use crate::cmd::drill::server::start_server;
use crate::cmd::export::export_deck;
use crate::cmd::generate::GenerateConfig;
use crate::cmd::generate::generate_deck;
use crate::cmd::title::print_title;
use crate::error::Fallible;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a cardsmith.toml configuration file. By default, ./cardsmith.toml is used if it exists.
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate a deck of flashcards from a YouTube video or a document.
    Generate {
        /// URL of a YouTube video.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,
        /// Path to a PDF, markdown or plain text document.
        #[arg(long)]
        file: Option<String>,
        /// Number of cards to generate, at least 1. Default is 15.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        cards: Option<u32>,
        /// Difficulty of the generated cards: easy, medium or hard.
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
        /// Custom formatting instructions for the cards.
        #[arg(long)]
        instructions: Option<String>,
        /// Path to write the deck JSON to. By default, the deck is printed to stdout.
        #[arg(long)]
        output: Option<String>,
        /// Also export the deck as a printable PDF.
        #[arg(long)]
        pdf: bool,
    },
    /// Export a deck as a printable double-sided PDF.
    Export {
        /// Path to the deck JSON file.
        deck: String,
        /// Path to the output file. By default, the name is derived from the deck title.
        #[arg(long)]
        output: Option<String>,
    },
    /// Study a deck through a web interface.
    Drill {
        /// Path to the deck JSON file.
        deck: String,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
        /// Shuffle the deck before starting.
        #[arg(long)]
        shuffle: bool,
    },
    /// Print the title of a YouTube video.
    Title {
        /// URL of the video.
        url: String,
    },
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::try_from(value).map_err(|e| e.message().to_string())
}

pub async fn entrypoint() -> Fallible<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            url,
            file,
            cards,
            difficulty,
            instructions,
            output,
            pdf,
        } => {
            let options = GenerateConfig {
                url,
                file,
                card_count: cards,
                difficulty,
                instructions,
                output,
                pdf,
                config: cli.config,
            };
            generate_deck(options).await
        }
        Command::Export { deck, output } => export_deck(deck, output),
        Command::Drill {
            deck,
            host,
            port,
            open_browser,
            shuffle,
        } => {
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = ServerConfig {
                deck_path: deck,
                host,
                port,
                shuffle,
            };
            start_server(config).await
        }
        Command::Title { url } => print_title(url).await,
    }
}
