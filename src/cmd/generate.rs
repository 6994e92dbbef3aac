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

use std::path::Path;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use cardsmith_core::ContentGenerator;
use cardsmith_core::Date;
use cardsmith_core::Difficulty;
use cardsmith_core::GenerationRequest;
use cardsmith_core::LearningContent;
use cardsmith_core::ShellState;
use cardsmith_core::Source;
use cardsmith_core::TitleResolver;
use cardsmith_core::shell::FailureKind;
use cardsmith_core::shell::PendingInput;
use cardsmith_core::video::extract_video_id;
use cardsmith_core::video::thumbnail_url;

use crate::cmd::export::export_content;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::services::gemini::ApiKey;
use crate::services::gemini::GeminiClient;
use crate::services::youtube::NoembedResolver;

pub enum GenerateInput {
    Url(String),
    File { path: PathBuf, bytes: Vec<u8> },
}

impl GenerateInput {
    fn pending(&self) -> PendingInput<'_> {
        match self {
            GenerateInput::Url(url) => PendingInput::Url(url),
            GenerateInput::File { bytes, .. } if bytes.is_empty() => PendingInput::File(None),
            GenerateInput::File { bytes, .. } => PendingInput::File(Some(bytes)),
        }
    }
}

pub struct GenerateConfig {
    pub url: Option<String>,
    pub file: Option<String>,
    pub card_count: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub instructions: Option<String>,
    pub output: Option<String>,
    pub pdf: bool,
    pub config: Option<String>,
}

pub async fn generate_deck(options: GenerateConfig) -> Fallible<()> {
    let config = Config::load(options.config.as_deref())?;
    let settings = config.settings(options.card_count, options.difficulty, options.instructions);
    let input = read_input(options.url, options.file)?;

    let mut shell = ShellState::new(input.pending().mode(), settings);
    let api_key = ApiKey::Env(config.api_key_env.clone());
    let generator = GeminiClient::new(api_key, config.model.clone());
    let resolver = NoembedResolver::new();
    let content = run_generation(&mut shell, &input, &resolver, &generator).await?;

    match &options.output {
        Some(path) => {
            std::fs::write(path, content.to_json()?)?;
            println!(
                "Generated {} cards for \"{}\" in {path}",
                content.flashcards.len(),
                content.title
            );
        }
        None => println!("{}", content.to_json()?),
    }

    if options.pdf {
        let dir = options
            .output
            .as_deref()
            .and_then(|p| Path::new(p).parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let file_name = cardsmith_core::export_file_name(content.title());
        match export_content(&content, Some(dir.join(file_name)), Date::today()) {
            Ok(path) => eprintln!("Exported PDF to {}", path.display()),
            Err(e) => {
                // The deck JSON is already written at this point.
                shell.fail(FailureKind::Export, e.message());
                return Err(e);
            }
        }
    }
    Ok(())
}

fn read_input(url: Option<String>, file: Option<String>) -> Fallible<GenerateInput> {
    match (url, file) {
        (Some(url), _) => Ok(GenerateInput::Url(url)),
        (None, Some(file)) => {
            let path = PathBuf::from(file);
            if !path.exists() {
                return fail(format!("file {} does not exist.", path.display()));
            }
            let bytes = std::fs::read(&path)?;
            Ok(GenerateInput::File { path, bytes })
        }
        (None, None) => Ok(GenerateInput::File {
            path: PathBuf::new(),
            bytes: Vec::new(),
        }),
    }
}

/// One generation attempt: validate the input, resolve context, call the
/// generator. The shell records where it failed.
pub async fn run_generation<R, G>(
    shell: &mut ShellState,
    input: &GenerateInput,
    resolver: &R,
    generator: &G,
) -> Fallible<LearningContent>
where
    R: TitleResolver,
    G: ContentGenerator,
{
    shell.begin(&input.pending())?;

    let source = match input {
        GenerateInput::Url(url) => {
            let url = url.trim();
            if let Some(id) = extract_video_id(url) {
                log::debug!("Video thumbnail: {}", thumbnail_url(id));
            }
            match resolver.resolve_title(url).await {
                Ok(title) => {
                    log::info!("Resolved video title: {title}");
                    Source::VideoTitle(title)
                }
                Err(e) => {
                    shell.fail(FailureKind::TitleResolution, e.message());
                    return Err(e.into());
                }
            }
        }
        GenerateInput::File { path, bytes } => Source::Document {
            data: BASE64.encode(bytes),
            mime_type: mime_type_for(path).map(str::to_string),
        },
    };

    shell.start_generating();
    let request = GenerationRequest::new(source, shell.settings.clone());
    match generator.generate(&request).await {
        Ok(content) => {
            shell.complete();
            Ok(content)
        }
        Err(e) => {
            shell.fail(FailureKind::Generation, e.message());
            Err(e.into())
        }
    }
}

/// Mime type for a document, from its extension.
fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "md" | "markdown" => Some("text/markdown"),
        "txt" | "text" => Some("text/plain"),
        _ => None,
    }
}
