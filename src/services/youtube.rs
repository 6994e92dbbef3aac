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

//! Video title lookup through the noembed.com oEmbed proxy.

use cardsmith_core::Fallible as CoreFallible;
use cardsmith_core::TitleResolver;
use cardsmith_core::video::check_video_url;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

pub const NOEMBED_ENDPOINT: &str = "https://noembed.com/embed";

const LOOKUP_FAILED: &str = "Could not retrieve video information. Please check the URL.";

pub struct NoembedResolver {
    http: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct NoembedResponse {
    title: Option<String>,
    error: Option<String>,
}

impl NoembedResolver {
    pub fn new() -> Self {
        Self::with_endpoint(NOEMBED_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    fn lookup_url(&self, url: &str) -> String {
        format!(
            "{}?url={}",
            self.endpoint,
            utf8_percent_encode(url, NON_ALPHANUMERIC)
        )
    }

    async fn lookup(&self, url: &str) -> Fallible<String> {
        check_video_url(url)?;
        let response: NoembedResponse = self
            .http
            .get(self.lookup_url(url))
            .send()
            .await?
            .json()
            .await?;
        match response {
            NoembedResponse {
                error: Some(error), ..
            } => {
                log::debug!("noembed error for {url}: {error}");
                fail(LOOKUP_FAILED)
            }
            NoembedResponse {
                title: Some(title), ..
            } if !title.trim().is_empty() => Ok(title),
            _ => fail(LOOKUP_FAILED),
        }
    }
}

impl Default for NoembedResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleResolver for NoembedResolver {
    async fn resolve_title(&self, url: &str) -> CoreFallible<String> {
        Ok(self.lookup(url).await?)
    }
}
