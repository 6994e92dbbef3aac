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

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Fallible;
use crate::error::fail;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
        .expect("video id pattern is valid")
});

const VIDEO_ID_LEN: usize = 11;

/// Looks up the title of a video from its URL.
#[allow(async_fn_in_trait)]
pub trait TitleResolver {
    async fn resolve_title(&self, url: &str) -> Fallible<String>;
}

/// Whether `url` points at a video host we know how to resolve.
pub fn is_video_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

pub fn check_video_url(url: &str) -> Fallible<()> {
    if is_video_url(url) {
        Ok(())
    } else {
        fail("Invalid YouTube URL")
    }
}

/// The eleven-character video id, if the URL has one.
pub fn extract_video_id(url: &str) -> Option<&str> {
    let captures = VIDEO_ID.captures(url)?;
    let id = captures.get(2)?.as_str();
    if id.len() == VIDEO_ID_LEN { Some(id) } else { None }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}
