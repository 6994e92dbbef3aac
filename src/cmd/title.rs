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

use cardsmith_core::TitleResolver;
use cardsmith_core::video::extract_video_id;
use cardsmith_core::video::thumbnail_url;

use crate::error::Fallible;
use crate::services::youtube::NoembedResolver;

pub async fn print_title(url: String) -> Fallible<()> {
    let resolver = NoembedResolver::new();
    let title = resolver.resolve_title(url.trim()).await?;
    println!("{title}");
    if let Some(id) = extract_video_id(url.trim()) {
        println!("{}", thumbnail_url(id));
    }
    Ok(())
}
