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

//! Card text to HTML for the practice view.
//!
//! Card text comes from a model, so raw HTML in it is shown as text rather
//! than passed through.

use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::html::push_html;

pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_MATH);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });
    let mut html_output = String::new();
    push_html(&mut html_output, parser);
    html_output
}

/// Like [`markdown_to_html`], without the wrapping paragraph for
/// single-paragraph text.
pub fn markdown_to_html_inline(markdown: &str) -> String {
    let text = markdown_to_html(markdown);
    match text
        .strip_prefix("<p>")
        .and_then(|t| t.strip_suffix("</p>\n"))
    {
        Some(inner) if !inner.contains("<p>") => inner.to_string(),
        _ => text,
    }
}
