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

//! State record for the application shell.
//!
//! The shell drives one generation attempt at a time:
//! `Idle -> FetchingInfo -> Generating -> Completed`, dropping to `Error`
//! from any step. Every terminal phase accepts a new attempt.

use std::fmt::Display;
use std::fmt::Formatter;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::settings::AdvancedSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Youtube,
    File,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FetchingInfo,
    Generating,
    Completed,
    Error,
}

/// What went wrong in the last attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// No URL or no file. Generation is not attempted.
    InvalidInput,
    /// The video title could not be resolved. Generation is not attempted.
    TitleResolution,
    /// The generator failed. No partial content is kept.
    Generation,
    /// The PDF could not be produced. The generated deck is kept.
    Export,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::InvalidInput => write!(f, "invalid input"),
            FailureKind::TitleResolution => write!(f, "title resolution"),
            FailureKind::Generation => write!(f, "generation"),
            FailureKind::Export => write!(f, "export"),
        }
    }
}

/// The user's pending input. A file is present once its bytes are read.
#[derive(Clone, Debug)]
pub enum PendingInput<'a> {
    Url(&'a str),
    File(Option<&'a [u8]>),
}

impl PendingInput<'_> {
    pub fn mode(&self) -> InputMode {
        match self {
            PendingInput::Url(_) => InputMode::Youtube,
            PendingInput::File(_) => InputMode::File,
        }
    }

    pub fn is_ready(&self) -> bool {
        match self {
            PendingInput::Url(url) => !url.trim().is_empty(),
            PendingInput::File(bytes) => bytes.is_some(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ShellState {
    pub input_mode: InputMode,
    pub settings: AdvancedSettings,
    phase: Phase,
    failure: Option<(FailureKind, String)>,
}

impl ShellState {
    pub fn new(input_mode: InputMode, settings: AdvancedSettings) -> Self {
        Self {
            input_mode,
            settings,
            phase: Phase::Idle,
            failure: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::FetchingInfo | Phase::Generating)
    }

    pub fn failure(&self) -> Option<(FailureKind, &str)> {
        self.failure
            .as_ref()
            .map(|(kind, message)| (*kind, message.as_str()))
    }

    /// Start an attempt. Fails without leaving a terminal phase if the input
    /// is missing or another attempt is in flight.
    pub fn begin(&mut self, input: &PendingInput<'_>) -> Fallible<()> {
        if self.is_processing() {
            return fail("A generation request is already in progress.");
        }
        self.input_mode = input.mode();
        if !input.is_ready() {
            let message = match input {
                PendingInput::Url(_) => "Please enter a valid YouTube URL",
                PendingInput::File(_) => "Please upload a file first",
            };
            self.fail(FailureKind::InvalidInput, message);
            return fail(message);
        }
        self.failure = None;
        self.transition(Phase::FetchingInfo);
        Ok(())
    }

    /// Context is ready; the generator is being called.
    pub fn start_generating(&mut self) {
        self.transition(Phase::Generating);
    }

    pub fn complete(&mut self) {
        self.transition(Phase::Completed);
    }

    /// Record a failure. Export failures keep the shell `Completed` since
    /// the deck is still there to retry with.
    pub fn fail(&mut self, kind: FailureKind, message: impl Into<String>) {
        let message = message.into();
        log::debug!("Shell failure ({kind}): {message}");
        self.failure = Some((kind, message));
        if kind != FailureKind::Export {
            self.transition(Phase::Error);
        }
    }

    fn transition(&mut self, phase: Phase) {
        log::debug!("Shell phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> ShellState {
        ShellState::new(InputMode::File, AdvancedSettings::default())
    }

    #[test]
    fn test_happy_path() -> Fallible<()> {
        let mut s = shell();
        s.begin(&PendingInput::Url("https://youtu.be/dQw4w9WgXcQ"))?;
        assert_eq!(s.input_mode, InputMode::Youtube);
        assert_eq!(s.phase(), Phase::FetchingInfo);
        assert!(s.is_processing());
        s.start_generating();
        assert_eq!(s.phase(), Phase::Generating);
        s.complete();
        assert_eq!(s.phase(), Phase::Completed);
        assert!(!s.is_processing());
        Ok(())
    }

    #[test]
    fn test_missing_url() {
        let mut s = shell();
        let err = s.begin(&PendingInput::Url("   ")).unwrap_err();
        assert_eq!(err.message(), "Please enter a valid YouTube URL");
        assert_eq!(s.phase(), Phase::Error);
        assert_eq!(s.failure().map(|(k, _)| k), Some(FailureKind::InvalidInput));
    }

    #[test]
    fn test_missing_file() {
        let mut s = shell();
        let err = s.begin(&PendingInput::File(None)).unwrap_err();
        assert_eq!(err.message(), "Please upload a file first");
        assert!(!s.is_processing());
    }

    #[test]
    fn test_generation_failure_is_actionable() -> Fallible<()> {
        let mut s = shell();
        s.begin(&PendingInput::File(Some(b"%PDF")))?;
        s.start_generating();
        s.fail(FailureKind::Generation, "No content generated");
        assert_eq!(s.phase(), Phase::Error);
        assert!(!s.is_processing());
        assert_eq!(
            s.failure(),
            Some((FailureKind::Generation, "No content generated"))
        );
        // A new attempt clears the failure.
        s.begin(&PendingInput::File(Some(b"%PDF")))?;
        assert_eq!(s.failure(), None);
        Ok(())
    }

    #[test]
    fn test_export_failure_keeps_deck() -> Fallible<()> {
        let mut s = shell();
        s.begin(&PendingInput::File(Some(b"text")))?;
        s.start_generating();
        s.complete();
        s.fail(FailureKind::Export, "Export Failed");
        assert_eq!(s.phase(), Phase::Completed);
        Ok(())
    }

    #[test]
    fn test_one_request_at_a_time() -> Fallible<()> {
        let mut s = shell();
        s.begin(&PendingInput::File(Some(b"text")))?;
        assert!(s.begin(&PendingInput::File(Some(b"text"))).is_err());
        assert_eq!(s.phase(), Phase::FetchingInfo);
        Ok(())
    }
}
