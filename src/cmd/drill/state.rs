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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use cardsmith_core::StudySession;
use cardsmith_core::rng::TinyRng;
use tokio::sync::oneshot::Sender;

#[derive(Clone)]
pub struct ServerState {
    pub port: u16,
    /// The deck title, if it has one.
    pub title: Option<String>,
    pub mutable: Arc<Mutex<MutableState>>,
    pub shutdown_tx: Arc<Mutex<Option<Sender<()>>>>,
}

pub struct MutableState {
    pub session: StudySession,
    pub rng: TinyRng,
}

impl ServerState {
    /// A panicked handler leaves the session usable, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, MutableState> {
        self.mutable.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn shutdown(&self) {
        let sender = self
            .shutdown_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = sender {
            let _ = tx.send(());
        }
    }
}
