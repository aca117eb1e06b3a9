// Copyright 2025 strigo contributors
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

//! Cooperative cancellation for long running install steps.
//!
//! Downloads check the token between chunks and the extractor checks it
//! between archive entries. SIGINT and SIGTERM set the process-wide flag.

use crate::error::{Result, StrigoError};
use log::warn;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::{SigId, flag};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that is only cancelled through [`CancellationToken::cancel`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Fails with `Cancelled` once the token has been triggered.
    pub fn check(&self, operation: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(StrigoError::Cancelled(format!("{operation} interrupted")));
        }
        Ok(())
    }
}

struct SignalRegistry {
    flag: Arc<AtomicBool>,
    _handles: Vec<SigId>,
}

impl SignalRegistry {
    fn install() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        let handles = [SIGINT, SIGTERM]
            .into_iter()
            .filter_map(|signal| match flag::register(signal, flag.clone()) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    warn!("Failed to register cancellation handler for signal {signal}: {err}");
                    None
                }
            })
            .collect();

        Self {
            flag,
            _handles: handles,
        }
    }
}

static SIGNAL_REGISTRY: OnceLock<SignalRegistry> = OnceLock::new();

/// Returns a token shared with the process signal handlers.
pub fn signal_token() -> CancellationToken {
    let registry = SIGNAL_REGISTRY.get_or_init(SignalRegistry::install);
    CancellationToken {
        flag: registry.flag.clone(),
    }
}
