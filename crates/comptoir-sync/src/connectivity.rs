//! # Connectivity Signal
//!
//! A shared online/offline flag. The gateway samples it once at the start
//! of every call; a call never switches path half-way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared online/offline flag. Clones observe the same value.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Arc<AtomicBool>,
}

impl Connectivity {
    pub fn new(online: bool) -> Self {
        Connectivity {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Sets the flag and returns the previous value.
    pub fn set_online(&self, online: bool) -> bool {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            info!(online, "Connectivity changed");
        }
        previous
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Connectivity::new(true)
    }
}
