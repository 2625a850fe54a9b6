//! Process-wide proxy map
//!
//! Initialization is an explicit, single call made at process start. Until
//! then [`get`] returns `None`; afterwards the map is only read.

use std::cell::Cell;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::map::ProxyMap;

static PROXY_MAP: OnceCell<ProxyMap> = OnceCell::new();

thread_local! {
    static INITIALIZING: Cell<bool> = const { Cell::new(false) };
}

/// Clears the per-thread initializing flag, including on unwind
struct InitGuard;

impl InitGuard {
    fn enter() -> Option<Self> {
        if INITIALIZING.with(|flag| flag.replace(true)) {
            None
        } else {
            Some(InitGuard)
        }
    }
}

impl Drop for InitGuard {
    fn drop(&mut self) {
        INITIALIZING.with(|flag| flag.set(false));
    }
}

/// Build the process-wide map, running `register` exactly once
///
/// Concurrent callers wait for the winner; every call but the first returns
/// [`RegistryError::AlreadyInitialized`]. A call made from inside `register`
/// returns that error immediately.
pub fn initialize<F>(register: F) -> Result<&'static ProxyMap, RegistryError>
where
    F: FnOnce(&ProxyMap),
{
    let Some(_guard) = InitGuard::enter() else {
        warn!("proxy map initialize called while registering");
        return Err(RegistryError::AlreadyInitialized);
    };

    let mut fresh = false;
    let map = PROXY_MAP.get_or_init(|| {
        fresh = true;
        let map = ProxyMap::new();
        register(&map);
        map
    });

    if fresh {
        info!(abstractions = map.len(), "proxy map initialized");
        Ok(map)
    } else {
        Err(RegistryError::AlreadyInitialized)
    }
}

/// The process-wide map, if initialized
pub fn get() -> Option<&'static ProxyMap> {
    PROXY_MAP.get()
}
