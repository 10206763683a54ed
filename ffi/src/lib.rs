//! C-ABI wrapper around `pokedex-core`.
//!
//! # Overview
//! Lets a native mobile host (Kotlin via JNI, Swift via a bridging header)
//! drive the view-state store: trigger `load_list` / `load_detail`, read
//! slot snapshots and get notified when a slot changes. Fetching runs on a
//! tokio runtime owned by the handle; the host never blocks on I/O.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Snapshots are tagged `#[repr(C)]` structs (`FfiStateTag`) deep-copied
//!   from the store; the host owns them until `pokedex_free_*_state`.
//! - Subscriptions call a plain C function pointer from a runtime worker
//!   thread; the host re-reads the snapshot it cares about.

pub mod types;

use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use pokedex_core::{ApiRepository, Config, ViewStateStore};
use tracing_subscriber::EnvFilter;

use types::*;

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

fn build_pokedex(config: Config) -> *mut FfiPokedex {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("pokedex-worker")
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "failed to start runtime");
            return std::ptr::null_mut();
        }
    };
    let repository = match ApiRepository::from_config(&config) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http client");
            return std::ptr::null_mut();
        }
    };
    tracing::info!(base_url = %config.base_url, "pokedex created");
    let store = ViewStateStore::new(repository, runtime.handle().clone());
    Box::into_raw(Box::new(FfiPokedex { store, runtime }))
}

/// Create a Pokédex bound to `base_url` with default settings otherwise.
///
/// Returns null if `base_url` is null or not UTF-8, or on internal failure.
/// The caller must free the returned pointer with `pokedex_free`.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_new(base_url: *const c_char) -> *mut FfiPokedex {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Ok(url) = unsafe { CStr::from_ptr(base_url) }.to_str() else {
            return std::ptr::null_mut();
        };
        build_pokedex(Config::with_base_url(url))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a Pokédex configured from `POKEDEX_*` environment variables.
///
/// Returns null if the environment holds an invalid value.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_new_from_env() -> *mut FfiPokedex {
    catch_unwind(|| match Config::from_env() {
        Ok(config) => build_pokedex(config),
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::ptr::null_mut()
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Upper bound on how long `pokedex_free` waits for running callbacks.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Free a Pokédex created by `pokedex_new*`. Safe to call with null.
///
/// In-flight fetches are abandoned. A subscription callback that is already
/// running is allowed to return first (up to `SHUTDOWN_GRACE`), and no
/// callback starts after this returns, so `user_data` may be freed right
/// after. Must not be called from a subscription callback.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_free(pokedex: *mut FfiPokedex) {
    if !pokedex.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let pokedex = unsafe { Box::from_raw(pokedex) };
            let FfiPokedex { store, runtime } = *pokedex;
            drop(store);
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        }));
    }
}

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`
/// (default `pokedex_core=info`). Returns false if one was already set.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_init_logging() -> bool {
    catch_unwind(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pokedex_core=info,pokedex_ffi=info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// Start the listing fetch. Returns true if this call started it; false if
/// it was already requested, or `pokedex` is null.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_load_list(pokedex: *const FfiPokedex) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if pokedex.is_null() {
            return false;
        }
        let pokedex = unsafe { &*pokedex };
        pokedex.store.load_list().is_some()
    }))
    .unwrap_or(false)
}

/// Start a detail fetch for `name`, superseding any earlier one.
///
/// Returns false if `pokedex` or `name` is null, or `name` is not UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_load_detail(pokedex: *const FfiPokedex, name: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if pokedex.is_null() || name.is_null() {
            return false;
        }
        let pokedex = unsafe { &*pokedex };
        let Ok(name) = unsafe { CStr::from_ptr(name) }.to_str() else {
            return false;
        };
        // Fire and forget; the outcome arrives through the detail slot.
        drop(pokedex.store.load_detail(name));
        true
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Snapshot the list slot. Never returns null; a null `pokedex` yields an
/// `Error` snapshot with `NullArg`.
/// The caller must free the result with `pokedex_free_list_state`.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_list_state(pokedex: *const FfiPokedex) -> *mut FfiListState {
    catch_unwind(AssertUnwindSafe(|| {
        if pokedex.is_null() {
            return FfiListState::failure(FfiErrorCode::NullArg, "null argument: pokedex");
        }
        let pokedex = unsafe { &*pokedex };
        FfiListState::from_core(pokedex.store.list_state())
    }))
    .unwrap_or_else(|_| FfiListState::failure(FfiErrorCode::Panic, "panic in pokedex_list_state"))
}

/// Snapshot the detail slot. Never returns null.
/// The caller must free the result with `pokedex_free_detail_state`.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_detail_state(pokedex: *const FfiPokedex) -> *mut FfiDetailState {
    catch_unwind(AssertUnwindSafe(|| {
        if pokedex.is_null() {
            return FfiDetailState::failure(FfiErrorCode::NullArg, "null argument: pokedex");
        }
        let pokedex = unsafe { &*pokedex };
        let (name, state) = pokedex.store.detail_snapshot();
        FfiDetailState::from_core(state, name)
    }))
    .unwrap_or_else(|_| {
        FfiDetailState::failure(FfiErrorCode::Panic, "panic in pokedex_detail_state")
    })
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// Call `callback(slot, user_data)` after every publish to `slot`.
///
/// The callback runs on a runtime worker thread and should only schedule
/// work (e.g. post to the UI thread). Bursts of publishes may be coalesced
/// into one call; the snapshot read afterwards is always the latest.
/// Subscriptions live as long as the handle; `pokedex_free` waits for a
/// running callback before returning. Returns false if `pokedex` is null.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_subscribe(
    pokedex: *const FfiPokedex,
    slot: FfiSlot,
    callback: FfiStateCallback,
    user_data: *mut c_void,
) -> bool {
    let user_data = UserData::new(user_data);
    catch_unwind(AssertUnwindSafe(move || {
        if pokedex.is_null() {
            return false;
        }
        let pokedex = unsafe { &*pokedex };
        match slot {
            FfiSlot::List => {
                let mut rx = pokedex.store.subscribe_list();
                pokedex.runtime.spawn(async move {
                    let user_data = user_data;
                    while rx.changed().await.is_ok() {
                        callback(slot, user_data.ptr());
                    }
                });
            }
            FfiSlot::Detail => {
                let mut rx = pokedex.store.subscribe_detail();
                pokedex.runtime.spawn(async move {
                    let user_data = user_data;
                    while rx.changed().await.is_ok() {
                        callback(slot, user_data.ptr());
                    }
                });
            }
        }
        true
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a snapshot returned by `pokedex_list_state`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_free_list_state(state: *mut FfiListState) {
    if state.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let state = Box::from_raw(state);
        free_c_string(state.error_message);
        for name in reclaim_vec(state.names, state.len) {
            free_c_string(name);
        }
    });
}

/// Free a snapshot returned by `pokedex_detail_state`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_free_detail_state(state: *mut FfiDetailState) {
    if state.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe {
        let state = Box::from_raw(state);
        free_c_string(state.error_message);
        free_c_string(state.name);
        free_detail(state.detail);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn pokedex_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
