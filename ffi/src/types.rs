//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core view-state but uses C-compatible
//! representations: `*mut c_char` instead of `String`, pointer + length
//! instead of `Vec`, and tagged enums with explicit discriminants.
//! Snapshots are deep copies; the host frees them with the matching
//! `pokedex_free_*` function and never observes a partially-updated slot.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use pokedex_core::{
    ApiRepository, DetailState, ErrorInfo, ErrorKind, ListState, PokemonDetail, ReqwestTransport,
    ViewState, ViewStateStore,
};

/// Opaque handle owning the runtime and the store. C callers receive a
/// pointer to this and pass it back into every FFI function.
pub struct FfiPokedex {
    // Dropped before the runtime so no task outlives its executor.
    pub(crate) store: ViewStateStore<ApiRepository<ReqwestTransport>>,
    pub(crate) runtime: tokio::runtime::Runtime,
}

/// Which observable slot a subscription or snapshot refers to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSlot {
    List = 0,
    Detail = 1,
}

/// Active variant of a slot. `None` means the slot was never triggered.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStateTag {
    None = 0,
    Loading = 1,
    Ready = 2,
    Error = 3,
}

/// Error codes carried by snapshots in the `Error` state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    RequestFailed = 1,
    EmptyBody = 2,
    Unknown = 3,
    Panic = 4,
    NullArg = 5,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::RequestFailed => FfiErrorCode::RequestFailed,
            ErrorKind::EmptyBody => FfiErrorCode::EmptyBody,
            ErrorKind::Unknown => FfiErrorCode::Unknown,
        }
    }
}

/// Called from a runtime worker thread after every publish to `slot`.
pub type FfiStateCallback = extern "C" fn(slot: FfiSlot, user_data: *mut c_void);

/// Host pointer handed back to the callback untouched.
pub(crate) struct UserData(*mut c_void);

// The host guarantees `user_data` may be used from the callback thread.
unsafe impl Send for UserData {}

impl UserData {
    pub(crate) fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub(crate) fn ptr(&self) -> *mut c_void {
        self.0
    }
}

// ---------------------------------------------------------------------------
// List snapshot
// ---------------------------------------------------------------------------

/// Snapshot of the list slot. `names` / `len` are set only when `tag` is
/// `Ready`; `error_code` / `error_message` only when it is `Error`.
#[repr(C)]
pub struct FfiListState {
    pub tag: FfiStateTag,
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub names: *mut *mut c_char,
    pub len: u32,
}

impl FfiListState {
    pub(crate) fn from_core(state: Option<ListState>) -> *mut Self {
        let mut snapshot = FfiListState {
            tag: FfiStateTag::None,
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            names: std::ptr::null_mut(),
            len: 0,
        };
        match state {
            None => {}
            Some(ViewState::Loading) => snapshot.tag = FfiStateTag::Loading,
            Some(ViewState::Ready { data }) => {
                snapshot.tag = FfiStateTag::Ready;
                let (names, len) = string_array(data.into_iter().map(|s| s.name));
                snapshot.names = names;
                snapshot.len = len;
            }
            Some(ViewState::Error { cause }) => {
                snapshot.tag = FfiStateTag::Error;
                (snapshot.error_code, snapshot.error_message) = error_fields(&cause);
            }
        }
        Box::into_raw(Box::new(snapshot))
    }

    pub(crate) fn failure(code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiListState {
            tag: FfiStateTag::Error,
            error_code: code,
            error_message: c_string(msg),
            names: std::ptr::null_mut(),
            len: 0,
        }))
    }
}

// ---------------------------------------------------------------------------
// Detail snapshot
// ---------------------------------------------------------------------------

/// One stat row of a detail record.
#[repr(C)]
pub struct FfiStat {
    pub name: *mut c_char,
    pub base_value: u32,
    pub effort: u32,
}

/// A detail record exposed to C. `sprite` is null when the API has none.
#[repr(C)]
pub struct FfiPokemonDetail {
    pub name: *mut c_char,
    pub height: u32,
    pub weight: u32,
    pub types: *mut *mut c_char,
    pub types_len: u32,
    pub stats: *mut FfiStat,
    pub stats_len: u32,
    pub sprite: *mut c_char,
}

impl FfiPokemonDetail {
    fn from_core(detail: PokemonDetail) -> *mut Self {
        let (types, types_len) = string_array(detail.types.into_iter().map(|t| t.name));
        let (stats, stats_len) = leak_vec(
            detail
                .stats
                .into_iter()
                .map(|s| FfiStat {
                    name: c_string(&s.name),
                    base_value: s.base_value,
                    effort: s.effort,
                })
                .collect(),
        );
        Box::into_raw(Box::new(FfiPokemonDetail {
            name: c_string(&detail.name),
            height: detail.height,
            weight: detail.weight,
            types,
            types_len,
            stats,
            stats_len,
            sprite: detail
                .sprite
                .as_deref()
                .map_or(std::ptr::null_mut(), c_string),
        }))
    }
}

/// Snapshot of the detail slot. `detail` is non-null only when `tag` is
/// `Ready`. `name` is the most recently requested name, or null.
#[repr(C)]
pub struct FfiDetailState {
    pub tag: FfiStateTag,
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub name: *mut c_char,
    pub detail: *mut FfiPokemonDetail,
}

impl FfiDetailState {
    pub(crate) fn from_core(state: Option<DetailState>, name: Option<String>) -> *mut Self {
        let mut snapshot = FfiDetailState {
            tag: FfiStateTag::None,
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            name: name.as_deref().map_or(std::ptr::null_mut(), c_string),
            detail: std::ptr::null_mut(),
        };
        match state {
            None => {}
            Some(ViewState::Loading) => snapshot.tag = FfiStateTag::Loading,
            Some(ViewState::Ready { data }) => {
                snapshot.tag = FfiStateTag::Ready;
                snapshot.detail = FfiPokemonDetail::from_core(data);
            }
            Some(ViewState::Error { cause }) => {
                snapshot.tag = FfiStateTag::Error;
                (snapshot.error_code, snapshot.error_message) = error_fields(&cause);
            }
        }
        Box::into_raw(Box::new(snapshot))
    }

    pub(crate) fn failure(code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiDetailState {
            tag: FfiStateTag::Error,
            error_code: code,
            error_message: c_string(msg),
            name: std::ptr::null_mut(),
            detail: std::ptr::null_mut(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Allocation helpers
// ---------------------------------------------------------------------------

/// Heap C string. Interior NULs are dropped rather than failing.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

fn error_fields(cause: &ErrorInfo) -> (FfiErrorCode, *mut c_char) {
    (cause.kind.into(), c_string(&cause.message))
}

/// Longest array a `u32` length field can describe.
const MAX_C_ARRAY_LEN: usize = u32::MAX as usize;

/// Hand a `Vec` to C as pointer + length. Empty vectors become null.
///
/// Anything past `MAX_C_ARRAY_LEN` is dropped so the reported length always
/// matches the allocation `reclaim_vec` frees.
fn leak_vec<T>(mut items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let keep = capped_len(items.len());
    if keep < items.len() {
        tracing::warn!(len = items.len(), "array truncated at the C boundary");
        items.truncate(keep);
    }
    let mut items = items.into_boxed_slice();
    let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

fn capped_len(len: usize) -> usize {
    len.min(MAX_C_ARRAY_LEN)
}

fn string_array(items: impl Iterator<Item = String>) -> (*mut *mut c_char, u32) {
    leak_vec(items.map(|s| c_string(&s)).collect())
}

/// Reclaim a pointer + length produced by `leak_vec`.
///
/// # Safety
/// `ptr` / `len` must come from `leak_vec` and not have been reclaimed.
pub(crate) unsafe fn reclaim_vec<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    Box::from_raw(slice).into_vec()
}

/// # Safety
/// `s` must be null or come from `c_string`.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// # Safety
/// `detail` must be null or come from `FfiPokemonDetail::from_core`.
pub(crate) unsafe fn free_detail(detail: *mut FfiPokemonDetail) {
    if detail.is_null() {
        return;
    }
    let detail = Box::from_raw(detail);
    free_c_string(detail.name);
    free_c_string(detail.sprite);
    for t in reclaim_vec(detail.types, detail.types_len) {
        free_c_string(t);
    }
    for stat in reclaim_vec(detail.stats, detail.stats_len) {
        free_c_string(stat.name);
    }
}
