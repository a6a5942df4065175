//! C ABI bindings for jcs-core.
//!
//! Exposes `rezn_canonicalize` and `rezn_free` for C and C++ callers. The
//! declarations live in `include/reznjcs.h`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p jcs-ffi --release
//! cc app.c -Icrates/jcs-ffi/include -Ltarget/release -lreznjcs
//! ```
//!
//! Every failure (null input, malformed JSON, a panic inside the engine) is
//! reported as a null return; no error detail crosses the boundary.

use std::ffi::{c_char, CStr, CString};
use std::panic;
use std::ptr;

/// Canonicalize a NUL-terminated UTF-8 JSON document.
///
/// Returns a newly allocated NUL-terminated canonical string, or null on any
/// error. The result must be released with [`rezn_free`].
///
/// # Safety
///
/// `json_utf8` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn rezn_canonicalize(json_utf8: *const c_char) -> *mut c_char {
    if json_utf8.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: non-null and NUL-terminated per the contract above.
    let input = unsafe { CStr::from_ptr(json_utf8) };

    match panic::catch_unwind(|| canonicalize_bytes(input.to_bytes())) {
        Ok(Some(canonical)) => canonical.into_raw(),
        Ok(None) | Err(_) => ptr::null_mut(),
    }
}

/// Release a string returned by [`rezn_canonicalize`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from [`rezn_canonicalize`] that
/// has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn rezn_free(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: allocated by `CString::into_raw` in `rezn_canonicalize`.
    drop(unsafe { CString::from_raw(ptr) });
}

/// Canonical text as a C string. Canonical output escapes U+0000, so the
/// conversion only fails if the engine does.
fn canonicalize_bytes(input: &[u8]) -> Option<CString> {
    let canonical = jcs_core::transform(input).ok()?;
    CString::new(canonical).ok()
}
