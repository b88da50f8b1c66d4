//! C-compatible flat interface
//!
//! A process-wide singleton engine behind the narrow boolean API. `init`
//! tears down any prior instance. Typed errors collapse to `false` here;
//! diagnostics go to stderr. The typed `KangarooSolver` handle remains the
//! primary Rust API.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::sync::Mutex;

use crate::kangaroo::{KangarooSolver, Stats};

static SOLVER: Mutex<Option<KangarooSolver>> = Mutex::new(None);

/// Stats layout shared with C callers. Hex buffers are zero-terminated
/// ASCII, 64 digits max.
#[repr(C)]
pub struct KangarooStatsFfi {
    pub total_jumps: u64,
    pub distinguished_points: u64,
    pub collisions_found: u64,
    pub elapsed_seconds: u64,
    pub threads_active: i32,
    pub range_start: [c_char; 65],
    pub range_end: [c_char; 65],
    pub found_key: [c_char; 65],
    pub is_solved: bool,
}

fn copy_hex(dst: &mut [c_char; 65], src: &str) {
    for slot in dst.iter_mut() {
        *slot = 0;
    }
    for (slot, byte) in dst.iter_mut().zip(src.bytes().take(64)) {
        *slot = byte as c_char;
    }
}

impl From<Stats> for KangarooStatsFfi {
    fn from(stats: Stats) -> Self {
        let mut out = KangarooStatsFfi {
            total_jumps: stats.total_jumps,
            distinguished_points: stats.distinguished_points,
            collisions_found: stats.collisions_found,
            elapsed_seconds: stats.elapsed_seconds,
            threads_active: stats.threads_active,
            range_start: [0; 65],
            range_end: [0; 65],
            found_key: [0; 65],
            is_solved: stats.is_solved,
        };
        copy_hex(&mut out.range_start, &stats.range_start);
        copy_hex(&mut out.range_end, &stats.range_end);
        if let Some(key) = &stats.found_key {
            copy_hex(&mut out.found_key, key);
        }
        out
    }
}

fn with_solver<R>(default: R, f: impl FnOnce(&mut KangarooSolver) -> R) -> R {
    let mut guard = SOLVER.lock().unwrap_or_else(|e| e.into_inner());
    match guard.as_mut() {
        Some(solver) => f(solver),
        None => default,
    }
}

/// # Safety
/// The three string arguments must be valid NUL-terminated C strings.
#[no_mangle]
pub unsafe extern "C" fn kangaroo_init(
    pubkey: *const c_char,
    range_start: *const c_char,
    range_end: *const c_char,
    threads: c_int,
    dist_bits: c_int,
) -> bool {
    if pubkey.is_null() || range_start.is_null() || range_end.is_null() {
        return false;
    }
    let (Ok(pubkey), Ok(range_start), Ok(range_end)) = (
        CStr::from_ptr(pubkey).to_str(),
        CStr::from_ptr(range_start).to_str(),
        CStr::from_ptr(range_end).to_str(),
    ) else {
        return false;
    };

    // Dropping the slot stops any prior engine; a failed init leaves no
    // instance behind.
    *SOLVER.lock().unwrap_or_else(|e| e.into_inner()) = None;

    let mut solver = KangarooSolver::new();
    match solver.initialize(pubkey, range_start, range_end, threads, dist_bits) {
        Ok(()) => {
            *SOLVER.lock().unwrap_or_else(|e| e.into_inner()) = Some(solver);
            true
        }
        Err(e) => {
            eprintln!("kangaroo_init: {e}");
            false
        }
    }
}

#[no_mangle]
pub extern "C" fn kangaroo_start() -> bool {
    with_solver(false, |solver| solver.start())
}

#[no_mangle]
pub extern "C" fn kangaroo_stop() {
    with_solver((), |solver| solver.stop());
}

/// # Safety
/// `stats` must point to writable memory for one `KangarooStatsFfi`.
#[no_mangle]
pub unsafe extern "C" fn kangaroo_get_stats(stats: *mut KangarooStatsFfi) -> bool {
    if stats.is_null() {
        return false;
    }
    with_solver(false, |solver| match solver.stats() {
        Some(snapshot) => {
            stats.write(KangarooStatsFfi::from(snapshot));
            true
        }
        None => false,
    })
}

/// # Safety
/// `path` must be a valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn kangaroo_save_checkpoint(path: *const c_char) -> bool {
    if path.is_null() {
        return false;
    }
    let Ok(path) = CStr::from_ptr(path).to_str() else {
        return false;
    };
    with_solver(false, |solver| {
        match solver.save_checkpoint(Path::new(path)) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("kangaroo_save_checkpoint: {e}");
                false
            }
        }
    })
}

/// # Safety
/// `path` must be a valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn kangaroo_load_checkpoint(path: *const c_char) -> bool {
    if path.is_null() {
        return false;
    }
    let Ok(path) = CStr::from_ptr(path).to_str() else {
        return false;
    };
    with_solver(false, |solver| {
        match solver.load_checkpoint(Path::new(path)) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("kangaroo_load_checkpoint: {e}");
                false
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_hex_truncates_and_terminates() {
        let mut buf = [1 as c_char; 65];
        copy_hex(&mut buf, "2A");
        assert_eq!(buf[0], b'2' as c_char);
        assert_eq!(buf[1], b'A' as c_char);
        assert_eq!(buf[2], 0);
        assert_eq!(buf[64], 0);

        let long = "F".repeat(100);
        copy_hex(&mut buf, &long);
        assert_eq!(buf[63], b'F' as c_char);
        assert_eq!(buf[64], 0);
    }
}
