//! FFI (Foreign Function Interface) bindings for the plugin manager frontend.
//!
//! This module exposes the load order engine through C-compatible functions
//! so the existing native UI can keep owning the plugin list while the engine
//! does the ordering work.
//!
//! # Memory Management
//!
//! - Rust allocates memory and returns pointers to the caller
//! - The calling code MUST call the corresponding `_free` functions to prevent leaks
//! - Strings are null-terminated UTF-8
//!
//! # Usage from C# (Windows)
//!
//! ```csharp
//! [DllImport("loadorder_core.dll")]
//! private static extern IntPtr loadorder_sorter_new(string templatePath);
//!
//! [DllImport("loadorder_core.dll")]
//! private static extern IntPtr loadorder_sort(IntPtr sorter, string[] plugins, int count);
//!
//! [DllImport("loadorder_core.dll")]
//! private static extern void loadorder_free_string_list(IntPtr list);
//! ```

use crate::config::SorterConfig;
use crate::plugin::PluginEntry;
use crate::sorter::{LoadOrderSorter, ReloadOutcome};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::ptr;
use std::slice;

// ============================================================================
// C-Compatible Types
// ============================================================================

/// Opaque handle to a sorter and its loaded template
pub struct CLoadOrderSorter {
    sorter: LoadOrderSorter,
}

/// Opaque handle to a list of plugin names
pub struct CStringList {
    items: Vec<String>,
}

/// Result of `loadorder_sorter_reload()`
#[repr(C)]
pub enum CReloadResult {
    Unchanged = 0,
    Updated = 1,
    Missing = 2,
    Error = -1,
}

// ============================================================================
// Sorter Lifecycle
// ============================================================================

/// Create a sorter for the template at `template_path`.
/// Pass null to resolve the template from the environment/config file.
/// Returns null if the template exists but cannot be read.
/// Caller MUST call loadorder_sorter_free() when done.
#[no_mangle]
pub extern "C" fn loadorder_sorter_new(template_path: *const c_char) -> *mut CLoadOrderSorter {
    let explicit = if template_path.is_null() {
        None
    } else {
        match unsafe { CStr::from_ptr(template_path) }.to_str() {
            Ok(s) => Some(PathBuf::from(s)),
            Err(_) => return ptr::null_mut(),
        }
    };

    let sorter =
        SorterConfig::resolve(explicit).and_then(|config| LoadOrderSorter::from_config(&config));
    match sorter {
        Ok(sorter) => Box::into_raw(Box::new(CLoadOrderSorter { sorter })),
        Err(e) => {
            tracing::error!("failed to create load order sorter: {e}");
            ptr::null_mut()
        }
    }
}

/// Free a sorter returned by loadorder_sorter_new().
#[no_mangle]
pub extern "C" fn loadorder_sorter_free(sorter: *mut CLoadOrderSorter) {
    if !sorter.is_null() {
        unsafe {
            let _ = Box::from_raw(sorter);
        }
    }
}

/// Returns 1 if a template was found, 0 otherwise.
#[no_mangle]
pub extern "C" fn loadorder_has_master_list(sorter: *const CLoadOrderSorter) -> c_int {
    match unsafe { sorter.as_ref() } {
        Some(handle) => c_int::from(handle.sorter.has_master_list()),
        None => 0,
    }
}

/// Version number from the first line of the template, 0 if unknown.
#[no_mangle]
pub extern "C" fn loadorder_file_version(sorter: *const CLoadOrderSorter) -> c_int {
    match unsafe { sorter.as_ref() } {
        Some(handle) => handle.sorter.file_version(),
        None => 0,
    }
}

/// Re-read the template from disk.
#[no_mangle]
pub extern "C" fn loadorder_sorter_reload(sorter: *mut CLoadOrderSorter) -> CReloadResult {
    let Some(handle) = (unsafe { sorter.as_mut() }) else {
        return CReloadResult::Error;
    };
    match handle.sorter.reload() {
        Ok(ReloadOutcome::Unchanged) => CReloadResult::Unchanged,
        Ok(ReloadOutcome::Updated) => CReloadResult::Updated,
        Ok(ReloadOutcome::Missing) => CReloadResult::Missing,
        Err(e) => {
            tracing::error!("failed to reload load order template: {e}");
            CReloadResult::Error
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// Sort `count` plugin names by template order.
/// Returns a new list; the input is left untouched.
/// Caller MUST call loadorder_free_string_list() when done.
#[no_mangle]
pub extern "C" fn loadorder_sort(
    sorter: *const CLoadOrderSorter,
    plugins: *const *const c_char,
    count: c_int,
) -> *mut CStringList {
    let Some(handle) = (unsafe { sorter.as_ref() }) else {
        return ptr::null_mut();
    };
    let Some(names) = (unsafe { read_string_array(plugins, count) }) else {
        return ptr::null_mut();
    };

    let items = handle.sorter.sort(&names);
    Box::into_raw(Box::new(CStringList { items }))
}

/// Returns 1 if the plugins are already in template order, 0 otherwise.
#[no_mangle]
pub extern "C" fn loadorder_is_sorted(
    sorter: *const CLoadOrderSorter,
    plugins: *const *const c_char,
    count: c_int,
) -> c_int {
    let Some(handle) = (unsafe { sorter.as_ref() }) else {
        return 0;
    };
    match unsafe { read_string_array(plugins, count) } {
        Some(names) => c_int::from(handle.sorter.is_sorted(&names)),
        None => 0,
    }
}

/// Index at which `plugin` should be inserted into the list.
/// Returns -1 on invalid arguments.
#[no_mangle]
pub extern "C" fn loadorder_insertion_index(
    sorter: *const CLoadOrderSorter,
    plugins: *const *const c_char,
    count: c_int,
    plugin: *const c_char,
) -> c_int {
    let Some(handle) = (unsafe { sorter.as_ref() }) else {
        return -1;
    };
    let (Some(names), Some(plugin)) = (unsafe { read_string_array(plugins, count) }, unsafe {
        read_string(plugin)
    }) else {
        return -1;
    };

    handle.sorter.insertion_index(&names, &plugin) as c_int
}

// ============================================================================
// Report
// ============================================================================

/// Generate the load order report.
///
/// `active` and `corrupt` hold one flag per plugin. `masters[i]` points to
/// `master_counts[i]` master names for plugin `i`, and may be null when the
/// plugin declares none. Pass null for `masters` if no plugin declares any.
/// Returns null on invalid arguments.
/// Caller MUST call loadorder_free_string() when done.
#[no_mangle]
pub extern "C" fn loadorder_generate_report(
    sorter: *const CLoadOrderSorter,
    plugins: *const *const c_char,
    active: *const u8,
    corrupt: *const u8,
    masters: *const *const *const c_char,
    master_counts: *const c_int,
    count: c_int,
) -> *mut c_char {
    let Some(handle) = (unsafe { sorter.as_ref() }) else {
        return ptr::null_mut();
    };
    let Some(names) = (unsafe { read_string_array(plugins, count) }) else {
        return ptr::null_mut();
    };
    if !names.is_empty() && (active.is_null() || corrupt.is_null()) {
        return ptr::null_mut();
    }

    let mut entries = Vec::with_capacity(names.len());
    for (i, name) in names.into_iter().enumerate() {
        let declared = if masters.is_null() || master_counts.is_null() {
            Vec::new()
        } else {
            unsafe {
                let list = *masters.add(i);
                if list.is_null() {
                    Vec::new()
                } else {
                    match read_string_array(list, *master_counts.add(i)) {
                        Some(list) => list,
                        None => return ptr::null_mut(),
                    }
                }
            }
        };

        unsafe {
            entries.push(PluginEntry {
                name,
                active: *active.add(i) != 0,
                corrupt: *corrupt.add(i) != 0,
                masters: declared,
            });
        }
    }

    let report = handle.sorter.generate_report(&entries);
    string_to_c_char(&report.to_string())
}

// ============================================================================
// String List Access
// ============================================================================

/// Get the number of names in a list.
#[no_mangle]
pub extern "C" fn loadorder_string_list_count(list: *const CStringList) -> c_int {
    match unsafe { list.as_ref() } {
        Some(list) => list.items.len() as c_int,
        None => 0,
    }
}

/// Get the name at a specific index.
/// Caller MUST call loadorder_free_string() when done.
#[no_mangle]
pub extern "C" fn loadorder_string_list_get(list: *const CStringList, index: c_int) -> *mut c_char {
    let Some(list) = (unsafe { list.as_ref() }) else {
        return ptr::null_mut();
    };
    usize::try_from(index)
        .ok()
        .and_then(|idx| list.items.get(idx))
        .map_or(ptr::null_mut(), |item| string_to_c_char(item))
}

/// Free a list returned by loadorder_sort().
#[no_mangle]
pub extern "C" fn loadorder_free_string_list(list: *mut CStringList) {
    if !list.is_null() {
        unsafe {
            let _ = Box::from_raw(list);
        }
    }
}

/// Free a string returned by FFI functions.
#[no_mangle]
pub extern "C" fn loadorder_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn string_to_c_char(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

unsafe fn read_string(s: *const c_char) -> Option<String> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok().map(str::to_string)
}

/// Copies `count` C strings into owned Rust strings.
/// Returns None on a null array, a negative count, or a null/non-UTF-8 entry.
unsafe fn read_string_array(items: *const *const c_char, count: c_int) -> Option<Vec<String>> {
    let count = usize::try_from(count).ok()?;
    if count == 0 {
        return Some(Vec::new());
    }
    if items.is_null() {
        return None;
    }
    slice::from_raw_parts(items, count)
        .iter()
        .map(|&item| read_string(item))
        .collect()
}
