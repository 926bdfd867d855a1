//! C-callable entry points matching the legacy codec ABI.
//!
//! The legacy shared library is consumed through ctypes with exactly
//! these three symbols. Keeping their names and the byte-count /
//! negative-error return convention lets existing callers relink
//! against the cdylib unchanged.

use std::os::raw::c_int;
use std::slice;

use crate::codec;

// Error codes for the C API
const LZW_ERROR_BUFFER_TOO_SMALL: c_int = -1;
const LZW_ERROR_INVALID_INPUT: c_int = -2;

/// Convert an [`LzwError`](crate::LzwError) to an FFI error code.
fn error_to_code(e: crate::LzwError) -> c_int {
    match e {
        crate::LzwError::BufferTooSmall => LZW_ERROR_BUFFER_TOO_SMALL,
        crate::LzwError::InvalidInput => LZW_ERROR_INVALID_INPUT,
    }
}

/// Compress `insize` bytes at `input` into the `outsize`-byte buffer at
/// `output`.
///
/// Returns the compressed byte count, or a negative error code.
///
/// # Safety
///
/// - `input` must point to at least `insize` readable bytes.
/// - `output` must point to at least `outsize` writable bytes.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn Compress(
    input: *const u8,
    insize: c_int,
    output: *mut u8,
    outsize: c_int,
) -> c_int {
    if input.is_null() || output.is_null() || insize < 0 || outsize < 0 {
        return LZW_ERROR_INVALID_INPUT;
    }

    let input_slice = slice::from_raw_parts(input, insize as usize);
    let output_slice = slice::from_raw_parts_mut(output, outsize as usize);

    match codec::compress_to_buf(input_slice, output_slice) {
        Ok(written) => written as c_int,
        Err(e) => error_to_code(e),
    }
}

/// Decompress `insize` bytes at `input` into the `outsize`-byte buffer
/// at `output`.
///
/// Returns the decompressed byte count, or a negative error code.
///
/// # Safety
///
/// - `input` must point to at least `insize` readable bytes.
/// - `output` must point to at least `outsize` writable bytes.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn Expand(
    input: *const u8,
    insize: c_int,
    output: *mut u8,
    outsize: c_int,
) -> c_int {
    if input.is_null() || output.is_null() || insize < 0 || outsize < 0 {
        return LZW_ERROR_INVALID_INPUT;
    }

    let input_slice = slice::from_raw_parts(input, insize as usize);
    let output_slice = slice::from_raw_parts_mut(output, outsize as usize);

    match codec::expand_to_buf(input_slice, output_slice) {
        Ok(written) => written as c_int,
        Err(e) => error_to_code(e),
    }
}

/// Set the process-wide verbose level; 0 is silent.
#[no_mangle]
pub extern "C" fn set_lzw_verbose(setting: c_int) {
    crate::set_verbose(setting);
}
