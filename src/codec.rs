//! Variable-width LZW compression and expansion.
//!
//! The compressor learns prefix+byte strings in a hashed dictionary and
//! emits their codes through a bit-packed stream, starting at 9 bits per
//! code and widening one bit at a time up to 15 as the dictionary grows.
//! Control signals travel in-band:
//!
//! ```text
//! 0..=255   literal byte codes
//! 256       END_OF_STREAM   terminates the payload
//! 257       BUMP_CODE       decoder widens codes by one bit
//! 258       FLUSH_CODE      decoder reinitializes its dictionary
//! 259..     learned strings
//! ```
//!
//! Codes are packed MSB-first and the final byte is zero padded. Both
//! control codes are emitted at the width in effect before they take
//! effect. There is no length framing: callers state output capacities,
//! and the decoder of a truncated stream yields a prefix of the
//! original data.

use crate::bitstream::{BitReader, BitWriter};
use crate::dict::{
    DecodeDict, EncodeDict, BITS, BUMP_CODE, END_OF_STREAM, FLUSH_CODE, MAX_CODE, TABLE_SIZE,
};
use crate::{LzwError, LzwResult};

/// Compress `input` into `output`, returning the number of bytes
/// written.
///
/// Fails with [`LzwError::BufferTooSmall`] when the packed stream would
/// exceed the output capacity; whatever was already written must be
/// treated as undefined.
pub fn compress_to_buf(input: &[u8], output: &mut [u8]) -> LzwResult<usize> {
    let mut reader = BitReader::new(input);
    let mut writer = BitWriter::new(output);
    let mut dict = EncodeDict::new();

    let mut string_code = match reader.read_byte() {
        Some(byte) => byte as u16,
        None => END_OF_STREAM,
    };

    while let Some(byte) = reader.read_byte() {
        let index = dict.find_child(string_code, byte);
        match dict.code_at(index) {
            Some(code) => string_code = code,
            None => {
                dict.insert(index, string_code, byte);
                writer.write_bits(string_code, dict.code_bits)?;
                string_code = byte as u16;
                if dict.next_code > MAX_CODE {
                    writer.write_bits(FLUSH_CODE, dict.code_bits)?;
                    dict.reset();
                } else if dict.next_code > dict.next_bump_code {
                    writer.write_bits(BUMP_CODE, dict.code_bits)?;
                    dict.bump();
                    if crate::verbose_level() > 0 {
                        eprint!("B");
                    }
                }
            }
        }
    }

    // Empty input compresses to a bare terminator.
    if string_code != END_OF_STREAM {
        writer.write_bits(string_code, dict.code_bits)?;
    }
    writer.write_bits(END_OF_STREAM, dict.code_bits)?;
    writer.finish()
}

/// Compress into a freshly allocated buffer.
pub fn compress(input: &[u8]) -> LzwResult<Vec<u8>> {
    let mut output = vec![0u8; compress_bound(input.len())];
    let written = compress_to_buf(input, &mut output)?;
    output.truncate(written);
    Ok(output)
}

/// Conservative upper bound on the compressed size of `input_len`
/// bytes: every input byte emits at most one code of at most 15 bits,
/// and control codes add a handful of bits per dictionary generation.
pub fn compress_bound(input_len: usize) -> usize {
    2 * input_len + 32
}

/// Decompress `input` into `output`, returning the decompressed length.
///
/// Truncated streams terminate cleanly with a prefix of the original
/// data; structurally invalid streams fail with
/// [`LzwError::InvalidInput`], and an `output` too small for the decoded
/// data fails with [`LzwError::BufferTooSmall`].
pub fn expand_to_buf(input: &[u8], output: &mut [u8]) -> LzwResult<usize> {
    let mut reader = BitReader::new(input);
    let mut writer = BitWriter::new(output);
    let mut dict = DecodeDict::new();
    let mut stack: Vec<u8> = Vec::new();

    // Each pass of the outer loop decodes one dictionary generation;
    // FLUSH_CODE ends a pass, and the reset here resynchronizes with the
    // encoder's post-flush state.
    loop {
        dict.reset();
        let first = reader.read_bits(dict.code_bits).unwrap_or(END_OF_STREAM);
        if first == END_OF_STREAM {
            return writer.finish();
        }
        // The first code of a pass can only name a single byte; nothing
        // longer is defined yet.
        if first > 0xff {
            return Err(LzwError::InvalidInput);
        }
        let mut old_code = first;
        let mut character = first as u8;
        writer.put_byte(character)?;

        loop {
            let new_code = reader.read_bits(dict.code_bits).unwrap_or(END_OF_STREAM);
            if new_code == END_OF_STREAM {
                return writer.finish();
            }
            if new_code == FLUSH_CODE {
                break;
            }
            if new_code == BUMP_CODE {
                if dict.code_bits == BITS {
                    return Err(LzwError::InvalidInput);
                }
                dict.code_bits += 1;
                continue;
            }
            if new_code > dict.next_code {
                return Err(LzwError::InvalidInput);
            }
            stack.clear();
            character = if new_code == dict.next_code {
                // The encoder defined this code and used it at once
                // (string+char+string+char+string): its expansion is the
                // previous string extended by that string's first byte.
                stack.push(character);
                decode_string(&dict, &mut stack, old_code)?
            } else {
                decode_string(&dict, &mut stack, new_code)?
            };
            while let Some(byte) = stack.pop() {
                writer.put_byte(byte)?;
            }
            dict.push_entry(old_code, character)?;
            old_code = new_code;
        }
    }
}

/// Decompress into a freshly allocated buffer of at most
/// `max_decoded_len` bytes. The stream carries no length framing, so
/// the caller states the bound (legacy callers record the decoded size
/// out of band).
pub fn expand(input: &[u8], max_decoded_len: usize) -> LzwResult<Vec<u8>> {
    let mut output = vec![0u8; max_decoded_len];
    let written = expand_to_buf(input, &mut output)?;
    output.truncate(written);
    Ok(output)
}

/// Walk `code -> parent -> ...` pushing each appended byte, ending with
/// the literal that roots the chain, and return that literal (the first
/// byte of the string). Popping the stack then yields the string in
/// forward order. The step guard catches corrupted chains.
fn decode_string(dict: &DecodeDict, stack: &mut Vec<u8>, mut code: u16) -> LzwResult<u8> {
    while code > 0xff {
        if stack.len() >= TABLE_SIZE {
            return Err(LzwError::InvalidInput);
        }
        let (parent, byte) = dict.entry(code);
        stack.push(byte);
        code = parent;
    }
    let literal = code as u8;
    stack.push(literal);
    Ok(literal)
}
