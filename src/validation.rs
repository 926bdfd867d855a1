//! Whole-codec validation: round trips and stream structure.
//!
//! Covers round-trip identity and bit-identical recompression across a
//! spread of input shapes, a structural walk of the emitted stream
//! (control codes land exactly where the width/flush schedule demands,
//! and every data code is defined when it arrives), and the threshold
//! crossings at 511 and 32767 together with truncated-stream behavior.
#[cfg(test)]
mod tests {
    use crate::bitstream::BitReader;
    use crate::codec;
    use crate::dict::{
        BITS, BUMP_CODE, END_OF_STREAM, FIRST_CODE, FLUSH_CODE, INITIAL_CODE_BITS, MAX_CODE,
    };

    // ---------------------------------------------------------------
    // Helpers: test vectors and a structural stream walker
    // ---------------------------------------------------------------

    /// One byte repeated; the dictionary grows triangular runs.
    fn run_of(byte: u8, len: usize) -> Vec<u8> {
        vec![byte; len]
    }

    /// All 256 byte values in ascending order, so no pair ever repeats.
    fn byte_ramp() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// A short phrase tiled out to `len` bytes; heavy string reuse.
    fn tiled_phrase(len: usize) -> Vec<u8> {
        let phrase: &[u8] = b"rain over the alps, snow above the treeline; ";
        let mut data = phrase.repeat(len / phrase.len() + 1);
        data.truncate(len);
        data
    }

    /// Wrapping byte counter; structured, but the strings keep shifting.
    fn counter_wave(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i & 0xff) as u8).collect()
    }

    /// Deterministic noise (splitmix64). Matches are rare, so learned
    /// codes pile up about as fast as the input arrives.
    fn noise(len: usize, mut seed: u64) -> Vec<u8> {
        (0..len)
            .map(|_| {
                seed = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
                let mut z = seed;
                z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
                (z ^ (z >> 31)) as u8
            })
            .collect()
    }

    /// Walk a compressed stream with full decoder bookkeeping, checking
    /// the structural invariants along the way. Returns the number of
    /// bumps and flushes encountered.
    fn check_stream_structure(stream: &[u8]) -> (usize, usize) {
        let mut reader = BitReader::new(stream);
        let mut width = INITIAL_CODE_BITS;
        let mut next_code = FIRST_CODE;
        let mut bumps = 0;
        let mut flushes = 0;
        let mut first_of_pass = true;
        loop {
            let code = match reader.read_bits(width) {
                Some(code) => code,
                None => panic!("stream ended without END_OF_STREAM"),
            };
            assert!((INITIAL_CODE_BITS..=BITS).contains(&width));
            match code {
                END_OF_STREAM => return (bumps, flushes),
                BUMP_CODE => {
                    assert!(width < BITS, "bump past the 15-bit ceiling");
                    width += 1;
                    bumps += 1;
                }
                FLUSH_CODE => {
                    width = INITIAL_CODE_BITS;
                    next_code = FIRST_CODE;
                    flushes += 1;
                    first_of_pass = true;
                }
                _ => {
                    if first_of_pass {
                        assert!(code <= 0xff, "pass must open with a literal");
                        first_of_pass = false;
                    } else {
                        assert!(code <= next_code, "data code not yet defined");
                        assert!(next_code <= MAX_CODE, "code space overrun");
                        next_code += 1;
                    }
                }
            }
        }
    }

    // ---------------------------------------------------------------
    // 1. Round trips and determinism over the vector set
    // ---------------------------------------------------------------

    macro_rules! round_trip_test {
        ($name:ident, $data:expr) => {
            mod $name {
                use super::*;

                #[test]
                fn round_trip() {
                    let input = $data;
                    let compressed = codec::compress(&input).unwrap();
                    let decompressed = codec::expand(&compressed, input.len()).unwrap();
                    assert_eq!(decompressed, input);
                }

                #[test]
                fn recompress_is_bit_identical() {
                    let input = $data;
                    let compressed = codec::compress(&input).unwrap();
                    let decompressed = codec::expand(&compressed, input.len()).unwrap();
                    let recompressed = codec::compress(&decompressed).unwrap();
                    assert_eq!(recompressed, compressed);
                }

                #[test]
                fn stream_structure() {
                    let input = $data;
                    let compressed = codec::compress(&input).unwrap();
                    check_stream_structure(&compressed);
                }
            }
        };
    }

    round_trip_test!(single_byte_run, run_of(0, 4096));
    round_trip_test!(ascending_bytes, byte_ramp());
    round_trip_test!(tiled_text, tiled_phrase(4600));
    round_trip_test!(counter_wave_8k, counter_wave(8192));
    round_trip_test!(noise_64k, noise(65536, 1));

    // ---------------------------------------------------------------
    // 2. Width-bump schedule
    // ---------------------------------------------------------------

    #[test]
    fn single_bump_at_first_threshold() {
        // 600 bytes with mostly-distinct pairs push next_code just past
        // 511: exactly one bump, no flush
        let input = counter_wave(600);
        let compressed = codec::compress(&input).unwrap();
        let (bumps, flushes) = check_stream_structure(&compressed);
        assert_eq!(bumps, 1);
        assert_eq!(flushes, 0);

        // The bump itself is a 9-bit code; everything after it is 10-bit
        let mut reader = BitReader::new(&compressed);
        let mut width = INITIAL_CODE_BITS;
        loop {
            let code = reader.read_bits(width).unwrap();
            if code == BUMP_CODE {
                assert_eq!(width, INITIAL_CODE_BITS);
                width += 1;
                continue;
            }
            if code == END_OF_STREAM {
                break;
            }
            if width == INITIAL_CODE_BITS {
                assert!(code <= 511);
            }
        }
        assert_eq!(width, INITIAL_CODE_BITS + 1);

        let decompressed = codec::expand(&compressed, input.len()).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn multiple_bumps_on_random_data() {
        let input = noise(65536, 7);
        let compressed = codec::compress(&input).unwrap();
        let (bumps, _) = check_stream_structure(&compressed);
        assert!(bumps >= 2, "expected several width bumps, got {}", bumps);
    }

    // ---------------------------------------------------------------
    // 3. Dictionary flush
    // ---------------------------------------------------------------

    #[test]
    fn flush_when_code_space_exhausted() {
        // Pseudo-random data fills the code space in well under 200 KiB
        let input = noise(200_000, 42);
        let compressed = codec::compress(&input).unwrap();
        let (_, flushes) = check_stream_structure(&compressed);
        assert!(flushes >= 1, "expected at least one flush");

        let decompressed = codec::expand(&compressed, input.len()).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn compressible_data_across_flush() {
        // Text mixed with pseudo-random stretches, long enough to flush
        // and keep going
        let mut input = Vec::new();
        for chunk in 0..8 {
            input.extend_from_slice(&noise(30_000, chunk));
            input.extend_from_slice(&tiled_phrase(4600));
        }
        let compressed = codec::compress(&input).unwrap();
        let (_, flushes) = check_stream_structure(&compressed);
        assert!(flushes >= 1);

        let decompressed = codec::expand(&compressed, input.len()).unwrap();
        assert_eq!(decompressed, input);
    }

    // ---------------------------------------------------------------
    // 4. Boundary conditions
    // ---------------------------------------------------------------

    #[test]
    fn long_single_byte_run() {
        let input = run_of(b'x', 40_000);
        let compressed = codec::compress(&input).unwrap();
        check_stream_structure(&compressed);
        let decompressed = codec::expand(&compressed, input.len()).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn truncation_always_yields_a_prefix() {
        let input = tiled_phrase(4600);
        let compressed = codec::compress(&input).unwrap();
        for cut in [2, compressed.len() / 2, compressed.len() - 1] {
            let decompressed = codec::expand(&compressed[..cut], input.len()).unwrap();
            assert!(
                input.starts_with(&decompressed),
                "cut at {} produced non-prefix output",
                cut
            );
        }
    }

    #[test]
    fn exact_output_capacity_suffices() {
        let input = tiled_phrase(4600);
        let compressed = codec::compress(&input).unwrap();
        let mut output = vec![0u8; input.len()];
        let written = codec::expand_to_buf(&compressed, &mut output).unwrap();
        assert_eq!(written, input.len());
        assert_eq!(output, input);
    }
}
