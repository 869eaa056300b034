use std::str;

/// Signatures in real class files are short; larger inputs only slow the fuzzer down.
pub const MAX_INPUT_SIZE: usize = 16 * 1024;

/// Returns a UTF-8 view of `data` truncated to `MAX_INPUT_SIZE`, or `None` if it is not UTF-8.
///
/// Up to 3 bytes are trimmed when the cut splits a multibyte codepoint.
#[inline]
pub fn truncate_utf8(data: &[u8]) -> Option<&str> {
    let cap = data.len().min(MAX_INPUT_SIZE);
    (0..=3.min(cap)).find_map(|trim| str::from_utf8(&data[..cap - trim]).ok())
}
