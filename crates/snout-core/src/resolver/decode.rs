//! Recursive percent-decoding of parameter values.

use std::collections::VecDeque;

use super::candidates::CandidateSet;
use super::sanitize::normalize_token;

/// Breadth-first expansion of `value` into itself plus every distinct
/// percent-decoded form reachable from it.
///
/// Each step tries the literal string and a variant with `+` read as a space.
/// Malformed escapes just end that branch. Bounded by `max_candidates`.
pub fn expand_param_candidates(value: &str, max_candidates: usize) -> Vec<String> {
    let mut queue = VecDeque::from([value.to_string()]);
    let mut candidates = CandidateSet::new(max_candidates);

    while let Some(next) = queue.pop_front() {
        if candidates.is_full() {
            break;
        }
        let current = normalize_token(&next);
        if !candidates.push(current.clone()) {
            continue;
        }

        for decode_input in [current.clone(), current.replace('+', "%20")] {
            let Some(decoded) = percent_decode_strict(&decode_input) else {
                continue;
            };
            let decoded = normalize_token(&decoded);
            if !decoded.is_empty() && !candidates.contains(&decoded) {
                queue.push_back(decoded);
            }
        }
    }

    candidates.into_vec()
}

/// Percent-decodes `input` as UTF-8.
///
/// Returns `None` when an escape is not `%` followed by two hex digits or the
/// decoded bytes are not valid UTF-8. `+` is left untouched.
pub fn percent_decode_strict(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let high = bytes.get(i + 1).copied().and_then(hex_digit)?;
            let low = bytes.get(i + 2).copied().and_then(hex_digit)?;
            out.push(high << 4 | low);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
