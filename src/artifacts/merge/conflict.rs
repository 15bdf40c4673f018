//! Conflict markers
//!
//! A file changed differently on both sides of a merge is replaced by both
//! versions between markers:
//!
//! ```text
//! <<<<<<< HEAD
//! {head content}
//! =======
//! {target content}
//! >>>>>>>
//! ```
//!
//! A side that was deleted contributes empty content.

use bytes::Bytes;

const HEAD_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR_MARKER: &[u8] = b"=======\n";
const END_MARKER: &[u8] = b">>>>>>>\n";

/// Combine both versions of a conflicted file
pub fn render_conflict(head: &[u8], target: &[u8]) -> Bytes {
    let mut content = Vec::with_capacity(
        HEAD_MARKER.len() + SEPARATOR_MARKER.len() + END_MARKER.len() + head.len() + target.len() + 2,
    );

    content.extend_from_slice(HEAD_MARKER);
    push_side(&mut content, head);
    content.extend_from_slice(SEPARATOR_MARKER);
    push_side(&mut content, target);
    content.extend_from_slice(END_MARKER);

    Bytes::from(content)
}

// each side ends on its own line so the next marker starts a line
fn push_side(content: &mut Vec<u8>, side: &[u8]) {
    content.extend_from_slice(side);
    if !side.is_empty() && !side.ends_with(b"\n") {
        content.push(b'\n');
    }
}
