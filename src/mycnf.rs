//! Credential File Rendering
//!
//! Renders a [`ConnectionRecord`] into the `[client]`-headed `key=value`
//! block the MySQL client reads through its `--defaults-file` mechanism.
//! The text is normally handed to the client over a `/dev/fd` pipe path so
//! it never touches argv or disk; `--mycnf` prints it to stdout instead.
//!
//! Keys are emitted in lexicographic order purely so the output is
//! deterministic and testable.

use crate::record::ConnectionRecord;

/// Header line of a MySQL client options file
const CLIENT_SECTION: &str = "[client]";

/// Render a record as MySQL client options-file text
///
/// The record is normalized first (`adapter` removed, `username` folded into
/// `user`), then keys named in `ignore` are dropped, and the survivors are
/// emitted sorted as `key=value` lines under a `[client]` header. No trailing
/// newline. Takes the record by value; callers wanting to keep the pre-render
/// record pass a clone.
#[must_use]
pub fn render(mut record: ConnectionRecord, ignore: &[String]) -> String {
    record.normalize();
    for key in ignore {
        record.remove(key);
    }

    let mut lines = vec![CLIENT_SECTION.to_string()];
    lines.extend(record.iter().map(|(key, value)| format!("{key}={value}")));
    lines.join("\n")
}

/// Split a comma-separated `--ignore` value into record keys
///
/// Empty segments are dropped, so `"a,,b,"` yields `["a", "b"]`.
#[must_use]
pub fn parse_ignore_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect()
}
