//! Reply line tokenizer
//!
//! Splits a line into atoms: runs of non-whitespace, or double-quoted runs
//! (quotes removed, no escaping) that may contain spaces.

/// `hello world "foo bar"` becomes `["hello", "world", "foo bar"]`.
pub fn split_atoms(original: &str) -> Vec<String> {
    let mut atoms = Vec::new();
    let mut rest = original;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(quoted) = rest.strip_prefix('"') {
            if let Some(end) = quoted.find('"') {
                atoms.push(quoted[..end].to_string());
                rest = &quoted[end + 1..];
                continue;
            }
        }

        // An unterminated quote falls back to a bare atom.
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        atoms.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    atoms
}
