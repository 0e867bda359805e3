#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helpers for reading `{name}` placeholders out of path templates and for
//! deriving dispatch keys and Rust-safe handler names.

/// Converts a mixed-case string (CamelCase or camelCase) to snake_case.
/// Used for converting `operationId` into valid Rust function names.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            for lc in c.to_lowercase() {
                result.push(lc);
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Returns the placeholder names of a path template in order of appearance.
///
/// Rejects unbalanced or nested braces, empty names and repeated names.
/// The error is a plain message; the builder wraps it with the operation.
pub fn extract_placeholders(path: &str) -> Result<Vec<String>, String> {
    let mut names: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for (offset, c) in path.char_indices() {
        match c {
            '{' => {
                if current.is_some() {
                    return Err(format!("nested '{{' at offset {}", offset));
                }
                current = Some(String::new());
            }
            '}' => {
                let name = current
                    .take()
                    .ok_or_else(|| format!("unmatched '}}' at offset {}", offset))?;
                if name.is_empty() {
                    return Err(format!("empty placeholder at offset {}", offset - 1));
                }
                if names.contains(&name) {
                    return Err(format!("placeholder '{{{}}}' appears more than once", name));
                }
                names.push(name);
            }
            _ => {
                if let Some(name) = current.as_mut() {
                    name.push(c);
                }
            }
        }
    }

    if current.is_some() {
        return Err("unterminated '{' placeholder".into());
    }
    Ok(names)
}

/// Rewrites every `{name}` in `path` to `<slot>`, taking slots in order.
///
/// `path` must already have passed [`extract_placeholders`].
pub fn substitute_placeholders(path: &str, slots: &[String]) -> String {
    let mut pattern = String::with_capacity(path.len());
    let mut slots = slots.iter();
    let mut inside = false;

    for c in path.chars() {
        match c {
            '{' => inside = true,
            '}' => {
                inside = false;
                pattern.push('<');
                if let Some(slot) = slots.next() {
                    pattern.push_str(slot);
                }
                pattern.push('>');
            }
            _ if inside => {}
            _ => pattern.push(c),
        }
    }
    pattern
}

/// The stem of a dispatch key: the last non-empty path segment, with
/// placeholder braces removed. A path without segments yields `root`.
///
/// e.g. `/simulation/{simid}/getTime` -> `getTime`, `/hosts/{name}` -> `name`
pub fn dispatch_segment(path: &str) -> String {
    path.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(|segment| segment.replace(['{', '}'], ""))
        .unwrap_or_else(|| "root".to_string())
}
