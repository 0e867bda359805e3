#![deny(missing_docs)]

//! # Block Scanner
//!
//! Line-oriented scanner that finds `BEGIN`/`END` blocks in one source file
//! and binds each block to the `Type::method(` definition that follows it.
//!
//! Between the end sentinel and the definition only blank lines and
//! comment-only lines are allowed.

use crate::annotations::models::{AnnotationBlock, AnnotationSyntax, SourceLocation};
use crate::annotations::payload::{parse_payload, AnnotationPayload};
use crate::error::{AppError, AppResult};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Matches `Type::method(`, also when the type is namespace-qualified.
fn method_definition_re() -> &'static Regex {
    static METHOD_RE: OnceLock<Regex> = OnceLock::new();
    METHOD_RE.get_or_init(|| {
        Regex::new(r"\b(?:[A-Za-z_]\w*::)*([A-Za-z_]\w*)::(~?[A-Za-z_]\w*)\s*\(")
            .expect("Invalid regex")
    })
}

struct PendingBlock {
    begin_line: usize,
    end_line: usize,
    payload: AnnotationPayload,
    raw: serde_json::Value,
}

enum ScanState {
    Outside,
    InBlock { begin_line: usize, body: String },
    AwaitingMethod(PendingBlock),
}

/// Scans one file's contents for documentation blocks.
///
/// # Arguments
///
/// * `source` - File contents.
/// * `file` - Path used in diagnostics and recorded in each block.
/// * `syntax` - Sentinels and comment leaders.
pub fn scan_source(
    source: &str,
    file: &Path,
    syntax: &AnnotationSyntax,
) -> AppResult<Vec<AnnotationBlock>> {
    let leaders = syntax.leaders_longest_first();
    let structure_error = |line: usize, message: String| AppError::AnnotationStructure {
        file: file.to_path_buf(),
        line,
        message,
    };

    let mut blocks = Vec::new();
    let mut state = ScanState::Outside;

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let is_begin = line.contains(&syntax.begin_marker);
        let is_end = !is_begin && line.contains(&syntax.end_marker);

        state = match state {
            ScanState::Outside => {
                if is_begin {
                    ScanState::InBlock {
                        begin_line: line_no,
                        body: String::new(),
                    }
                } else if is_end {
                    return Err(structure_error(
                        line_no,
                        format!(
                            "{} without a preceding {}",
                            syntax.end_marker, syntax.begin_marker
                        ),
                    ));
                } else {
                    ScanState::Outside
                }
            }
            ScanState::InBlock {
                begin_line,
                mut body,
            } => {
                if is_begin {
                    return Err(structure_error(
                        line_no,
                        format!(
                            "{} inside the block opened at line {}",
                            syntax.begin_marker, begin_line
                        ),
                    ));
                } else if is_end {
                    let (payload, raw) = parse_block(&body, file, begin_line, line_no)?;
                    ScanState::AwaitingMethod(PendingBlock {
                        begin_line,
                        end_line: line_no,
                        payload,
                        raw,
                    })
                } else {
                    body.push_str(strip_comment_leader(line, &leaders));
                    body.push('\n');
                    ScanState::InBlock { begin_line, body }
                }
            }
            ScanState::AwaitingMethod(pending) => {
                if is_begin || is_end {
                    return Err(structure_error(
                        pending.end_line,
                        format!(
                            "block ending at line {} is not followed by a method definition before line {}",
                            pending.end_line, line_no
                        ),
                    ));
                }
                if is_comment_or_blank(line, &leaders) {
                    ScanState::AwaitingMethod(pending)
                } else if let Some(caps) = method_definition_re().captures(line) {
                    let type_name = &caps[1];
                    let method_name = &caps[2];
                    tracing::debug!(
                        file = %file.display(),
                        line = line_no,
                        method = %format!("{}::{}", type_name, method_name),
                        "annotation bound to method"
                    );
                    blocks.push(into_block(pending, file, type_name, method_name));
                    ScanState::Outside
                } else {
                    return Err(structure_error(
                        line_no,
                        format!(
                            "expected a `Type::method(...)` definition after the block ending at line {}, found `{}`",
                            pending.end_line,
                            line.trim()
                        ),
                    ));
                }
            }
        };
    }

    match state {
        ScanState::Outside => Ok(blocks),
        ScanState::InBlock { begin_line, .. } => Err(structure_error(
            begin_line,
            format!(
                "{} has no matching {} before end of file",
                syntax.begin_marker, syntax.end_marker
            ),
        )),
        ScanState::AwaitingMethod(pending) => Err(structure_error(
            pending.end_line,
            format!(
                "block ending at line {} is not followed by a method definition before end of file",
                pending.end_line
            ),
        )),
    }
}

fn parse_block(
    body: &str,
    file: &Path,
    begin_line: usize,
    end_line: usize,
) -> AppResult<(AnnotationPayload, serde_json::Value)> {
    let syntax_error = |message: String| AppError::AnnotationSyntax {
        file: file.to_path_buf(),
        begin_line,
        end_line,
        message,
    };
    let raw: serde_json::Value =
        serde_json::from_str(body).map_err(|e| syntax_error(e.to_string()))?;
    let payload = parse_payload(&raw).map_err(syntax_error)?;
    Ok((payload, raw))
}

fn into_block(
    pending: PendingBlock,
    file: &Path,
    type_name: &str,
    method_name: &str,
) -> AnnotationBlock {
    let PendingBlock {
        begin_line,
        end_line,
        payload,
        raw,
    } = pending;
    AnnotationBlock {
        qualified_name: format!("{}::{}", type_name, method_name),
        method_name: method_name.to_string(),
        rest_func: payload.rest_func,
        purpose: payload.purpose,
        json_input: payload.json_input,
        json_output: payload.json_output,
        raw,
        location: SourceLocation {
            file: file.to_path_buf(),
            begin_line,
            end_line,
        },
    }
}

fn strip_comment_leader<'a>(line: &'a str, leaders: &[&str]) -> &'a str {
    let trimmed = line.trim_start();
    leaders
        .iter()
        .find_map(|leader| trimmed.strip_prefix(leader))
        .unwrap_or(trimmed)
}

fn is_comment_or_blank(line: &str, leaders: &[&str]) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with("*/")
        || leaders.iter().any(|leader| trimmed.starts_with(leader))
}
