//! Inline directive scanning
//!
//! Every inline command's pattern runs over the whole line. The occurrences of
//! all commands are merged by start offset and walked left to right: an
//! occurrence starting inside text already consumed is dropped outright (not
//! retried further along), so its markup stays in the surrounding raw text.
//! Occurrences starting at the same offset keep registration order.

use crate::lesson::ast::Segment;
use crate::lesson::commands::InlineCommand;
use regex::Captures;
use std::sync::Arc;

struct Occurrence<'l, 'c> {
    start: usize,
    end: usize,
    command: &'c dyn InlineCommand,
    captures: Captures<'l>,
}

/// Decode one line into segments.
///
/// Never returns an empty list: a line without any surviving directive comes
/// back as a single raw segment holding the line verbatim.
pub fn scan_segments(line: &str, commands: &[Arc<dyn InlineCommand>]) -> Vec<Segment> {
    let mut occurrences = Vec::new();
    for command in commands {
        for captures in command.pattern().captures_iter(line) {
            if let Some(whole) = captures.get(0) {
                occurrences.push(Occurrence {
                    start: whole.start(),
                    end: whole.end(),
                    command: command.as_ref(),
                    captures,
                });
            }
        }
    }

    // Stable: equal offsets keep command order.
    occurrences.sort_by_key(|occ| occ.start);

    let mut segments = Vec::new();
    let mut cursor = 0;
    for occ in &occurrences {
        if occ.start < cursor {
            continue;
        }
        if occ.start > cursor {
            segments.push(Segment::raw(&line[cursor..occ.start]));
        }
        segments.push(occ.command.parse(&occ.captures));
        cursor = occ.end;
    }

    if cursor < line.len() {
        segments.push(Segment::raw(&line[cursor..]));
    }

    if segments.is_empty() {
        segments.push(Segment::raw(line));
    }
    segments
}
