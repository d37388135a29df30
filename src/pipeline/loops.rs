//! Shorthand loop expansion.
//!
//! `for <var> [<start>] <limit> [<step>]` expands into an explicit
//! three-part loop header; `rof` is the descending mirror image. A header
//! that already carries a statement separator is taken as fully expanded,
//! and a range-style colon (`for x : xs`) marks an already-native loop.

use crate::line::indent_of;

fn is_range_loop(rem: &str) -> bool {
    rem.trim_end_matches(':').contains(':')
}

fn expand(line: &str, keyword: &str, reverse: bool) -> String {
    let sline = line.trim();
    let rest = match sline.strip_prefix(keyword) {
        Some(r) => r,
        None => return line.to_string(),
    };
    if sline.contains(';') || is_range_loop(rest) {
        return line.to_string();
    }

    let rem = rest.trim_end_matches(':');
    let args: Vec<&str> = rem.split_whitespace().collect();
    let ind = " ".repeat(indent_of(line));

    if reverse {
        match args.as_slice() {
            [v, limit] => format!("{ind}for auto {v} = {limit} - 1; {v} >= 0; {v}--"),
            [v, start, limit] => format!("{ind}for auto {v} = {limit} - 1; {v} >= {start}; {v}--"),
            [v, start, limit, step] => {
                format!("{ind}for auto {v} = {limit} - 1; {v} >= {start}; {v} -= {step}")
            }
            _ => line.to_string(),
        }
    } else {
        match args.as_slice() {
            [v, limit] => format!("{ind}for auto {v} = 0; {v} < {limit}; {v}++"),
            [v, start, limit] => format!("{ind}for auto {v} = {start}; {v} < {limit}; {v}++"),
            [v, start, limit, step] => {
                format!("{ind}for auto {v} = {start}; {v} < {limit}; {v} += {step}")
            }
            _ => line.to_string(),
        }
    }
}

/// Expand positive-step `for` shorthand.
pub fn expand_for_shorthand(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| expand(l, "for ", false)).collect()
}

/// Expand the reverse-direction `rof` shorthand.
pub fn expand_rof_shorthand(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| expand(l, "rof ", true)).collect()
}
