//! Scope engine: indentation-keyed symbol visibility.
//!
//! For every input line this computes the set of identifier names visible at
//! that line's indentation. Frames are kept in a table keyed by indent depth
//! alongside a stack of open depths; entering a deeper block copies the
//! enclosing frame, so declarations inside the block never leak back out.
//! A block opener's own declarations (parameters, loop variables) are placed
//! in the child frame created for the following, deeper-indented line.

use crate::line::{indent_of, is_blank, is_preprocessor, is_visibility_label};
use crate::scan;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Per-line snapshots of visible identifier names, indexed by line number.
pub type ScopeMap = Vec<HashSet<String>>;

/// Statement keywords that disqualify a line from declaring anything.
static STMT_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "if", "else", "elif", "while", "do", "switch", "case", "default", "return", "break",
        "continue", "goto", "pass", "print", "puts", "read", "using", "delete", "class", "struct",
        "namespace", "template", "typedef", "public", "private",
    ]
    .into_iter()
    .collect()
});

/// Build the visibility snapshot for every line. The snapshot for line `i`
/// is taken before that line's own declarations; a name declared on line `i`
/// becomes visible at line `i + 1`, never retroactively.
pub fn build_scope_map(lines: &[String]) -> ScopeMap {
    let mut frames: HashMap<usize, HashSet<String>> = HashMap::new();
    frames.insert(0, HashSet::new());
    let mut levels: Vec<usize> = vec![0];
    let mut nb: usize = 0;
    let mut map: ScopeMap = Vec::with_capacity(lines.len());

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim_end();
        let indent = indent_of(line);
        let mut cur = indent;
        frames.entry(cur).or_default();
        map.push(frames[&cur].clone());

        if is_blank(line) {
            continue;
        }
        if is_visibility_label(line) {
            continue;
        }

        while *levels.last().unwrap_or(&0) > indent {
            levels.pop();
            cur = *levels.last().unwrap_or(&0);
        }

        if *levels.last().unwrap_or(&0) < indent && !is_visibility_label(&lines[nb]) {
            levels.push(indent);
            let inherited = frames[&cur].clone();
            frames.insert(indent, inherited);
            cur = indent;
        }

        // A block opener's declarations belong to the block it opens.
        if i + 1 < lines.len() {
            let next_indent = indent_of(&lines[i + 1]);
            if indent < next_indent {
                let inherited = frames[&cur].clone();
                frames.insert(next_indent, inherited);
                cur = next_indent;
            }
        }

        if let Some(frame) = frames.get_mut(&cur) {
            harvest(line, frame);
        }
        nb = i;
    }

    map
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Record the declared name of an assignment/extraction target: the last
/// whitespace token, with any trailing subscript stripped. Targets with a
/// member access are mutations, not declarations.
fn declare_target(target: &str, names: &mut HashSet<String>) {
    let tok = match target.split_whitespace().last() {
        Some(t) => t,
        None => return,
    };
    let tok = match tok.find('[') {
        Some(b) => &tok[..b],
        None => tok,
    };
    if tok.contains('.') || !is_identifier(tok) {
        return;
    }
    names.insert(tok.to_string());
}

fn first_word(s: &str) -> &str {
    s.split_whitespace().next().unwrap_or("")
}

/// Collect the names a line declares into `names`.
fn harvest(raw: &str, names: &mut HashSet<String>) {
    if is_blank(raw) || is_visibility_label(raw) || is_preprocessor(raw.trim_start()) {
        return;
    }
    let trimmed = raw.trim();
    let had_colon = trimmed.ends_with(':');
    let t = trimmed.trim_end_matches(':').trim_end();

    // Loop headers declare their loop variable, whether the header is
    // expanded (`for auto i = 0; ...`) or range-style (`for x : xs`).
    if let Some(rest) = t.strip_prefix("for ") {
        let head = rest.split(';').next().unwrap_or("").trim_start_matches('(');
        if let Some(eq) = scan::find_str_balanced(head, "=") {
            declare_target(&head[..eq], names);
        } else if let Some(colon) = scan::find_str_balanced(head, ":") {
            declare_target(&head[..colon], names);
        }
        return;
    }

    if STMT_KEYWORDS.contains(first_word(t)) {
        return;
    }

    // Block-opening signature: the parameters (and the name) are visible in
    // the body.
    if had_colon && t.contains('(') {
        if let (Some(open), Some(close)) = (t.find('('), t.rfind(')')) {
            if close > open {
                if let Some(name) = t[..open].split_whitespace().last() {
                    if is_identifier(name) {
                        names.insert(name.to_string());
                    }
                }
                for field in scan::split_balanced(&t[open + 1..close], ',') {
                    if !field.trim().is_empty() {
                        declare_target(&field, names);
                    }
                }
                return;
            }
        }
    }

    if let Some(eq) = scan::find_str_balanced(t, "= ") {
        let lhs = &t[..eq];
        let fields = scan::split_balanced(lhs, ',');
        if fields.len() > 1 {
            for field in &fields {
                if field.split_whitespace().count() == 1 {
                    declare_target(field, names);
                }
            }
        } else {
            // Single target: either `x = rhs` or a typed `int x = rhs`.
            declare_target(lhs, names);
        }
        return;
    }

    // Typed declaration without initializer, e.g. `int count`.
    let toks: Vec<&str> = t.split_whitespace().collect();
    if toks.len() >= 2
        && !t.contains('(')
        && !t.contains('=')
        && toks.iter().all(|tok| {
            tok.chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '*' || c == '&' || c == '[' || c == ']')
        })
    {
        declare_target(t, names);
    }
}
