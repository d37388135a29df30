//! Statement terminators and indentation-to-brace lowering.

use crate::line::{indent_of, is_visibility_label};

/// Append a statement terminator to every non-blank, non-preprocessor line,
/// except block openers (next line more indented) and lines ending in a
/// continuation marker.
pub fn append_terminators(lines: &[String]) -> Vec<String> {
    let mut indents: Vec<usize> = lines.iter().map(|l| indent_of(l)).collect();
    indents.push(0);

    lines
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let line = raw.trim_end();
            if line.is_empty() || line.starts_with('#') {
                return line.to_string();
            }
            if indents[i] < indents[i + 1] {
                return line.to_string();
            }
            if line.ends_with('\\') {
                return line.to_string();
            }
            format!("{line};")
        })
        .collect()
}

/// Walk the lines with an indent-level stack seeded at depth zero, opening
/// a block on each indent increase and closing one per unit of decrease.
/// Visibility labels are retained verbatim and never open a level; closers
/// attach to the last retained non-blank line, with a top-level terminator
/// whenever the stack returns to depth zero. Remaining levels are flushed
/// at end of input, followed by one blank line.
pub fn lower_indentation(lines: &[String]) -> Vec<String> {
    let mut new_lines: Vec<String> = Vec::with_capacity(lines.len() + 1);
    let mut levels: Vec<usize> = vec![0];
    let mut nb: usize = 0;

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim_end().to_string();
        if line.is_empty() {
            new_lines.push(line);
            continue;
        }
        if is_visibility_label(&line) {
            new_lines.push(line);
            continue;
        }

        let indent = indent_of(&line);

        while *levels.last().unwrap_or(&0) > indent {
            levels.pop();
            new_lines[nb].push_str(" }");
            if *levels.last().unwrap_or(&0) == 0 {
                new_lines[nb].push(';');
            }
        }

        if *levels.last().unwrap_or(&0) < indent {
            if let Some(prev) = new_lines.get_mut(nb) {
                if !is_visibility_label(prev) {
                    levels.push(indent);
                    let opener = prev.trim_end_matches(':').to_string();
                    *prev = opener;
                    prev.push_str(" {");
                }
            }
        }

        new_lines.push(line);
        nb = i;
    }

    while let Some(level) = levels.pop() {
        if new_lines.is_empty() {
            break;
        }
        if level > 0 {
            new_lines[nb].push_str(" }");
        }
        new_lines[nb].push(';');
    }
    new_lines.push(String::new());

    new_lines
}

/// Collapse runs of trailing terminators left by earlier passes.
pub fn collapse_terminators(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| {
            let mut line = l.clone();
            while line.ends_with(";;") {
                line.pop();
            }
            line
        })
        .collect()
}
