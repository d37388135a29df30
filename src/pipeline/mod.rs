//! The pass pipeline.
//!
//! An ordered sequence of pure line-sequence rewrites that lowers the
//! indentation-structured dialect into linear C++ statements. Order is
//! load-bearing: each pass depends on the textual shape left by the one
//! before it, and the scope map built after shorthand expansion stays
//! index-valid because every pass keeps entries 1:1 with input lines.

mod braces;
mod comments;
mod declare;
mod destructure;
mod io;
mod loops;

pub use braces::{append_terminators, collapse_terminators, lower_indentation};
pub use comments::strip_comments;
pub use declare::{desugar_signatures, imply_functions, insert_declarations};
pub use destructure::{lower_destructuring, TempNames};
pub use io::translate_io;
pub use loops::{expand_for_shorthand, expand_rof_shorthand};

use crate::config::Options;
use crate::line::indent_of;
use crate::scope;

/// Replace tab characters with a fixed-width space run.
pub fn normalize_tabs(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| l.replace('\t', "    ")).collect()
}

/// Wrap the remainder of a branch/loop header in parentheses, stripping a
/// trailing block colon first.
pub fn parenthesize_conditions(lines: &[String]) -> Vec<String> {
    let keywords = ["if ", "while ", "for "];
    lines
        .iter()
        .map(|line| {
            let sline = line.trim();
            for tok in keywords {
                if let Some(rest) = sline.strip_prefix(tok) {
                    let cond = rest.trim_end().trim_end_matches(':');
                    let ind = " ".repeat(indent_of(line));
                    return format!("{ind}{tok}({cond}) ");
                }
            }
            line.clone()
        })
        .collect()
}

/// Translate the no-op keyword into an explicit no-op expression statement.
pub fn translate_pass(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            if line.trim() == "pass" {
                format!("{}(void)0", " ".repeat(indent_of(line)))
            } else {
                line.clone()
            }
        })
        .collect()
}

fn add_source_map(lines: &mut [String], fname: &str) {
    for (i, line) in lines.iter_mut().enumerate() {
        if line.trim().is_empty() || line.contains('\n') {
            continue;
        }
        line.push_str(&format!(" // {}:{}", fname, i + 1));
    }
}

/// Run the full pipeline over one file's lines.
pub fn run(lines: &[String], fname: &str, opts: &Options) -> Vec<String> {
    let mut lines = strip_comments(lines);
    lines = normalize_tabs(&lines);
    if opts.enable_for {
        lines = expand_for_shorthand(&lines);
    }
    if opts.enable_rof {
        lines = expand_rof_shorthand(&lines);
    }

    let scope_map = scope::build_scope_map(&lines);

    if !opts.disable_implication {
        lines = insert_declarations(&lines, &scope_map);
    }
    let mut temps = TempNames::new();
    lines = lower_destructuring(&lines, &scope_map, &mut temps);
    lines = parenthesize_conditions(&lines);
    lines = translate_pass(&lines);
    lines = desugar_signatures(&lines, &scope_map);
    lines = imply_functions(&lines);
    lines = translate_io(&lines);
    lines = append_terminators(&lines);
    lines = lower_indentation(&lines);
    lines = collapse_terminators(&lines);

    if opts.add_source_map {
        add_source_map(&mut lines, fname);
    }
    lines
}
