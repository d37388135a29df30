//! Destructuring lowering: tuple returns and multi-target assignment.

use crate::line::{classify, indent_of, LineKind};
use crate::scan;
use crate::scope::ScopeMap;
use std::collections::HashSet;

/// Per-invocation source of synthetic temporary names.
#[derive(Debug, Default)]
pub struct TempNames {
    next: usize,
}

impl TempNames {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("unpack_{n}")
    }
}

/// Lower `return a, b, c` into tuple construction and `a, b = rhs` into
/// tuple unpacking. Each rewritten entry stays a single element of the
/// returned sequence even when it expands to several statements (the extra
/// statements are embedded with newlines), so line indices stay aligned for
/// the scope-dependent passes that follow.
pub fn lower_destructuring(
    lines: &[String],
    scopes: &ScopeMap,
    temps: &mut TempNames,
) -> Vec<String> {
    let empty = HashSet::new();
    lines
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let line = raw.trim_end();
            let scope = scopes.get(i).unwrap_or(&empty);

            match classify(line) {
                // a `=` inside a loop header is not a destructuring site
                LineKind::LoopHeader => line.to_string(),
                LineKind::ReturnStatement => lower_return(line),
                _ if line.contains('=') => lower_assignment(line, scope, temps),
                _ => line.to_string(),
            }
        })
        .collect()
}

fn lower_return(line: &str) -> String {
    let indent = indent_of(line);
    let rest = line.trim()["return".len()..].to_string();
    let args = scan::split_balanced(&rest, ',');
    if args.len() > 1 {
        let joined = args
            .iter()
            .map(|a| a.trim())
            .collect::<Vec<_>>()
            .join(", ");
        return format!("{}return make_tuple({})", " ".repeat(indent), joined);
    }
    line.to_string()
}

fn lower_assignment(line: &str, scope: &HashSet<String>, temps: &mut TempNames) -> String {
    let eq = match scan::find_str_balanced(line, "= ") {
        Some(p) => p,
        None => return line.to_string(),
    };
    let lhs = &line[..eq];
    let rhs = &line[eq + 2..];
    let args = scan::split_balanced(lhs, ',');
    if args.len() <= 1 {
        return line.to_string();
    }

    // Ambiguous shape: a space ahead of the first comma. Leave the line to
    // the user rather than guess.
    let sp = lhs.find(' ').map(|v| v as i64).unwrap_or(-1);
    let comma = lhs.find(',').map(|v| v as i64).unwrap_or(-1);
    if sp > comma {
        return line.to_string();
    }

    let indent = indent_of(line);
    let ind = " ".repeat(indent);
    let targets: Vec<&str> = args.iter().map(|a| a.trim()).collect();
    let rhs = rhs.trim();

    if targets.iter().all(|t| scope.contains(*t)) {
        return format!("{}std::tie({}) = {}", ind, targets.join(", "), rhs);
    }

    let temp = temps.alloc();
    let mut out = format!("{}auto {} = {};", ind, temp, rhs);
    for (j, target) in targets.iter().enumerate() {
        if scope.contains(*target) {
            out.push_str(&format!("\n{}{} = get<{}>({});", ind, target, j, temp));
        } else {
            out.push_str(&format!("\n{}auto {} = get<{}>({});", ind, target, j, temp));
        }
    }
    out
}
