//! Declaration insertion and signature desugaring.

use crate::line::{classify, indent_of, LineKind};
use crate::scan;
use crate::scope::ScopeMap;
use std::collections::HashSet;

fn strip_subscript(s: &str) -> String {
    match (s.find('['), s.rfind(']')) {
        (Some(open), Some(close)) if close > open => {
            format!("{}{}", &s[..open], &s[close + 1..])
        }
        _ => s.to_string(),
    }
}

/// Prefix a top-level `lhs = rhs` assignment with an inferred-type
/// declaration when `lhs` is a single identifier not yet in scope. An
/// already-visible name stays a plain mutation.
pub fn insert_declarations(lines: &[String], scopes: &ScopeMap) -> Vec<String> {
    let empty = HashSet::new();
    lines
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            if matches!(classify(raw), LineKind::LoopHeader) {
                return raw.clone();
            }
            let line = raw.trim_end();
            let eq = match scan::find_str_balanced(line, "= ") {
                Some(p) => p,
                None => return raw.clone(),
            };
            let lhs = &line[..eq];
            let rhs = &line[eq + 2..];
            if scan::split_balanced(lhs, ',').len() > 1 {
                // multi-target assignment, destructuring's territory
                return raw.clone();
            }
            let toks: Vec<&str> = lhs.split_whitespace().collect();
            if toks.len() != 1 {
                return raw.clone();
            }
            let arg = strip_subscript(toks[0]);
            if arg.is_empty() || arg.contains('.') {
                return raw.clone();
            }
            let scope = scopes.get(i).unwrap_or(&empty);
            if scope.contains(arg.as_str()) {
                return raw.clone();
            }
            format!("{}auto {} = {}", " ".repeat(indent_of(line)), arg, rhs)
        })
        .collect()
}

/// Rewrite one parenthesized parameter list: a parameter with two or more
/// tokens sets the running type (all tokens but the last) and names the
/// last; a single-token parameter inherits the nearest preceding explicit
/// type. A bare single-token declarator gains an inferred return type,
/// except for the entry point.
fn rewrite_params(line: &str, open: usize, close: usize) -> String {
    let before = &line[..open];
    let after = &line[close + 1..];
    let mut ty = String::new();
    let mut new_params = Vec::new();

    for param in scan::split_balanced(&line[open + 1..close], ',') {
        let toks: Vec<&str> = param.split_whitespace().collect();
        let var = match toks.len() {
            0 => continue,
            1 => toks[0].to_string(),
            n => {
                ty = toks[..n - 1].join(" ");
                toks[n - 1].to_string()
            }
        };
        new_params.push(format!("{} {}", ty, var).trim().to_string());
    }

    let joined = new_params.join(", ");
    let head: Vec<&str> = before.split_whitespace().collect();
    if head.len() == 1 && before != "main" {
        format!("auto {}({}){}", before, joined, after)
    } else {
        format!("{}({}){}", before, joined, after)
    }
}

/// Give the loop variable of an expanded `for` header an inferred-type
/// declaration when it is a single, member-free token not already in scope.
/// Headers without an initializer (range loops) pass through.
fn declare_loop_var(line: &str, scope: &HashSet<String>) -> String {
    let indent = indent_of(line);
    let sline = line.trim();
    let mut segments: Vec<String> = sline.split(';').map(String::from).collect();
    let head = segments[0]["for ".len()..].to_string();
    // parenthesization may already have wrapped the header
    let (paren, head) = match head.strip_prefix('(') {
        Some(rest) => ("(", rest),
        None => ("", head.as_str()),
    };
    let eq = match scan::find_str_balanced(head, "=") {
        Some(p) => p,
        None => return line.to_string(),
    };
    let lhs = &head[..eq];
    let rhs = head[eq + 1..].trim();

    let mut arg = strip_subscript(lhs).trim().to_string();
    if !arg.contains('.') && arg.split_whitespace().count() == 1 && !scope.contains(&arg) {
        arg = format!("auto {arg}");
    }

    segments[0] = format!("{}for {}{} = {}", " ".repeat(indent), paren, arg, rhs);
    segments.join(";")
}

/// Top-level signature desugaring plus the narrower loop-variable rule.
pub fn desugar_signatures(lines: &[String], scopes: &ScopeMap) -> Vec<String> {
    let empty = HashSet::new();
    lines
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let mut line = raw.clone();
            if indent_of(&line) == 0 {
                if let Some(open) = line.find('(') {
                    if open > 0 {
                        if let Some(close) = line.find(')') {
                            if close > open {
                                line = rewrite_params(&line, open, close);
                            }
                        }
                    }
                }
            }
            if line.trim().starts_with("for ") {
                let scope = scopes.get(i).unwrap_or(&empty);
                line = declare_loop_var(&line, scope);
            }
            line
        })
        .collect()
}

/// Rewrite lines introduced by the function-defining keyword: a definition
/// with a parameter list gains the inferred-type marker, the entry point
/// (and bare names) just lose the keyword.
pub fn imply_functions(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            let cline = line.trim();
            if !cline.starts_with("def ") {
                return line.clone();
            }
            let tokens: Vec<&str> = cline.split_whitespace().collect();
            let next_word = tokens.get(1).copied().unwrap_or("");
            if !next_word.contains('(') || cline.contains("main(") {
                line.replacen("def ", "", 1)
            } else {
                line.replacen("def ", "auto ", 1)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scopes_with(names: &[&str], len: usize) -> ScopeMap {
        let set: HashSet<String> = names.iter().map(|s| s.to_string()).collect();
        vec![set; len]
    }

    #[test]
    fn test_fresh_name_gets_auto() {
        let lines = vec!["    x = 5".to_string()];
        let out = insert_declarations(&lines, &scopes_with(&[], 1));
        assert_eq!(out[0], "    auto x = 5");
    }

    #[test]
    fn test_known_name_stays_mutation() {
        let lines = vec!["    x = 6".to_string()];
        let out = insert_declarations(&lines, &scopes_with(&["x"], 1));
        assert_eq!(out[0], "    x = 6");
    }

    #[test]
    fn test_member_access_stays_mutation() {
        let lines = vec!["    obj.x = 5".to_string()];
        let out = insert_declarations(&lines, &scopes_with(&[], 1));
        assert_eq!(out[0], "    obj.x = 5");
    }

    #[test]
    fn test_subscript_checked_against_base_name() {
        let lines = vec!["    xs[0] = 5".to_string()];
        let out = insert_declarations(&lines, &scopes_with(&["xs"], 1));
        assert_eq!(out[0], "    xs[0] = 5");
    }

    #[test]
    fn test_typed_declaration_untouched() {
        let lines = vec!["    int x = 5".to_string()];
        let out = insert_declarations(&lines, &scopes_with(&[], 1));
        assert_eq!(out[0], "    int x = 5");
    }

    #[test]
    fn test_param_type_carries_forward() {
        let out = rewrite_params("def add(int a, b):", 7, 16);
        assert_eq!(out, "def add(int a, int b):");
    }

    #[test]
    fn test_bare_declarator_gains_auto() {
        let lines = vec!["add(int a, b):".to_string()];
        let out = desugar_signatures(&lines, &scopes_with(&[], 1));
        assert_eq!(out[0], "auto add(int a, int b):");
    }

    #[test]
    fn test_entry_point_keeps_signature() {
        let lines = vec!["main():".to_string()];
        let out = desugar_signatures(&lines, &scopes_with(&[], 1));
        assert_eq!(out[0], "main():");
    }

    #[test]
    fn test_loop_var_declared_when_unknown() {
        let lines = vec!["    for (i = 0; i < n; i++) ".to_string()];
        let out = desugar_signatures(&lines, &scopes_with(&[], 1));
        assert_eq!(out[0], "    for (auto i = 0; i < n; i++)");
    }

    #[test]
    fn test_loop_var_left_when_known() {
        let lines = vec!["    for (i = 0; i < n; i++) ".to_string()];
        let out = desugar_signatures(&lines, &scopes_with(&["i"], 1));
        assert_eq!(out[0], "    for (i = 0; i < n; i++)");
    }

    #[test]
    fn test_range_header_untouched() {
        let lines = vec!["    for (x : items) ".to_string()];
        let out = desugar_signatures(&lines, &scopes_with(&[], 1));
        assert_eq!(out[0], "    for (x : items) ");
    }

    #[test]
    fn test_imply_function_with_params() {
        let lines = vec!["auto add(int a, int b):".to_string()];
        // already desugared lines carry no keyword
        assert_eq!(imply_functions(&lines)[0], "auto add(int a, int b):");
        let lines = vec!["def add(int a, int b):".to_string()];
        assert_eq!(imply_functions(&lines)[0], "auto add(int a, int b):");
    }

    #[test]
    fn test_imply_entry_point_strips_keyword() {
        let lines = vec!["def main():".to_string()];
        assert_eq!(imply_functions(&lines)[0], "main():");
    }
}
