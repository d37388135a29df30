//! Shorthand I/O translation.
//!
//! Input-sigil lines interleave reads (bare tokens) and prompts (quoted
//! tokens); the groups are flushed in order whenever the token kind flips.
//! Print-sigil lines build one chained output statement.

use crate::line::indent_of;
use crate::scan;
use once_cell::sync::Lazy;

static READ_TOKENS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["? ", "read ", "?? "]);
static PRINT_TOKENS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["!", "std::cout ", "cout ", "print "]);

pub fn translate_io(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            let indent = indent_of(line);
            let sline = line.trim();

            let read_token = READ_TOKENS
                .iter()
                .copied()
                .filter(|tok| sline.starts_with(tok))
                .last();

            match read_token {
                Some(tok) => read_line(sline, indent, tok),
                None => print_line(line, sline, indent),
            }
        })
        .collect()
}

fn read_line(sline: &str, indent: usize, token: &str) -> String {
    let args = scan::split_fields(&sline[token.len()..]);
    let mut tokens: Vec<String> = Vec::new();
    let mut cin_tokens: Vec<String> = Vec::new();
    let mut cout_tokens: Vec<String> = Vec::new();

    for arg in &args {
        if !arg.starts_with('"') {
            if !cout_tokens.is_empty() {
                tokens.push("std::cout".to_string());
                tokens.append(&mut cout_tokens);
                tokens.push(";".to_string());
            }
            cin_tokens.push(">>".to_string());
            cin_tokens.push(arg.clone());
        } else {
            if !cin_tokens.is_empty() {
                tokens.push("std::cin".to_string());
                tokens.append(&mut cin_tokens);
                tokens.push(";".to_string());
            }
            cout_tokens.push("<<".to_string());
            cout_tokens.push(arg.clone());
        }
    }

    if !cout_tokens.is_empty() {
        tokens.push("std::cout".to_string());
        tokens.append(&mut cout_tokens);
        tokens.push(";".to_string());
    }
    if !cin_tokens.is_empty() {
        tokens.push("std::cin".to_string());
        tokens.append(&mut cin_tokens);
        tokens.push(";".to_string());
    }

    format!("{}{}", " ".repeat(indent), tokens.join(" "))
}

fn print_line(raw: &str, sline: &str, indent: usize) -> String {
    let ind = " ".repeat(indent);

    // no-newline variants
    let no_newline = if sline.starts_with("!!") {
        Some("!!")
    } else if sline.starts_with("puts ") {
        Some("puts ")
    } else {
        None
    };
    if let Some(tok) = no_newline {
        let args = scan::split_fields(sline[tok.len()..].trim_start());
        if !args.is_empty() {
            return format!("{}std::cout << {}", ind, args.join(" << "));
        }
        return format!("{}std::cout << \"\"", ind);
    }

    if sline == "print" {
        return format!("{}std::cout << std::endl", ind);
    }

    let mut out = raw.to_string();
    for tok in PRINT_TOKENS.iter() {
        if !sline.starts_with(tok) {
            continue;
        }
        let args = scan::split_fields(&sline[tok.len()..]);
        if args.iter().any(|a| a == "<<") {
            // already an explicit stream statement
            continue;
        }
        out = if args.is_empty() {
            format!("{}std::cout << std::endl", ind)
        } else {
            format!(
                "{}std::cout << {} << std::endl",
                ind,
                args.join(" << ' ' << ")
            )
        };
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn one(line: &str) -> String {
        translate_io(&[line.to_string()]).remove(0)
    }

    #[test]
    fn test_read_groups_flush_on_kind_change() {
        assert_eq!(
            one(r#"? name "enter age" age"#),
            r#"std::cin >> name ; std::cout << "enter age" ; std::cin >> age ;"#
        );
    }

    #[test]
    fn test_read_single_variable() {
        assert_eq!(one("? count"), "std::cin >> count ;");
        assert_eq!(one("read count"), "std::cin >> count ;");
    }

    #[test]
    fn test_print_with_separator_and_newline() {
        assert_eq!(
            one(r#"print "total" total"#),
            r#"std::cout << "total" << ' ' << total << std::endl"#
        );
    }

    #[test]
    fn test_bare_print_emits_newline() {
        assert_eq!(one("print"), "std::cout << std::endl");
    }

    #[test]
    fn test_no_newline_variants() {
        assert_eq!(one(r#"!! "go""#), r#"std::cout << "go""#);
        assert_eq!(one(r#"puts "go""#), r#"std::cout << "go""#);
    }

    #[test]
    fn test_bang_prints_with_newline() {
        assert_eq!(one("! x"), "std::cout << x << std::endl");
    }

    #[test]
    fn test_explicit_stream_line_untouched() {
        let line = r#"    cout << "already" << x"#;
        assert_eq!(one(line), line);
    }

    #[test]
    fn test_indent_preserved() {
        assert_eq!(one("    print x"), "    std::cout << x << std::endl");
    }

    #[test]
    fn test_non_io_line_untouched() {
        assert_eq!(one("    x = 5"), "    x = 5");
    }
}
