//! Declaration/definition splitter for storage-qualified globals.
//!
//! `static`/`extern` lines that carry an initializer cannot stay in a
//! header verbatim: every includer would re-define the symbol. The splitter
//! keeps the declaration in the header and moves a qualified definition
//! into a separate implementation sequence, tracking the class and
//! namespace context the line sits in.

use crate::error::{KakkoError, Result};
use crate::line::indent_of;
use crate::scan;

/// Comment directive that force-skips splitting for the whole file.
pub const NOSPLIT_DIRECTIVE: &str = "@nosplit";

const STORAGE_KEYWORDS: [&str; 2] = ["extern ", "static "];

#[derive(Debug, Clone)]
pub struct GlobalSplit {
    pub header: Vec<String>,
    pub implementation: Vec<String>,
}

/// Detection step: does any line, outside fenced or inline-code text,
/// declare a storage-qualified global with an initializer?
pub fn needs_split(lines: &[String]) -> bool {
    let mut in_block = false;
    let mut found = false;

    for line in lines {
        let t = line.trim();
        if t.starts_with("//") && t.contains(NOSPLIT_DIRECTIVE) {
            return false;
        }
        if t == "```" {
            in_block = !in_block;
            continue;
        }
        if line.starts_with('`') {
            continue;
        }
        if in_block {
            continue;
        }
        if STORAGE_KEYWORDS.iter().any(|d| t.starts_with(d))
            && scan::split_balanced(t, '=').len() > 1
        {
            found = true;
        }
    }

    found
}

/// Split the file into a header sequence and an implementation sequence.
/// With `extract` false the implementation is folded back onto the header
/// after a separating blank line, yielding one combined output.
pub fn split_globals(lines: &[String], extract: bool) -> Result<GlobalSplit> {
    if !needs_split(lines) {
        return Ok(GlobalSplit {
            header: lines.to_vec(),
            implementation: Vec::new(),
        });
    }

    let mut class_stack: Vec<(usize, String)> = Vec::new();
    let mut ns_stack: Vec<usize> = Vec::new();
    let mut namespace_indent: usize = 0;
    let mut header: Vec<String> = Vec::new();
    let mut implementation: Vec<String> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let indent = indent_of(line);
        let t = line.trim();

        if !t.is_empty() {
            while class_stack.last().is_some_and(|(depth, _)| *depth >= indent) {
                class_stack.pop();
            }
        }

        if line.contains('=') {
            if let Some(keyword) = STORAGE_KEYWORDS.iter().find(|d| t.starts_with(*d)) {
                let parts = scan::split_balanced(line, '=');
                let decl = parts[0].replacen(keyword, "", 1);
                header.push(format!("{}{}{}", " ".repeat(indent), keyword, decl.trim()));

                match parts.len() {
                    1 => {}
                    2 => {
                        let prefix = if class_stack.is_empty() {
                            String::new()
                        } else {
                            let names: Vec<&str> =
                                class_stack.iter().map(|(_, n)| n.as_str()).collect();
                            format!("{}::", names.join("::"))
                        };
                        let tokens = scan::split_fields(&decl);
                        if let Some((name, ty)) = tokens.split_last() {
                            implementation.push(format!(
                                "{}{} {}{}={}",
                                " ".repeat(namespace_indent),
                                ty.join(" "),
                                prefix,
                                name,
                                parts[1]
                            ));
                        }
                    }
                    _ => {
                        return Err(KakkoError::MalformedGlobal {
                            line: i + 1,
                            text: t.to_string(),
                        });
                    }
                }
                continue;
            }
        }

        if t.starts_with("class ") || t.starts_with("struct ") {
            let name = t
                .split(':')
                .next()
                .unwrap_or("")
                .split_whitespace()
                .last()
                .unwrap_or("")
                .to_string();
            class_stack.push((indent, name));
        }

        if t.starts_with("namespace") {
            while ns_stack.last().is_some_and(|depth| *depth >= indent) {
                ns_stack.pop();
                namespace_indent = namespace_indent.saturating_sub(2);
            }
            implementation.push(format!(
                "{}{}",
                " ".repeat(namespace_indent),
                line.trim_start()
            ));
            ns_stack.push(indent);
            namespace_indent += 2;
        }

        header.push(line.clone());
    }

    // Still-open namespace blocks are closed by the brace lowering pass when
    // the implementation sequence runs through the pipeline; leave a
    // terminating blank line for it to flush against.
    if !ns_stack.is_empty() {
        implementation.push(String::new());
    }

    if extract {
        Ok(GlobalSplit {
            header,
            implementation,
        })
    } else {
        header.push(String::new());
        header.extend(implementation);
        Ok(GlobalSplit {
            header,
            implementation: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detection_requires_initializer() {
        assert!(needs_split(&lines(&["static int count = 0"])));
        assert!(!needs_split(&lines(&["static int count"])));
        assert!(needs_split(&lines(&["extern int total = 1"])));
        assert!(!needs_split(&lines(&["int count = 0"])));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let src = lines(&["static int count = 0"]);
        assert_eq!(needs_split(&src), needs_split(&src));
    }

    #[test]
    fn test_nosplit_directive_wins() {
        let src = lines(&["// @nosplit", "static int count = 0"]);
        assert!(!needs_split(&src));
    }

    #[test]
    fn test_fenced_block_is_inert() {
        let src = lines(&["```", "static int count = 0", "```"]);
        assert!(!needs_split(&src));
        let src = lines(&["`static int count = 0"]);
        assert!(!needs_split(&src));
    }

    #[test]
    fn test_quoted_equals_not_an_initializer() {
        let src = lines(&[r#"static string s("a=b")"#]);
        assert!(!needs_split(&src));
    }

    #[test]
    fn test_no_split_returns_input_unchanged() {
        let src = lines(&["int x = 1", "x = 2"]);
        let out = split_globals(&src, true).unwrap();
        assert_eq!(out.header, src);
        assert!(out.implementation.is_empty());
    }

    #[test]
    fn test_class_in_namespace_split() {
        let src = lines(&[
            "namespace app:",
            "    class Counter:",
            "        static int count = 0",
            "        def bump():",
            "            count += 1",
        ]);
        let out = split_globals(&src, true).unwrap();
        assert_eq!(out.header[2], "        static int count");
        assert_eq!(out.implementation[0], "namespace app:");
        assert_eq!(out.implementation[1], "  int Counter::count= 0");
        // header keeps everything else verbatim
        assert_eq!(out.header[0], "namespace app:");
        assert_eq!(out.header[4], "            count += 1");
    }

    #[test]
    fn test_class_context_pops_on_dedent() {
        let src = lines(&[
            "class A:",
            "    static int x = 1",
            "class B:",
            "    static int y = 2",
        ]);
        let out = split_globals(&src, true).unwrap();
        assert_eq!(out.implementation[0], "int A::x= 1");
        assert_eq!(out.implementation[1], "int B::y= 2");
    }

    #[test]
    fn test_malformed_initializer_is_fatal() {
        let src = lines(&["static int x = y = 3"]);
        let err = split_globals(&src, true).unwrap_err();
        match err {
            KakkoError::MalformedGlobal { line, text } => {
                assert_eq!(line, 1);
                assert_eq!(text, "static int x = y = 3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fold_back_mode() {
        let src = lines(&["class A:", "    static int x = 1"]);
        let out = split_globals(&src, false).unwrap();
        assert!(out.implementation.is_empty());
        let text = out.header.join("\n");
        assert!(text.contains("static int x"));
        assert!(text.contains("int A::x= 1"));
    }
}
