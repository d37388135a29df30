//! Comment stripping.
//!
//! Operates on the joined source so block comments may span lines; every
//! newline inside a removed comment is kept, so the line count (and the
//! line numbering the scope map depends on) never changes.

/// Remove `//` and `/* */` comment text, leaving string/char literal
/// contents untouched.
pub fn strip_comments(lines: &[String]) -> Vec<String> {
    let source = lines.join("\n");
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                let quote = c;
                out.push(c);
                i += 1;
                let mut escaped = false;
                while i < chars.len() {
                    let d = chars[i];
                    out.push(d);
                    i += 1;
                    if escaped {
                        escaped = false;
                    } else if d == '\\' {
                        escaped = true;
                    } else if d == quote || d == '\n' {
                        // an unterminated literal ends at the line break
                        break;
                    }
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() {
                    if chars[i] == '\n' {
                        out.push('\n');
                        i += 1;
                    } else if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 2;
                        out.push(' ');
                        break;
                    } else {
                        i += 1;
                    }
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out.split('\n').map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_line_comment_removed() {
        let out = strip_comments(&lines(&["x = 5 // five", "y = 6"]));
        assert_eq!(out, vec!["x = 5 ", "y = 6"]);
    }

    #[test]
    fn test_block_comment_preserves_line_count() {
        let out = strip_comments(&lines(&["a /* one", "two", "three */ b", "c"]));
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], "a ");
        assert_eq!(out[1], "");
        assert_eq!(out[2], "  b");
        assert_eq!(out[3], "c");
    }

    #[test]
    fn test_literals_untouched() {
        let out = strip_comments(&lines(&[r#"s = "http://x" // trailing"#]));
        assert_eq!(out, vec![r#"s = "http://x" "#]);
        let out = strip_comments(&lines(&["c = '/'"]));
        assert_eq!(out, vec!["c = '/'"]);
    }
}
