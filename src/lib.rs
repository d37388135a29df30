//! kakko - indentation-structured C++ dialect to C++ transpiler
//!
//! # Overview
//! Lowers an indentation-delimited surface syntax into brace-delimited C++
//! source text through a pipeline of line-oriented rewrite passes, with an
//! optional header/implementation split for storage-qualified globals.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod globals;
pub mod line;
pub mod pipeline;
pub mod scan;
pub mod scope;

pub use config::Options;
pub use error::{KakkoError, Result};

/// One translated source file: a header sequence and, when the splitter
/// extracted storage-qualified definitions, an implementation sequence.
#[derive(Debug, Clone)]
pub struct Unit {
    pub header: Vec<String>,
    pub implementation: Vec<String>,
}

/// Whether a translated unit defines the program entry point.
pub fn contains_main(lines: &[String]) -> bool {
    lines.iter().any(|l| l.contains("main("))
}

/// Transform one file's lines into finished C++ text.
pub fn transpile_lines(lines: &[String], fname: &str, opts: &Options) -> Result<Unit> {
    let split = globals::split_globals(lines, opts.extract_impl)?;

    let mut effective = opts.clone();
    if !split.implementation.is_empty() {
        // the two outputs no longer share the input's line numbering
        effective.add_source_map = false;
    }

    let header = pipeline::run(&split.header, fname, &effective);
    let implementation = if split.implementation.is_empty() {
        Vec::new()
    } else {
        pipeline::run(&split.implementation, fname, &effective)
    };

    Ok(Unit {
        header,
        implementation,
    })
}

/// Transform raw source text into finished C++ text.
pub fn transpile(source: &str, fname: &str, opts: &Options) -> Result<Unit> {
    let lines: Vec<String> = source
        .lines()
        .map(|l| l.trim_end_matches('\r').to_string())
        .collect();
    transpile_lines(&lines, fname, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpile_simple_function() {
        let src = "def run():\n    x = 5\n    print x\n";
        let unit = transpile(src, "<test>", &Options::default()).unwrap();
        let text = unit.header.join("\n");
        assert!(text.contains("auto run() {"));
        assert!(text.contains("auto x = 5;"));
        assert!(text.contains("std::cout << x << std::endl;"));
        assert!(unit.implementation.is_empty());
    }

    #[test]
    fn test_transpile_splits_static_globals() {
        let src = "class Counter:\n    static int count = 0\n";
        let unit = transpile(src, "<test>", &Options::default()).unwrap();
        let header = unit.header.join("\n");
        let implementation = unit.implementation.join("\n");
        assert!(header.contains("static int count;"));
        assert!(implementation.contains("int Counter::count= 0;"));
    }

    #[test]
    fn test_transpile_fold_back() {
        let src = "class Counter:\n    static int count = 0\n";
        let opts = Options {
            extract_impl: false,
            ..Options::default()
        };
        let unit = transpile(src, "<test>", &opts).unwrap();
        assert!(unit.implementation.is_empty());
        let header = unit.header.join("\n");
        assert!(header.contains("static int count;"));
        assert!(header.contains("int Counter::count= 0;"));
    }

    #[test]
    fn test_malformed_global_reported() {
        let src = "static int x = y = 3\n";
        let err = transpile(src, "<test>", &Options::default()).unwrap_err();
        assert!(matches!(err, KakkoError::MalformedGlobal { line: 1, .. }));
    }

    #[test]
    fn test_contains_main() {
        let lines = vec!["int main() {".to_string()];
        assert!(contains_main(&lines));
        let lines = vec!["int maintain() {".to_string()];
        assert!(!contains_main(&lines));
    }
}
