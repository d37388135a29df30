//! Diagnostics collection and output.

use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let file = diag.file.as_deref().unwrap_or("<input>");
            out.push_str(&format!(
                "[{}] {}:{} {}\n",
                diag.code, file, diag.line, diag.message
            ));
        }
        out
    }
}

pub fn from_error(err: &crate::error::KakkoError, file: Option<&Path>) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let (code, message, line) = match err {
        crate::error::KakkoError::MalformedGlobal { line, text } => (
            "KKO-MALFORMED-GLOBAL",
            format!("malformed global initializer: {text}"),
            *line,
        ),
        crate::error::KakkoError::Io(_) => ("KKO-IO-ERROR", format!("{err}"), 1),
    };
    diags.add(Diagnostic {
        code: code.to_string(),
        message,
        severity: Severity::Error,
        file: file.map(|p| p.display().to_string()),
        line,
    });
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KakkoError;

    #[test]
    fn test_text_rendering() {
        let err = KakkoError::MalformedGlobal {
            line: 3,
            text: "static int x = y = 1".to_string(),
        };
        let diags = from_error(&err, Some(Path::new("counter.kpp")));
        let text = diags.to_text();
        assert!(text.contains("KKO-MALFORMED-GLOBAL"));
        assert!(text.contains("counter.kpp:3"));
    }

    #[test]
    fn test_json_rendering() {
        let err = KakkoError::MalformedGlobal {
            line: 3,
            text: "static int x = y = 1".to_string(),
        };
        let diags = from_error(&err, None);
        let json = diags.to_json();
        assert!(json.contains("\"code\":\"KKO-MALFORMED-GLOBAL\""));
        assert!(json.contains("\"line\":3"));
    }
}
