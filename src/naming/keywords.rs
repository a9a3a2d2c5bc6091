//! Target languages and their reserved words.

use serde::{Deserialize, Serialize};

/// Language the generated identifiers are meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C#, escaped with `@`
    #[default]
    #[serde(alias = "c#", alias = "cs")]
    CSharp,
    /// Rust, escaped with `r#`
    #[serde(alias = "rs")]
    Rust,
}

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
    "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw",
    "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using",
    "virtual", "void", "volatile", "while",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
    "yield",
];

// Keywords that cannot be written as raw identifiers.
const RUST_NON_RAW: &[&str] = &["crate", "self", "Self", "super"];

impl Language {
    /// Parse language from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csharp" | "c#" | "cs" => Some(Self::CSharp),
            "rust" | "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::CSharp => CSHARP_KEYWORDS,
            Self::Rust => RUST_KEYWORDS,
        }
    }

    /// Exact, case-sensitive keyword check.
    pub fn is_reserved(self, ident: &str) -> bool {
        self.keywords().contains(&ident)
    }

    /// Apply the verbatim-identifier convention if `ident` is reserved.
    pub fn escape(self, ident: String) -> String {
        if !self.is_reserved(&ident) {
            return ident;
        }
        match self {
            Self::CSharp => format!("@{ident}"),
            Self::Rust if RUST_NON_RAW.contains(&ident.as_str()) => format!("{ident}_"),
            Self::Rust => format!("r#{ident}"),
        }
    }
}
