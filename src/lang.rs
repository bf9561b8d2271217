use std::fmt;

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// The closed set of languages this core understands, per spec §6
/// ("Language coverage"). `Text` is the universal fallback language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Kotlin,
    Css,
    Html,
    Vue,
    Markdown,
    Xml,
    Json,
    Yaml,
    Toml,
    Text,
}

impl Language {
    /// Canonical lowercase tag used in `DetectionResult`, cache keys and
    /// chunk metadata.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Go => "go",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Kotlin => "kotlin",
            Language::Css => "css",
            Language::Html => "html",
            Language::Vue => "vue",
            Language::Markdown => "markdown",
            Language::Xml => "xml",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Text => "text",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Language> {
        Some(match tag {
            "rust" => Language::Rust,
            "python" => Language::Python,
            "javascript" => Language::JavaScript,
            "typescript" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "go" => Language::Go,
            "java" => Language::Java,
            "c" => Language::C,
            "cpp" => Language::Cpp,
            "csharp" => Language::CSharp,
            "kotlin" => Language::Kotlin,
            "css" => Language::Css,
            "html" => Language::Html,
            "vue" => Language::Vue,
            "markdown" => Language::Markdown,
            "xml" => Language::Xml,
            "json" => Language::Json,
            "yaml" => Language::Yaml,
            "toml" => Language::Toml,
            "text" => Language::Text,
            _ => return None,
        })
    }

    /// "is_structured" per spec §4.1: markup/data languages whose grammar is
    /// mostly structural rather than imperative.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Language::Json
                | Language::Xml
                | Language::Yaml
                | Language::Toml
                | Language::Html
                | Language::Css
                | Language::Markdown
                | Language::Vue
        )
    }

    /// Whether this language has a tree-sitter grammar wired into the
    /// parser pool (spec §4.1 "language with tree-sitter grammar").
    pub fn has_grammar(&self) -> bool {
        !matches!(self, Language::Text | Language::Yaml | Language::Toml)
    }

    pub fn from_extension(ext: &str) -> Option<Language> {
        let ext = ext.to_ascii_lowercase();
        Some(match ext.as_str() {
            "rs" => Language::Rust,
            "py" | "pyw" => Language::Python,
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" | "mts" | "cts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "go" => Language::Go,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "cs" => Language::CSharp,
            "kt" | "kts" => Language::Kotlin,
            "css" | "scss" => Language::Css,
            "html" | "htm" => Language::Html,
            "vue" => Language::Vue,
            "md" | "markdown" => Language::Markdown,
            "xml" => Language::Xml,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "toml" => Language::Toml,
            _ => return None,
        })
    }

    /// Multi-part extensions the fixed extension table treats specially,
    /// e.g. `.d.ts`. Checked before the single-part table.
    pub fn from_compound_extension(basename: &str) -> Option<Language> {
        let lower = basename.to_ascii_lowercase();
        if lower.ends_with(".d.ts") {
            return Some(Language::TypeScript);
        }
        if lower.ends_with(".test.ts") || lower.ends_with(".spec.ts") {
            return Some(Language::TypeScript);
        }
        if lower.ends_with(".test.js") || lower.ends_with(".spec.js") {
            return Some(Language::JavaScript);
        }
        None
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Serializes/deserializes through [`Language::tag`]/[`Language::from_tag`]
/// rather than deriving, so the wire form matches the string every cache key
/// and CLI flag already uses.
impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Language::from_tag(&tag).ok_or_else(|| D::Error::custom(format!("unknown language tag '{tag}'")))
    }
}
