//! Layer 1 — language detection and feature probing (spec §3, §4.1).
//! Ordered: backup-suffix recovery, then extension match, then a
//! content-signature scan for extensionless/unrecognized files, then the
//! universal text fallback. Grounded on the teacher's
//! `LanguageParser::detect_language` (extension map + shebang checks),
//! restructured as a standalone detector in the shape of
//! `mcb-language-support::LanguageDetector` (a struct with a `detect`/
//! `detect_or_text` pair rather than a free function), with the
//! backup-file and signature-scan steps added to match the full detection
//! algorithm rather than only its extension/shebang fast paths.

pub mod shebang;
pub mod signature;

use std::path::{Path, PathBuf};

use crate::chunking::StrategyKind;
use crate::error::{CoreError, FallbackReason};
use crate::lang::Language;

/// A language with tree-sitter grammar and complexity at or below this is
/// still recommended the `ast` strategy; above it, the recommendation
/// degrades toward `syntax-aware`/`semantic`. Spec leaves the exact
/// threshold unspecified; this value is an open-question decision,
/// recorded in DESIGN.md.
const AST_COMPLEXITY_THRESHOLD: usize = 40;

/// Backup-suffix patterns checked verbatim; `.YYYYMMDD`-style dated
/// suffixes are matched separately since they aren't a fixed string.
const BACKUP_SUFFIXES: &[&str] = &[".bak", ".backup", ".old", ".orig", ".save", "~"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Backup,
    Extensionless,
    Normal,
    Unknown,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Backup => "backup",
            FileType::Extensionless => "extensionless",
            FileType::Normal => "normal",
            FileType::Unknown => "unknown",
        }
    }
}

/// Computed in one pass over the file's bytes (spec §3, §4.1). Feeds the
/// strategy recommendation below rather than only `Language::has_grammar`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileFeatures {
    pub has_imports: bool,
    pub has_exports: bool,
    pub has_functions: bool,
    pub has_classes: bool,
    pub is_structured: bool,
    pub is_highly_structured: bool,
    pub line_count: usize,
    pub byte_size: usize,
    pub complexity: usize,
}

impl FileFeatures {
    /// One pass over `content`: counts lines, flags import/export/function/
    /// class keywords with a language-agnostic token set, and computes a
    /// cyclomatic-style complexity as control-flow keyword count plus
    /// bracket nesting depth.
    pub fn probe(content: &str, language: Language) -> Self {
        const CONTROL_FLOW: &[&str] = &[
            "if", "else", "for", "while", "match", "switch", "case", "catch", "loop",
        ];
        const IMPORT_TOKENS: &[&str] = &["import", "use", "require", "include", "from"];
        const EXPORT_TOKENS: &[&str] = &["export", "pub", "public"];
        const FUNCTION_TOKENS: &[&str] = &["function", "fn", "def", "func"];
        const CLASS_TOKENS: &[&str] = &["class", "struct", "interface", "trait", "enum"];

        let mut has_imports = false;
        let mut has_exports = false;
        let mut has_functions = false;
        let mut has_classes = false;
        let mut control_flow_count = 0usize;
        let mut structural_tokens = 0usize;
        let mut total_tokens = 0usize;
        let mut depth: i64 = 0;
        let mut max_depth: i64 = 0;
        let mut line_count = 0usize;

        for line in content.lines() {
            line_count += 1;
            for word in line.split(|c: char| !c.is_alphanumeric() && c != '_') {
                if word.is_empty() {
                    continue;
                }
                total_tokens += 1;
                if IMPORT_TOKENS.contains(&word) {
                    has_imports = true;
                    structural_tokens += 1;
                } else if EXPORT_TOKENS.contains(&word) {
                    has_exports = true;
                    structural_tokens += 1;
                } else if FUNCTION_TOKENS.contains(&word) {
                    has_functions = true;
                    structural_tokens += 1;
                } else if CLASS_TOKENS.contains(&word) {
                    has_classes = true;
                    structural_tokens += 1;
                } else if CONTROL_FLOW.contains(&word) {
                    control_flow_count += 1;
                }
            }
            for ch in line.chars() {
                match ch {
                    '{' | '(' | '[' => {
                        depth += 1;
                        max_depth = max_depth.max(depth);
                    }
                    '}' | ')' | ']' => depth -= 1,
                    _ => {}
                }
            }
        }

        let is_structured = language.is_structured();
        let structural_ratio = if total_tokens == 0 {
            0.0
        } else {
            structural_tokens as f64 / total_tokens as f64
        };
        let is_highly_structured = is_structured && structural_ratio >= 0.5;

        Self {
            has_imports,
            has_exports,
            has_functions,
            has_classes,
            is_structured,
            is_highly_structured,
            line_count,
            byte_size: content.len(),
            complexity: control_flow_count + max_depth.max(0) as usize,
        }
    }
}

/// What L1 hands to L2: language, file classification, probed features,
/// and which chunking rung to start the fallback ladder at (spec §3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionResult {
    pub language: Language,
    pub file_type: FileType,
    pub features: FileFeatures,
    pub recommended_strategy: StrategyKind,
    pub confidence: f64,
}

/// Strategy recommendation (spec §4.1), driven by the language's grammar
/// *and* its probed features rather than `has_grammar()` alone. Backup
/// files are recommended `bracket-balance` directly by the caller before
/// this function ever runs.
fn recommended_strategy_for(language: Language, features: &FileFeatures) -> StrategyKind {
    match language {
        Language::Markdown => return StrategyKind::MarkdownSpecialized,
        Language::Xml | Language::Html | Language::Vue => return StrategyKind::XmlSpecialized,
        _ => {}
    }
    if language.has_grammar() && features.complexity <= AST_COMPLEXITY_THRESHOLD {
        return StrategyKind::Ast;
    }
    if features.is_structured {
        StrategyKind::SyntaxAware
    } else if language.has_grammar() {
        StrategyKind::Semantic
    } else {
        StrategyKind::UniversalLine
    }
}

/// Strips a recognized backup suffix and returns the recovered basename,
/// or `None` if `path` doesn't look like a backup file. Handles both the
/// fixed suffix list and dated suffixes of the form `.YYYYMMDD`.
fn strip_backup_suffix(path: &str) -> Option<String> {
    for suffix in BACKUP_SUFFIXES {
        if let Some(stripped) = path.strip_suffix(suffix) {
            if !stripped.is_empty() {
                return Some(stripped.to_string());
            }
        }
    }
    let dot_idx = path.rfind('.')?;
    let candidate = &path[dot_idx + 1..];
    if candidate.len() == 8 && candidate.bytes().all(|b| b.is_ascii_digit()) {
        return Some(path[..dot_idx].to_string());
    }
    None
}

/// Detects source language, file classification, and features from a file
/// path and (optionally) its content. Stateless today, but kept as a
/// struct — matching the pack's detector shape — so future revisions can
/// carry a cached extension registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Steps 2-3 of §4.1: extension match (confidence 0.8), then — for
    /// extensionless/unrecognized-extension files — shebang and the
    /// ordered content-signature scan (confidence `<= 0.75`).
    fn classify(&self, path: &str, content: Option<&str>) -> Result<(Language, f64), CoreError> {
        if let Some(lang) = Language::from_compound_extension(path) {
            return Ok((lang, 0.8));
        }
        if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
            if let Some(lang) = Language::from_extension(ext) {
                return Ok((lang, 0.8));
            }
        }
        if let Some(content) = content {
            if let Some(lang) = shebang::detect(content) {
                return Ok((lang, 0.75));
            }
            if let Some((lang, score)) = signature::best_match(content) {
                if score >= 0.5 {
                    return Ok((lang, score.min(0.75)));
                }
            }
        }
        Err(CoreError::DetectionFallback { path: PathBuf::from(path) })
    }

    /// `detect(path, bytes) -> DetectionResult`, spec §4.1: backup-suffix
    /// recovery first, then [`Self::classify`].
    pub fn detect(&self, path: &str, content: Option<&str>) -> Result<DetectionResult, CoreError> {
        if let Some(stripped) = strip_backup_suffix(path) {
            if let Ok((language, confidence)) = self.classify(&stripped, content) {
                if confidence >= 0.8 {
                    let features = FileFeatures::probe(content.unwrap_or(""), language);
                    return Ok(DetectionResult {
                        language,
                        file_type: FileType::Backup,
                        features,
                        recommended_strategy: StrategyKind::BracketBalance,
                        confidence,
                    });
                }
            }
        }

        let (language, confidence) = self.classify(path, content)?;
        let features = FileFeatures::probe(content.unwrap_or(""), language);
        let file_type = if Path::new(path).extension().is_none() {
            FileType::Extensionless
        } else {
            FileType::Normal
        };
        let recommended_strategy = recommended_strategy_for(language, &features);
        Ok(DetectionResult {
            language,
            file_type,
            features,
            recommended_strategy,
            confidence,
        })
    }

    /// Same as [`detect`](Self::detect) but degrades to [`Language::Text`]
    /// at confidence `0.1` plus [`FallbackReason::NoGrammar`] instead of
    /// erroring (spec §4.1 step 4) — this is what the pipeline coordinator
    /// actually calls, since detection failures must never abort indexing
    /// (spec §7: only `Input`/`Fatal` propagate to callers).
    pub fn detect_or_text(
        &self,
        path: &str,
        content: Option<&str>,
    ) -> (DetectionResult, Option<FallbackReason>) {
        match self.detect(path, content) {
            Ok(result) => (result, None),
            Err(_) => {
                let features = FileFeatures::probe(content.unwrap_or(""), Language::Text);
                let result = DetectionResult {
                    language: Language::Text,
                    file_type: FileType::Unknown,
                    features,
                    recommended_strategy: StrategyKind::UniversalLine,
                    confidence: 0.1,
                };
                (result, Some(FallbackReason::NoGrammar))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_rust_by_extension() {
        let detector = LanguageDetector::new();
        let result = detector.detect("src/main.rs", None).unwrap();
        assert_eq!(result.language, Language::Rust);
        assert_eq!(result.file_type, FileType::Normal);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.recommended_strategy, StrategyKind::Ast);
    }

    #[test]
    fn detects_declaration_files_via_compound_extension() {
        let detector = LanguageDetector::new();
        let result = detector.detect("index.d.ts", None).unwrap();
        assert_eq!(result.language, Language::TypeScript);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn falls_back_to_shebang_when_no_extension() {
        let detector = LanguageDetector::new();
        let result = detector
            .detect("run_script", Some("#!/usr/bin/env python3\nprint('hi')\n"))
            .unwrap();
        assert_eq!(result.language, Language::Python);
        assert_eq!(result.file_type, FileType::Extensionless);
        assert!(result.confidence <= 0.75, "got {}", result.confidence);
    }

    #[test]
    fn extensionless_file_uses_content_signature_scan() {
        let detector = LanguageDetector::new();
        let content = "package main\n\nfunc main() {\n\tx := 1\n\t_ = x\n}\n";
        let result = detector.detect("noext", Some(content)).unwrap();
        assert_eq!(result.language, Language::Go);
        assert!(result.confidence >= 0.5 && result.confidence <= 0.75);
    }

    #[test]
    fn unrecognized_file_degrades_to_text_with_fallback_reason() {
        let detector = LanguageDetector::new();
        let (result, reason) = detector.detect_or_text("noext", Some("just plain prose."));
        assert_eq!(result.language, Language::Text);
        assert_eq!(result.file_type, FileType::Unknown);
        assert_eq!(result.confidence, 0.1);
        assert_eq!(reason, Some(FallbackReason::NoGrammar));
    }

    #[test]
    fn markdown_recommends_markdown_strategy() {
        let detector = LanguageDetector::new();
        let result = detector.detect("README.md", None).unwrap();
        assert_eq!(result.recommended_strategy, StrategyKind::MarkdownSpecialized);
    }

    #[test]
    fn backup_file_recovers_underlying_language_and_recommends_bracket_balance() {
        let detector = LanguageDetector::new();
        let result = detector.detect("server.c.bak", None).unwrap();
        assert_eq!(result.file_type, FileType::Backup);
        assert_eq!(result.language, Language::C);
        assert!(result.confidence >= 0.8, "got {}", result.confidence);
        assert_eq!(result.recommended_strategy, StrategyKind::BracketBalance);
    }

    #[test]
    fn dated_backup_suffix_recovers_underlying_language() {
        let detector = LanguageDetector::new();
        let result = detector.detect("app.py.20230615", None).unwrap();
        assert_eq!(result.file_type, FileType::Backup);
        assert_eq!(result.language, Language::Python);
    }

    #[test]
    fn file_features_probe_counts_lines_and_flags_imports() {
        let content = "use std::fmt;\n\nfn add(a: i32, b: i32) -> i32 {\n    if a > b {\n        a\n    } else {\n        b\n    }\n}\n";
        let features = FileFeatures::probe(content, Language::Rust);
        assert_eq!(features.line_count, 9);
        assert!(features.has_imports);
        assert!(features.has_functions);
        assert!(features.complexity >= 1);
    }
}
