use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::lang::Language;

/// Four counters tracked per spec §4.2.5: `(paren, brace, bracket,
/// template)`. A split is only permitted when all four are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolStack {
    pub paren: i32,
    pub brace: i32,
    pub bracket: i32,
    pub template: i32,
}

impl SymbolStack {
    pub fn is_balanced(&self) -> bool {
        self.paren == 0 && self.brace == 0 && self.bracket == 0 && self.template == 0
    }

    pub fn add(&mut self, other: SymbolStack) {
        self.paren += other.paren;
        self.brace += other.brace;
        self.bracket += other.bracket;
        self.template += other.template;
    }
}

/// Lexical mode the scanner is in when it starts a line — needed because
/// block comments, triple-quoted strings and template literals can span
/// multiple lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanMode {
    Code,
    LineString(char),
    BlockComment,
    TripleString(char),
    Template,
}

impl Default for ScanMode {
    fn default() -> Self {
        ScanMode::Code
    }
}

fn line_comment_token(language: Language) -> Option<&'static str> {
    match language {
        Language::Python | Language::Yaml | Language::Toml => Some("#"),
        Language::Rust
        | Language::JavaScript
        | Language::TypeScript
        | Language::Tsx
        | Language::Go
        | Language::Java
        | Language::C
        | Language::Cpp
        | Language::CSharp
        | Language::Kotlin => Some("//"),
        _ => None,
    }
}

fn uses_triple_quotes(language: Language) -> bool {
    matches!(language, Language::Python)
}

fn uses_template_strings(language: Language) -> bool {
    matches!(language, Language::JavaScript | Language::TypeScript | Language::Tsx)
}

fn uses_block_comments(language: Language) -> bool {
    !matches!(
        language,
        Language::Python | Language::Yaml | Language::Toml | Language::Markdown
    )
}

/// Scans a single line starting in `mode`, returning the counter delta it
/// produced and the mode the *next* line should start in. Pure function of
/// `(line, language, mode)` — the memoizing cache in [`SymbolBalanceTracker`]
/// relies on that purity (spec §4.2.5 "known patterns... cached by line
/// hash").
pub fn scan_line(line: &str, language: Language, mut mode: ScanMode) -> (SymbolStack, ScanMode) {
    let mut delta = SymbolStack::default();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let line_comment = line_comment_token(language);

    while i < chars.len() {
        let c = chars[i];
        match mode {
            ScanMode::Code => {
                if let Some(token) = line_comment {
                    if line[byte_index(&chars, i)..].starts_with(token) {
                        break;
                    }
                }
                if uses_block_comments(language) && c == '/' && chars.get(i + 1) == Some(&'*') {
                    mode = ScanMode::BlockComment;
                    i += 2;
                    continue;
                }
                if uses_triple_quotes(language)
                    && (c == '"' || c == '\'')
                    && chars.get(i + 1) == Some(&c)
                    && chars.get(i + 2) == Some(&c)
                {
                    mode = ScanMode::TripleString(c);
                    i += 3;
                    continue;
                }
                if c == '"' || c == '\'' {
                    mode = ScanMode::LineString(c);
                    i += 1;
                    continue;
                }
                if uses_template_strings(language) && c == '`' {
                    mode = ScanMode::Template;
                    delta.template += 1;
                    i += 1;
                    continue;
                }
                match c {
                    '(' => delta.paren += 1,
                    ')' => delta.paren -= 1,
                    '{' => delta.brace += 1,
                    '}' => delta.brace -= 1,
                    '[' => delta.bracket += 1,
                    ']' => delta.bracket -= 1,
                    _ => {}
                }
                i += 1;
            }
            ScanMode::LineString(quote) => {
                if c == '\\' {
                    i += 2;
                    continue;
                }
                if c == quote {
                    mode = ScanMode::Code;
                }
                i += 1;
            }
            ScanMode::TripleString(quote) => {
                if c == quote && chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                    mode = ScanMode::Code;
                    i += 3;
                    continue;
                }
                i += 1;
            }
            ScanMode::BlockComment => {
                if c == '*' && chars.get(i + 1) == Some(&'/') {
                    mode = ScanMode::Code;
                    i += 2;
                    continue;
                }
                i += 1;
            }
            ScanMode::Template => {
                if c == '\\' {
                    i += 2;
                    continue;
                }
                if c == '`' {
                    mode = ScanMode::Code;
                    delta.template -= 1;
                    i += 1;
                    continue;
                }
                if c == '{' {
                    delta.brace += 1;
                } else if c == '}' {
                    delta.brace -= 1;
                }
                i += 1;
            }
        }
    }

    (delta, mode)
}

fn byte_index(chars: &[char], char_idx: usize) -> usize {
    chars[..char_idx].iter().map(|c| c.len_utf8()).sum()
}

type CacheKey = (u64, Language, ScanMode);

/// Memoizing wrapper around [`scan_line`], "per-worker, bounded" per spec
/// §5's resource table ("Symbol-balance line cache | per-worker | bounded").
pub struct SymbolBalanceTracker {
    cache: Mutex<HashMap<CacheKey, (SymbolStack, ScanMode)>>,
    capacity: usize,
}

impl SymbolBalanceTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    pub fn scan(&self, line: &str, language: Language, mode: ScanMode) -> (SymbolStack, ScanMode) {
        let mut hasher = DefaultHasher::new();
        line.hash(&mut hasher);
        let key: CacheKey = (hasher.finish(), language, mode);

        {
            let cache = self.cache.lock().unwrap();
            if let Some(result) = cache.get(&key) {
                return *result;
            }
        }

        let result = scan_line(line, language, mode);
        let mut cache = self.cache.lock().unwrap();
        if cache.len() >= self.capacity {
            cache.clear();
        }
        cache.insert(key, result);
        result
    }

    /// Scans a full chunk from its start, returning the final balance.
    /// Used by L3's symbol-balance-repair processor and by P9's test.
    pub fn scan_chunk(&self, content: &str, language: Language) -> SymbolStack {
        let mut stack = SymbolStack::default();
        let mut mode = ScanMode::Code;
        for line in content.lines() {
            let (delta, next_mode) = self.scan(line, language, mode);
            stack.add(delta);
            mode = next_mode;
        }
        stack
    }
}

impl Default for SymbolBalanceTracker {
    fn default() -> Self {
        Self::new(4096)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_braces_on_one_line() {
        let tracker = SymbolBalanceTracker::default();
        let stack = tracker.scan_chunk("fn main() { let x = 1; }", Language::Rust);
        assert!(stack.is_balanced());
    }

    #[test]
    fn unbalanced_brace_across_lines() {
        let tracker = SymbolBalanceTracker::default();
        let stack = tracker.scan_chunk("fn main() {\n    let x = 1;", Language::Rust);
        assert!(!stack.is_balanced());
        assert_eq!(stack.brace, 1);
    }

    #[test]
    fn braces_inside_string_are_ignored() {
        let tracker = SymbolBalanceTracker::default();
        let stack = tracker.scan_chunk(r#"let s = "{ unbalanced";"#, Language::Rust);
        assert!(stack.is_balanced());
    }

    #[test]
    fn line_comment_hides_trailing_brace() {
        let tracker = SymbolBalanceTracker::default();
        let stack = tracker.scan_chunk("let x = 1; // {", Language::Rust);
        assert!(stack.is_balanced());
    }

    #[test]
    fn python_triple_quote_spans_lines() {
        let tracker = SymbolBalanceTracker::default();
        let stack = tracker.scan_chunk("x = \"\"\"{ not real\n} still not real\"\"\"", Language::Python);
        assert!(stack.is_balanced());
    }
}
