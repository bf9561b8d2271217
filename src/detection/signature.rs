//! Ordered content-signature scan, spec §4.1 step 3: for extensionless or
//! unrecognized-extension files, score every language's fixed pattern set
//! against the content and report the best match. Grounded on the teacher's
//! regex-cache pattern (`boundary_score`'s per-worker regex caches) for
//! compiling patterns once via `once_cell::sync::Lazy` rather than per call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lang::Language;

struct Signature {
    language: Language,
    patterns: &'static [&'static str],
}

const SIGNATURES: &[Signature] = &[
    Signature {
        language: Language::Rust,
        patterns: &[r"\bfn\s+\w+\s*\(", r"\blet\s+(mut\s+)?\w+", r"::<", r"\bimpl\b", r"\buse\s+[\w:]+;"],
    },
    Signature {
        language: Language::Python,
        patterns: &[r"(?m)^\s*def\s+\w+\s*\(", r"(?m)^\s*import\s+\w+", r"(?m)^\s*class\s+\w+", r"\bself\b", r":\s*$"],
    },
    Signature {
        language: Language::Go,
        patterns: &[r"(?m)^\s*package\s+\w+", r"\bfunc\s+\w+\s*\(", r":=", r"\bimport\s*\("],
    },
    Signature {
        language: Language::JavaScript,
        patterns: &[r"\bfunction\s+\w+\s*\(", r"\bconst\s+\w+\s*=", r"=>", r"\brequire\("],
    },
    Signature {
        language: Language::Java,
        patterns: &[r"\bpublic\s+class\b", r"\bimport\s+java\.", r"\bpublic\s+static\s+void\s+main\b", r"\bSystem\.out\."],
    },
    Signature {
        language: Language::C,
        patterns: &[r"#include\s*<\w+\.h>", r"\bint\s+main\s*\(", r"\bstruct\s+\w+\s*\{", r"\bprintf\s*\("],
    },
    Signature {
        language: Language::Cpp,
        patterns: &[r"#include\s*<\w+>", r"\bstd::", r"\bnamespace\s+\w+", r"\btemplate\s*<"],
    },
];

static COMPILED: Lazy<Vec<(Language, Vec<Regex>)>> = Lazy::new(|| {
    SIGNATURES
        .iter()
        .map(|sig| {
            let regexes = sig
                .patterns
                .iter()
                .map(|p| Regex::new(p).expect("static signature pattern must compile"))
                .collect();
            (sig.language, regexes)
        })
        .collect()
});

/// Scores `content` against every language's signature set (fraction of
/// patterns that match) and returns the best-scoring language, if any
/// pattern matched at all. Caller applies the `score >= 0.5` acceptance
/// threshold and the `<= 0.75` confidence clamp.
pub fn best_match(content: &str) -> Option<(Language, f64)> {
    let mut best: Option<(Language, f64)> = None;
    for (language, regexes) in COMPILED.iter() {
        let hits = regexes.iter().filter(|re| re.is_match(content)).count();
        if hits == 0 {
            continue;
        }
        let score = hits as f64 / regexes.len() as f64;
        if best.map(|(_, b)| score > b).unwrap_or(true) {
            best = Some((*language, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_rust_like_content_above_threshold() {
        let content = "use std::fmt;\nfn main() {\n    let mut x = 1;\n}\n";
        let (lang, score) = best_match(content).expect("expected a match");
        assert_eq!(lang, Language::Rust);
        assert!(score >= 0.5, "expected score >= 0.5, got {score}");
    }

    #[test]
    fn scores_python_like_content_above_threshold() {
        let content = "import os\n\nclass Greeter:\n    def greet(self):\n        return self\n";
        let (lang, score) = best_match(content).expect("expected a match");
        assert_eq!(lang, Language::Python);
        assert!(score >= 0.5, "expected score >= 0.5, got {score}");
    }

    #[test]
    fn plain_prose_scores_nothing() {
        assert!(best_match("just some ordinary English prose here.").is_none());
    }
}
