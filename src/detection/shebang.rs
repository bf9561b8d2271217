//! Shebang-line sniffing, used only when a path carries no recognizable
//! extension. Grounded on the teacher's `detect_language` fallback
//! (`#!/usr/bin/env python` / `#!/usr/bin/env node` checks).

use crate::lang::Language;

const INTERPRETERS: &[(&str, Language)] = &[
    ("python3", Language::Python),
    ("python", Language::Python),
    ("node", Language::JavaScript),
    ("deno", Language::TypeScript),
    ("bash", Language::Text),
    ("sh", Language::Text),
];

/// Reads the first line of `content`, and if it's a `#!` shebang, maps the
/// named interpreter to a [`Language`].
pub fn detect(content: &str) -> Option<Language> {
    let first_line = content.lines().next()?;
    let rest = first_line.strip_prefix("#!")?;
    let rest = rest.trim();

    for (name, lang) in INTERPRETERS {
        if rest.ends_with(name) || rest.contains(&format!("/{name} ")) || rest.ends_with(&format!("/{name}")) {
            return Some(*lang);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_python3_env_shebang() {
        assert_eq!(detect("#!/usr/bin/env python3\n"), Some(Language::Python));
    }

    #[test]
    fn detects_node_shebang() {
        assert_eq!(detect("#!/usr/bin/node\n"), Some(Language::JavaScript));
    }

    #[test]
    fn non_shebang_content_returns_none() {
        assert_eq!(detect("fn main() {}\n"), None);
    }
}
