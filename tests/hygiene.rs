//! Hygiene: pattern budgets for the engine's production sources.
//!
//! The engine runs inside a host's event loop, so a panic mid-gesture takes
//! the whole editor down, and a swallowed error leaves a mark half edited.
//! Each rule below names a pattern and the most occurrences `src/` may carry.
//! Budgets only ratchet down.

use std::fs;
use std::path::{Path, PathBuf};

/// One forbidden pattern and its allowance.
struct Rule {
    pattern: &'static str,
    max: usize,
}

const fn rule(pattern: &'static str, max: usize) -> Rule {
    Rule { pattern, max }
}

/// Crash the host.
const PANICS: [Rule; 6] = [
    rule(".unwrap()", 0),
    rule(".expect(", 0),
    rule("panic!(", 0),
    rule("unreachable!(", 0),
    rule("todo!(", 0),
    rule("unimplemented!(", 0),
];

/// Drop an error without looking at it.
const SILENT_LOSS: [Rule; 2] = [rule("let _ =", 0), rule(".ok()", 0)];

/// Output goes through `tracing`; dead code gets deleted.
const STRUCTURE: [Rule; 4] =
    [rule("println!(", 0), rule("eprintln!(", 0), rule("dbg!(", 0), rule("#[allow(dead_code)]", 0)];

/// Modules whose unit tests live in a sibling `<module>_test.rs`.
const TESTED_MODULES: [&str; 10] =
    ["collection", "config", "engine", "hit", "history", "input", "mark", "mirror", "variants", "viewport"];

/// Every production `.rs` file under `src/` with its text. Sibling test files
/// are skipped: tests may unwrap freely.
fn production_sources() -> Vec<(PathBuf, String)> {
    let mut pending = vec![PathBuf::from("src")];
    let mut found = Vec::new();
    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let is_rs = path.extension().is_some_and(|ext| ext == "rs");
            let is_test = path.file_stem().is_some_and(|stem| stem.to_string_lossy().ends_with("_test"));
            if !is_rs || is_test {
                continue;
            }
            if let Ok(text) = fs::read_to_string(&path) {
                found.push((path, text));
            }
        }
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

/// Code lines containing `pattern`, as `path:line` locations. Comment lines
/// are ignored so docs may name the patterns they forbid.
fn offending_lines(sources: &[(PathBuf, String)], pattern: &str) -> Vec<String> {
    sources
        .iter()
        .flat_map(|(path, text)| {
            text.lines()
                .enumerate()
                .filter(move |(_, line)| !line.trim_start().starts_with("//") && line.contains(pattern))
                .map(move |(idx, _)| format!("{}:{}", path.display(), idx + 1))
        })
        .collect()
}

/// Check a group of rules, reporting every overrun at once.
fn enforce(rules: &[Rule]) {
    let sources = production_sources();
    let report: Vec<String> = rules
        .iter()
        .filter_map(|r| {
            let hits = offending_lines(&sources, r.pattern);
            (hits.len() > r.max)
                .then(|| format!("`{}`: {} found, {} allowed\n    {}", r.pattern, hits.len(), r.max, hits.join("\n    ")))
        })
        .collect();
    assert!(report.is_empty(), "hygiene budget exceeded:\n  {}", report.join("\n  "));
}

#[test]
fn no_panicking_calls() {
    enforce(&PANICS);
}

#[test]
fn no_silently_discarded_errors() {
    enforce(&SILENT_LOSS);
}

#[test]
fn no_stray_output_or_dead_code() {
    enforce(&STRUCTURE);
}

#[test]
fn modules_have_sibling_tests() {
    let missing: Vec<_> = TESTED_MODULES
        .iter()
        .filter(|name| !Path::new("src").join(format!("{name}_test.rs")).is_file())
        .collect();
    assert!(missing.is_empty(), "modules without a sibling _test.rs: {missing:?}");
}

#[test]
fn scan_sees_every_tested_module() {
    let sources = production_sources();
    for name in TESTED_MODULES {
        let file = format!("{name}.rs");
        assert!(
            sources.iter().any(|(path, _)| path.file_name().is_some_and(|f| f == file.as_str())),
            "hygiene scan missed src/{file}"
        );
    }
}

#[test]
fn comment_lines_are_not_counted() {
    let sources = vec![(PathBuf::from("x.rs"), "// never .unwrap() here\nlet v = opt.unwrap();\n".to_owned())];
    assert_eq!(offending_lines(&sources, ".unwrap()"), vec!["x.rs:2".to_owned()]);
}
