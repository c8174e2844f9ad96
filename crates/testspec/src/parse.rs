//! Line-oriented parser for `.test` spec files and `.ini` config files.
//!
//! Syntax (spec.md §6):
//! - `# ...` to end-of-line is a comment; blank lines are ignored.
//! - `[section]` prefixes subsequent keys with `section.`.
//! - `key = value` or `key : value`; keys match `[A-Za-z]\w*(\.[A-Za-z]\w*)*`.
//! - Values are trimmed; a surrounding pair of double quotes is stripped.
//! - A block starts with `BlockID` alone on a line and ends with `End-BlockID`;
//!   the lines in between (trimmed, newline-terminated) become the value for
//!   key `section.BlockID`. Duplicate block IDs in the same scope are an error.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::error::{Error, Result};

const KEYWORD: &str = r"[A-Za-z]\w*";

fn keyword_path() -> String {
    format!(r"{KEYWORD}(?:\.{KEYWORD})*")
}

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(#.*)?$").unwrap());
static SECTION_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*\[\s*({})\s*\]\s*(?:#.*)?$", keyword_path())).unwrap()
});
static BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*({KEYWORD})\s*(?:#.*)?$")).unwrap());
static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*End-({KEYWORD})\s*(?:#.*)?$")).unwrap());
static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"^\s*({})\s*[:=]\s*("(?:[^"\\]|\\.)*"|[^#]*?)\s*(?:#[^#]*)?$"#,
        keyword_path()
    ))
    .unwrap()
});

fn strip_quotes(text: &str) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

/// Parse a spec or INI file into a flat `key -> value` map.
///
/// A missing file yields an empty map (mirrors the original's "optional
/// overlay" semantics for `setup.ini`, which need not exist).
pub fn parse_spec_file(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "spec layer absent, skipping");
        return Ok(BTreeMap::new());
    }
    tracing::trace!(path = %path.display(), "parsing spec file");
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::InvalidData {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_spec_str(path, &content)
}

/// Parse already-loaded spec content; `path` is used only in diagnostics.
pub fn parse_spec_str(path: impl AsRef<Path>, content: &str) -> Result<BTreeMap<String, String>> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let mut settings = BTreeMap::new();
    let mut section_id = String::new();
    let mut block_id: Option<String> = None;
    let mut block_content = String::new();

    for (idx, line) in content.lines().enumerate() {
        let lineno = idx + 1;

        if let Some(open) = &block_id {
            if let Some(caps) = BLOCK_END.captures(line) {
                let closed = &caps[1];
                if closed != open {
                    return Err(Error::BlockError {
                        path,
                        line: lineno,
                        reason: format!(
                            "found 'End-{closed}' while within another block '{open}'"
                        ),
                    });
                }
                let key = format!("{section_id}{open}");
                if settings.contains_key(&key) {
                    return Err(Error::BlockError {
                        path,
                        line: lineno,
                        reason: format!("duplicate definition for block '{key}'"),
                    });
                }
                settings.insert(key, std::mem::take(&mut block_content));
                block_id = None;
            } else {
                block_content.push_str(line.trim());
                block_content.push('\n');
            }
            continue;
        }

        if line.trim().is_empty() || COMMENT_LINE.is_match(line) {
            continue;
        }
        if let Some(caps) = BLOCK_START.captures(line) {
            block_id = Some(caps[1].to_string());
        } else if let Some(caps) = SECTION_HEAD.captures(line) {
            section_id = format!("{}.", &caps[1]);
        } else if let Some(caps) = DEFINITION.captures(line) {
            let key = format!("{section_id}{}", &caps[1]);
            settings.insert(key, strip_quotes(&caps[2]));
        } else {
            return Err(Error::InvalidDefinition {
                path,
                line: lineno,
                content: line.to_string(),
            });
        }
    }

    if let Some(open) = block_id {
        return Err(Error::BlockError {
            path,
            line: content.lines().count(),
            reason: format!("unterminated block '{open}'"),
        });
    }

    Ok(settings)
}

/// Split a commandline-style string into argument tokens, shell-like:
/// whitespace separated, with single- or double-quoted tokens retaining
/// embedded whitespace. Embedded quotes within a quoted token must be
/// escaped with `\`.
pub fn tokenize_cmdline(argline: &str) -> Vec<String> {
    static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"([^\s"']+)|"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)'"#).unwrap()
    });

    let mut out = Vec::new();
    for caps in TOKEN.captures_iter(argline) {
        if let Some(m) = caps.get(1) {
            out.push(m.as_str().to_string());
        } else if let Some(m) = caps.get(2) {
            out.push(m.as_str().replace("\\\"", "\""));
        } else if let Some(m) = caps.get(3) {
            out.push(m.as_str().replace("\\'", "'"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_definitions_and_comments() {
        let text = "# a comment\nTest.type = CLI\nTest.topic: features/sine\n\n";
        let map = parse_spec_str("in-memory", text).unwrap();
        assert_eq!(map.get("Test.type").unwrap(), "CLI");
        assert_eq!(map.get("Test.topic").unwrap(), "features/sine");
    }

    #[test]
    fn section_prefixes_keys() {
        let text = "[Test]\ntype = CLI\ntopic = foo\n";
        let map = parse_spec_str("in-memory", text).unwrap();
        assert_eq!(map.get("Test.type").unwrap(), "CLI");
        assert_eq!(map.get("Test.topic").unwrap(), "foo");
    }

    #[test]
    fn strips_surrounding_quotes() {
        let text = "Test.arguments = \"-U --no-gui\"\n";
        let map = parse_spec_str("in-memory", text).unwrap();
        assert_eq!(map.get("Test.arguments").unwrap(), "-U --no-gui");
    }

    #[test]
    fn a_hash_inside_quotes_is_not_treated_as_a_comment() {
        let text = "Test.arguments = \"-U --preset=a#1\"\n";
        let map = parse_spec_str("in-memory", text).unwrap();
        assert_eq!(map.get("Test.arguments").unwrap(), "-U --preset=a#1");
    }

    #[test]
    fn blocks_concatenate_trimmed_lines() {
        let text = "Script\n  line one\n    line two\nEnd-Script\n";
        let map = parse_spec_str("in-memory", text).unwrap();
        assert_eq!(map.get("Script").unwrap(), "line one\nline two\n");
    }

    #[test]
    fn duplicate_block_is_an_error() {
        let text = "Script\nEnd-Script\nScript\nEnd-Script\n";
        assert!(parse_spec_str("in-memory", text).is_err());
    }

    #[test]
    fn mismatched_block_end_is_an_error() {
        let text = "Script\nEnd-Other\n";
        assert!(parse_spec_str("in-memory", text).is_err());
    }

    #[test]
    fn invalid_line_is_rejected() {
        let text = "this is not valid\n";
        assert!(parse_spec_str("in-memory", text).is_err());
    }

    #[test]
    fn missing_file_yields_empty_map() {
        let map = parse_spec_file("/nonexistent/path/defaults.ini").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn tokenizes_quoted_and_bare_args() {
        let toks = tokenize_cmdline(r#"-U --state="foo bar" 'single quoted' bare"#);
        assert_eq!(toks, vec!["-U", "--state=foo bar", "single quoted", "bare"]);
    }
}
