//! `go.mod` parsing.
//!
//! - [`lexer`] — splits each line into tokens and a trailing `//` comment.
//! - [`parse_manifest`] — walks the token lines, recognising single-line
//!   directives and `verb ( ... )` blocks.

pub mod lexer;

use std::path::Path;

use tracing::debug;

use crate::error::ParseError;
use crate::models::{OverrideDirective, Requirement};
use lexer::{Line, Token};

/// Structured contents of a `go.mod` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub module_path: String,
    pub go_version: Option<String>,
    /// In declaration order.
    pub requirements: Vec<Requirement>,
    pub overrides: Vec<OverrideDirective>,
}

/// Read and parse the manifest at `path`.
pub fn read_manifest(path: &Path) -> Result<Manifest, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ParseError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ParseError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    parse_manifest(&content)
}

/// Parse `go.mod` contents.
pub fn parse_manifest(contents: &str) -> Result<Manifest, ParseError> {
    let lines = lexer::tokenize(contents)?;
    let mut builder = Builder::default();
    let mut iter = lines.iter();

    while let Some(line) = iter.next() {
        let verb = match &line.tokens[0] {
            Token::Word(w) => w.as_str(),
            Token::RParen => return Err(ParseError::syntax(line.number, "unexpected ')'")),
            _ => return Err(ParseError::syntax(line.number, "expected directive")),
        };
        let args = &line.tokens[1..];

        match args {
            // verb ( ... ) spanning several lines
            [Token::LParen] => {
                let mut closed = false;
                for entry in iter.by_ref() {
                    if entry.tokens == [Token::RParen] {
                        closed = true;
                        break;
                    }
                    if entry.tokens.contains(&Token::LParen) {
                        return Err(ParseError::syntax(entry.number, "nested block"));
                    }
                    builder.apply(verb, &entry.tokens, entry)?;
                }
                if !closed {
                    return Err(ParseError::syntax(
                        line.number,
                        format!("unterminated {} block", verb),
                    ));
                }
            }
            [Token::LParen, Token::RParen] => {}
            _ => builder.apply(verb, args, line)?,
        }
    }

    builder.finish()
}

#[derive(Default)]
struct Builder {
    module_path: Option<String>,
    go_version: Option<String>,
    requirements: Vec<Requirement>,
    overrides: Vec<OverrideDirective>,
}

impl Builder {
    fn apply(&mut self, verb: &str, args: &[Token], line: &Line) -> Result<(), ParseError> {
        match verb {
            "module" => {
                if self.module_path.is_some() {
                    return Err(ParseError::syntax(line.number, "repeated module directive"));
                }
                let [path] = args else {
                    return Err(ParseError::syntax(line.number, "usage: module path"));
                };
                self.module_path = Some(string_arg(path, line)?);
            }
            "go" => {
                let [version] = args else {
                    return Err(ParseError::syntax(line.number, "usage: go 1.23"));
                };
                self.go_version = Some(string_arg(version, line)?);
            }
            "require" => {
                let [path, version] = args else {
                    return Err(ParseError::syntax(line.number, "usage: require module/path v1.2.3"));
                };
                let path = string_arg(path, line)?;
                let version = string_arg(version, line)?;
                check_version(&version, line)?;
                self.requirements.push(Requirement {
                    path,
                    version,
                    indirect: line.is_indirect(),
                });
            }
            "replace" => self.overrides.push(parse_replace(args, line)?),
            "toolchain" | "exclude" | "retract" | "godebug" => {
                for arg in args {
                    string_arg(arg, line)?;
                }
            }
            other => debug!(verb = other, line = line.number, "ignoring unknown go.mod directive"),
        }
        Ok(())
    }

    fn finish(self) -> Result<Manifest, ParseError> {
        let module_path = self.module_path.ok_or(ParseError::MissingModule)?;
        Ok(Manifest {
            module_path,
            go_version: self.go_version,
            requirements: self.requirements,
            overrides: self.overrides,
        })
    }
}

/// `old [version] => new [version]`
fn parse_replace(args: &[Token], line: &Line) -> Result<OverrideDirective, ParseError> {
    let usage = || {
        ParseError::syntax(
            line.number,
            "usage: replace module/path [v1.2.3] => other/module v1.4 | ../local/dir",
        )
    };

    let arrow = args.iter().position(|t| *t == Token::Arrow).ok_or_else(usage)?;
    let (lhs, rhs) = (&args[..arrow], &args[arrow + 1..]);

    let (from_path, from_version) = match lhs {
        [path] => (string_arg(path, line)?, None),
        [path, version] => {
            let version = string_arg(version, line)?;
            check_version(&version, line)?;
            (string_arg(path, line)?, Some(version))
        }
        _ => return Err(usage()),
    };

    match rhs {
        [target] => {
            let to_path = string_arg(target, line)?;
            if !is_local_path(&to_path) {
                return Err(ParseError::syntax(
                    line.number,
                    format!("replacement module {} needs a version", to_path),
                ));
            }
            Ok(OverrideDirective {
                from_path,
                from_version,
                to_local_dir: Some(to_path.clone()),
                to_path,
                to_version: None,
            })
        }
        [target, version] => {
            let to_path = string_arg(target, line)?;
            if is_local_path(&to_path) {
                return Err(ParseError::syntax(
                    line.number,
                    format!("replacement directory {} cannot have a version", to_path),
                ));
            }
            let version = string_arg(version, line)?;
            check_version(&version, line)?;
            Ok(OverrideDirective {
                from_path,
                from_version,
                to_path,
                to_version: Some(version),
                to_local_dir: None,
            })
        }
        _ => Err(usage()),
    }
}

fn string_arg(token: &Token, line: &Line) -> Result<String, ParseError> {
    match token {
        Token::Word(s) | Token::Str(s) if !s.is_empty() => Ok(s.clone()),
        Token::Word(_) | Token::Str(_) => Err(ParseError::syntax(line.number, "empty argument")),
        Token::LParen => Err(ParseError::syntax(line.number, "unexpected '('")),
        Token::RParen => Err(ParseError::syntax(line.number, "unexpected ')'")),
        Token::Arrow => Err(ParseError::syntax(line.number, "unexpected '=>'")),
    }
}

/// Module versions are `v` + semver, including pseudo-versions and `+incompatible`.
fn check_version(version: &str, line: &Line) -> Result<(), ParseError> {
    let invalid = |reason: String| ParseError::InvalidVersion {
        line: line.number,
        version: version.to_string(),
        reason,
    };
    let bare = version
        .strip_prefix('v')
        .ok_or_else(|| invalid("missing leading 'v'".to_string()))?;
    semver::Version::parse(bare).map_err(|e| invalid(e.to_string()))?;
    Ok(())
}

/// Replacement targets naming a directory instead of a module.
pub fn is_local_path(path: &str) -> bool {
    path == "."
        || path == ".."
        || path.starts_with("./")
        || path.starts_with("../")
        || path.starts_with(".\\")
        || path.starts_with("..\\")
        || Path::new(path).is_absolute()
        || path.starts_with('/')
        || is_windows_drive_path(path)
}

fn is_windows_drive_path(path: &str) -> bool {
    let b = path.as_bytes();
    b.len() >= 3 && b[0].is_ascii_alphabetic() && b[1] == b':' && (b[2] == b'\\' || b[2] == b'/')
}
