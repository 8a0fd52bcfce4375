use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare identifier such as a verb, module path or version.
    Word(String),
    /// Quoted string with quotes and escapes removed.
    Str(String),
    LParen,
    RParen,
    Arrow,
}

/// One source line split into tokens, with its trailing `//` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    pub tokens: Vec<Token>,
    pub comment: Option<String>,
}

impl Line {
    /// A trailing `// indirect` (optionally followed by `; ...`).
    pub fn is_indirect(&self) -> bool {
        match self.comment.as_deref() {
            Some(c) => c == "indirect" || c.starts_with("indirect;"),
            None => false,
        }
    }
}

/// Split `go.mod` contents into lines of tokens.
///
/// Lines without tokens (blank or comment-only) are dropped.
pub fn tokenize(input: &str) -> Result<Vec<Line>, ParseError> {
    let mut lines = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = tokenize_line(idx + 1, raw)?;
        if !line.tokens.is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn tokenize_line(number: usize, raw: &str) -> Result<Line, ParseError> {
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut chars = raw.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let rest = &raw[pos..];
        if rest.starts_with("//") {
            comment = Some(rest[2..].trim().to_string());
            break;
        }
        if rest.starts_with("/*") {
            return Err(ParseError::syntax(number, "block comments are not allowed"));
        }
        match c {
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '"' => {
                chars.next();
                tokens.push(Token::Str(read_interpreted(number, &mut chars)?));
            }
            '`' => {
                chars.next();
                let mut s = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '`' {
                        closed = true;
                        break;
                    }
                    s.push(c);
                }
                if !closed {
                    return Err(ParseError::syntax(number, "unterminated raw string"));
                }
                tokens.push(Token::Str(s));
            }
            _ => {
                let mut word = String::new();
                while let Some(&(p, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '"' | '`') {
                        break;
                    }
                    let rest = &raw[p..];
                    if rest.starts_with("//") || rest.starts_with("/*") {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                if word == "=>" {
                    tokens.push(Token::Arrow);
                } else {
                    tokens.push(Token::Word(word));
                }
            }
        }
    }

    Ok(Line {
        number,
        tokens,
        comment,
    })
}

fn read_interpreted(
    number: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<String, ParseError> {
    let mut s = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '"' => return Ok(s),
            '\\' => match chars.next() {
                Some((_, 'n')) => s.push('\n'),
                Some((_, 't')) => s.push('\t'),
                Some((_, '\\')) => s.push('\\'),
                Some((_, '"')) => s.push('"'),
                Some((_, other)) => {
                    return Err(ParseError::syntax(
                        number,
                        format!("unknown escape sequence \\{}", other),
                    ))
                }
                None => break,
            },
            _ => s.push(c),
        }
    }
    Err(ParseError::syntax(number, "unterminated quoted string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &Line) -> Vec<String> {
        line.tokens
            .iter()
            .map(|t| match t {
                Token::Word(w) | Token::Str(w) => w.clone(),
                Token::LParen => "(".into(),
                Token::RParen => ")".into(),
                Token::Arrow => "=>".into(),
            })
            .collect()
    }

    #[test]
    fn test_tokenize_require_line_with_comment() {
        let lines = tokenize("require example.com/b v2.0.0 // indirect\n").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(words(&lines[0]), ["require", "example.com/b", "v2.0.0"]);
        assert!(lines[0].is_indirect());
    }

    #[test]
    fn test_comment_only_lines_dropped() {
        let lines = tokenize("// header\n\nmodule x\n").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 3);
    }

    #[test]
    fn test_quoted_string_keeps_slashes() {
        let lines = tokenize(r#"module "example.com//odd" // note"#).unwrap();
        assert_eq!(lines[0].tokens[1], Token::Str("example.com//odd".into()));
        assert_eq!(lines[0].comment.as_deref(), Some("note"));
        assert!(!lines[0].is_indirect());
    }

    #[test]
    fn test_parens_and_arrow() {
        let lines = tokenize("replace (\n a => ./a\n)").unwrap();
        assert_eq!(lines[0].tokens, vec![Token::Word("replace".into()), Token::LParen]);
        assert_eq!(lines[1].tokens[1], Token::Arrow);
        assert_eq!(lines[2].tokens, vec![Token::RParen]);
    }

    #[test]
    fn test_indirect_with_suffix() {
        let lines = tokenize("x v1.0.0 // indirect; pinned").unwrap();
        assert!(lines[0].is_indirect());
        let lines = tokenize("x v1.0.0 // indirectly used").unwrap();
        assert!(!lines[0].is_indirect());
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("module \"example.com/x\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }
}
