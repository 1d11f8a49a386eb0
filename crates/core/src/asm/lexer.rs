//! Line lexer.
//!
//! The source model is line-oriented: every line carries at most one
//! label definition and at most one statement (instruction or directive).
//! Comments start at `#`, `;`, or `//` and truncate the line. Operand
//! tokens are delimited by commas or whitespace; double-quoted string
//! literals are kept as single tokens (quotes included) for the data
//! directives to unescape.

/// One statement: an instruction mnemonic or a `.directive`, plus its
/// operand tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Mnemonic, or directive name including the leading dot.
    pub name: String,
    /// Raw operand tokens.
    pub args: Vec<String>,
}

impl Statement {
    /// Whether this statement is a directive.
    pub fn is_directive(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// One lexed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based source line number.
    pub number: usize,
    /// Label defined on this line, if any (without the colon).
    pub label: Option<String>,
    /// The statement on this line, if any.
    pub statement: Option<Statement>,
}

/// Strips the comment tail, honoring string literals.
fn strip_comment(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
            }
        } else {
            match c {
                b'"' => in_string = true,
                b'#' | b';' => return &text[..i],
                b'/' if bytes.get(i + 1) == Some(&b'/') => return &text[..i],
                _ => {}
            }
        }
        i += 1;
    }
    text
}

/// Splits a statement body into tokens on commas/whitespace, keeping
/// quoted strings whole.
fn split_args(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                current.push(c);
                in_string = true;
            }
            ',' | ' ' | '\t' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Splits off a leading `label:` prefix, if present.
///
/// The colon must come before any whitespace or quote so that `c.eq.s`
/// operands and string literals are never mistaken for labels.
fn split_label(text: &str) -> (Option<&str>, &str) {
    let Some(colon) = text.find(':') else {
        return (None, text);
    };
    let head = &text[..colon];
    if head.is_empty() || head.contains(char::is_whitespace) || head.contains('"') {
        return (None, text);
    }
    (Some(head), &text[colon + 1..])
}

/// Lexes one source line.
pub fn lex_line(number: usize, raw: &str) -> Line {
    let text = strip_comment(raw).trim();
    let (label, rest) = split_label(text);
    let rest = rest.trim();
    let statement = if rest.is_empty() {
        None
    } else {
        let (name, tail) = match rest.find(|c: char| c.is_whitespace()) {
            Some(pos) => (&rest[..pos], &rest[pos..]),
            None => (rest, ""),
        };
        Some(Statement {
            name: name.to_ascii_lowercase(),
            args: split_args(tail),
        })
    };
    Line {
        number,
        label: label.map(ToOwned::to_owned),
        statement,
    }
}

/// Lexes a whole source text into lines, 1-based.
pub fn lex(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .map(|(i, raw)| lex_line(i + 1, raw))
        .collect()
}
