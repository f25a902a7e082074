use crate::error::{Error, Result};

/// Character-level scanner for Arma config text.
///
/// All structural syntax (`class`, `=`, `{`, `}`, `;`, quotes) is ASCII;
/// non-ASCII text only ever appears inside quoted strings, which are
/// scanned byte-wise for the closing quote and sliced on quote
/// boundaries, so positions always stay on UTF-8 char boundaries.
pub struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    pub fn err(&self, message: impl Into<String>) -> Error {
        Error::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    /// Skips whitespace, `// ...` line comments and `/* ... */` block
    /// comments.
    pub fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                    let start_line = self.line;
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            Some(b'*') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                            None => {
                                return Err(Error::Syntax {
                                    line: start_line,
                                    message: "unterminated block comment".into(),
                                });
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Consumes `expected` or fails, skipping leading trivia.
    pub fn expect(&mut self, expected: u8) -> Result<()> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b) if b == expected => {
                self.bump();
                Ok(())
            }
            Some(b) => Err(self.err(format!(
                "expected `{}`, found `{}`",
                expected as char, b as char
            ))),
            None => Err(self.err(format!("expected `{}`, found end of input", expected as char))),
        }
    }

    /// Consumes `expected` if it is next (after trivia); reports whether
    /// it did.
    pub fn eat(&mut self, expected: u8) -> Result<bool> {
        self.skip_trivia()?;
        if self.peek() == Some(expected) {
            self.bump();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Scans an identifier: `[A-Za-z_][A-Za-z0-9_]*`, skipping leading
    /// trivia.
    pub fn ident(&mut self) -> Result<&'a str> {
        self.skip_trivia()?;
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                self.bump();
            }
            Some(b) => return Err(self.err(format!("expected identifier, found `{}`", b as char))),
            None => return Err(self.err("expected identifier, found end of input")),
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.bump();
            } else {
                break;
            }
        }
        Ok(&self.src[start..self.pos])
    }

    /// Scans a double-quoted string, skipping leading trivia. A doubled
    /// quote (`""`) inside the string denotes a literal quote character.
    pub fn quoted_string(&mut self) -> Result<String> {
        self.skip_trivia()?;
        if self.peek() != Some(b'"') {
            return Err(self.err("expected string literal"));
        }
        self.bump();
        let mut out = String::new();
        let mut chunk_start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => {
                    out.push_str(&self.src[chunk_start..self.pos]);
                    self.bump();
                    if self.peek() == Some(b'"') {
                        out.push('"');
                        self.bump();
                        chunk_start = self.pos;
                    } else {
                        return Ok(out);
                    }
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.err("unterminated string literal")),
            }
        }
    }

    /// Scans a numeric token (integer, decimal or scientific notation),
    /// skipping leading trivia. Returns the raw slice for the caller to
    /// parse.
    pub fn number_token(&mut self) -> Result<&'a str> {
        self.skip_trivia()?;
        let start = self.pos;
        if matches!(self.peek(), Some(b'-') | Some(b'+')) {
            self.bump();
        }
        let digits_start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'-' | b'+') {
                // sign bytes are only valid right after an exponent marker
                if matches!(b, b'-' | b'+')
                    && !matches!(self.bytes.get(self.pos - 1), Some(b'e') | Some(b'E'))
                {
                    break;
                }
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == digits_start {
            return match self.peek() {
                Some(b) => Err(self.err(format!("expected number, found `{}`", b as char))),
                None => Err(self.err("expected number, found end of input")),
            };
        }
        Ok(&self.src[start..self.pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_and_trivia() {
        let mut s = Scanner::new("  // comment\n  /* block\n comment */ climate = ");
        assert_eq!(s.ident().unwrap(), "climate");
        assert!(s.eat(b'=').unwrap());
        assert_eq!(s.line(), 3);
    }

    #[test]
    fn test_quoted_string() {
        let mut s = Scanner::new(r#" "Agia Marina" "#);
        assert_eq!(s.quoted_string().unwrap(), "Agia Marina");
    }

    #[test]
    fn test_doubled_quote_escape() {
        let mut s = Scanner::new(r#""he said ""hi""""#);
        assert_eq!(s.quoted_string().unwrap(), r#"he said "hi""#);
    }

    #[test]
    fn test_unterminated_string() {
        let mut s = Scanner::new("\"no end");
        assert!(s.quoted_string().is_err());
    }

    #[test]
    fn test_number_tokens() {
        let mut s = Scanner::new(" 15656.2,-3.5 1e-5 42");
        assert_eq!(s.number_token().unwrap(), "15656.2");
        assert!(s.eat(b',').unwrap());
        assert_eq!(s.number_token().unwrap(), "-3.5");
        assert_eq!(s.number_token().unwrap(), "1e-5");
        assert_eq!(s.number_token().unwrap(), "42");
        s.skip_trivia().unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_error_carries_line() {
        let mut s = Scanner::new("a = 1;\nb = ;\n");
        assert_eq!(s.ident().unwrap(), "a");
        s.expect(b'=').unwrap();
        s.number_token().unwrap();
        s.expect(b';').unwrap();
        assert_eq!(s.ident().unwrap(), "b");
        s.expect(b'=').unwrap();
        let err = s.number_token().unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }
}
