//! Whitespace tokenizer shared by the LEF and DEF readers.
//!
//! Both formats are streams of whitespace-separated words terminated by `;`,
//! with `#` line comments and double-quoted strings. `;` always stands alone
//! as a token even when written flush against a word.

use std::fmt;

/// A single word from a LEF or DEF file with its 1-based position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The token text, with surrounding quotes removed for quoted strings.
    pub text: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub col: u32,
    /// Whether the token was a double-quoted string.
    pub quoted: bool,
}

impl Token {
    /// Returns `true` if this is an unquoted token equal to `kw`.
    pub fn is(&self, kw: &str) -> bool {
        !self.quoted && self.text == kw
    }
}

/// A positioned failure while consuming a token stream.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{col}: {message}")]
pub struct TokenError {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub col: u32,
    /// What went wrong.
    pub message: String,
}

/// Splits source text into tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1u32;
    let mut col = 1u32;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                chars.next();
                line += 1;
                col = 1;
            }
            c if c.is_whitespace() => {
                chars.next();
                col += 1;
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ';' => {
                chars.next();
                tokens.push(Token {
                    text: ";".to_string(),
                    line,
                    col,
                    quoted: false,
                });
                col += 1;
            }
            '"' => {
                let (start_line, start_col) = (line, col);
                chars.next();
                col += 1;
                let mut text = String::new();
                while let Some(c) = chars.next() {
                    col += 1;
                    match c {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                col += 1;
                                text.push(escaped);
                            }
                        }
                        '\n' => {
                            line += 1;
                            col = 1;
                            text.push(c);
                        }
                        _ => text.push(c),
                    }
                }
                tokens.push(Token {
                    text,
                    line: start_line,
                    col: start_col,
                    quoted: true,
                });
            }
            _ => {
                let start_col = col;
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == ';' {
                        break;
                    }
                    text.push(c);
                    chars.next();
                    col += 1;
                }
                tokens.push(Token {
                    text,
                    line,
                    col: start_col,
                    quoted: false,
                });
            }
        }
    }

    tokens
}

/// A cursor over a token vector with the lookahead helpers both readers use.
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    /// Tokenizes `source` and positions the cursor at the first token.
    pub fn new(source: &str) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
        }
    }

    /// Returns `true` once every token has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Returns `true` if the next token is the unquoted keyword `kw`.
    pub fn peek_is(&self, kw: &str) -> bool {
        self.peek().is_some_and(|t| t.is(kw))
    }

    /// Position of the next token, or of the end of input.
    pub fn position(&self) -> (u32, u32) {
        match self.peek().or_else(|| self.tokens.last()) {
            Some(t) => (t.line, t.col),
            None => (1, 1),
        }
    }

    /// Builds an error positioned at the next token.
    pub fn error(&self, message: impl Into<String>) -> TokenError {
        let (line, col) = self.position();
        TokenError {
            line,
            col,
            message: message.into(),
        }
    }

    /// Consumes and returns the next token.
    pub fn next_token(&mut self) -> Result<Token, TokenError> {
        match self.tokens.get(self.pos) {
            Some(t) => {
                self.pos += 1;
                Ok(t.clone())
            }
            None => Err(self.error("unexpected end of file")),
        }
    }

    /// Consumes the next token and returns its text.
    pub fn next_word(&mut self) -> Result<String, TokenError> {
        self.next_token().map(|t| t.text)
    }

    /// Consumes the next token, which must be the keyword `kw`.
    pub fn expect(&mut self, kw: &str) -> Result<(), TokenError> {
        if self.peek_is(kw) {
            self.pos += 1;
            return Ok(());
        }
        let found = self
            .peek()
            .map_or_else(|| "end of file".to_string(), |t| format!("`{}`", t.text));
        Err(self.error(format!("expected `{kw}`, found {found}")))
    }

    /// Consumes the next token if it is the keyword `kw`.
    pub fn eat(&mut self, kw: &str) -> bool {
        if self.peek_is(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes the next token and parses it as an integer.
    pub fn next_int(&mut self) -> Result<i64, TokenError> {
        let err = self.error("expected an integer");
        let tok = self.next_token()?;
        tok.text.parse::<i64>().map_err(|_| TokenError {
            message: format!("{}, found `{}`", err.message, tok.text),
            ..err
        })
    }

    /// Consumes the next token and parses it as a real number.
    pub fn next_real(&mut self) -> Result<f64, TokenError> {
        let err = self.error("expected a number");
        let tok = self.next_token()?;
        tok.text.parse::<f64>().map_err(|_| TokenError {
            message: format!("{}, found `{}`", err.message, tok.text),
            ..err
        })
    }

    /// Returns `true` if the next token parses as a number.
    pub fn peek_is_number(&self) -> bool {
        self.peek()
            .is_some_and(|t| !t.quoted && t.text.parse::<f64>().is_ok())
    }

    /// Consumes tokens up to and including the next `;`.
    pub fn skip_statement(&mut self) -> Result<(), TokenError> {
        loop {
            let tok = self.next_token()?;
            if tok.is(";") {
                return Ok(());
            }
        }
    }

    /// Consumes tokens up to and including the pair `END <name>`.
    pub fn skip_block(&mut self, name: &str) -> Result<(), TokenError> {
        loop {
            let tok = self.next_token()?;
            if tok.is("END") && self.peek().is_some_and(|t| t.text == name) {
                self.pos += 1;
                return Ok(());
            }
        }
    }
}
