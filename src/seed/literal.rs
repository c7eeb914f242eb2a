//! Parser for the textual list literals found in the invoices seed file.
//!
//! The `products` column holds values such as
//! `[{'product_id': 1, 'quantity': 2, 'price': 9.99}]`: lists, mappings,
//! tuples, quoted strings (optionally prefixed `u`, `b` or `r`), numbers and
//! the keywords `True`, `False`, `None`. This parser turns that text into a
//! JSON value. It evaluates nothing. Byte strings decode each byte as the
//! code point of the same value.

use serde_json::{Map, Number, Value};

/// A literal could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    /// Byte offset into the input where parsing stopped.
    pub offset: usize,
    pub message: String,
}

/// Parse a complete literal. Trailing non-whitespace input is an error.
pub fn parse(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src: input, pos: 0 };
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos < input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => {
                self.bump();
                self.sequence(']')
            }
            Some('(') => {
                self.bump();
                self.sequence(')')
            }
            Some('{') => {
                self.bump();
                self.mapping()
            }
            Some(quote @ ('\'' | '"')) => {
                self.bump();
                self.string(quote, false).map(Value::String)
            }
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => self.keyword(),
            Some(c) => Err(self.error(format!("unexpected character {c:?}"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Items up to `close`; the opening bracket is already consumed.
    fn sequence(&mut self, close: char) -> Result<Value, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(Value::Array(items)),
                Some(c) => {
                    self.pos -= c.len_utf8();
                    return Err(self.error(format!("expected ',' or {close:?}")));
                }
                None => return Err(self.error(format!("unterminated sequence, expected {close:?}"))),
            }
        }
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key_offset = self.pos;
            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(LiteralError {
                        offset: key_offset,
                        message: "mapping keys must be strings or numbers".into(),
                    })
                }
            };

            self.skip_whitespace();
            if self.bump() != Some(':') {
                return Err(self.error("expected ':' after mapping key"));
            }
            let value = self.value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                Some(c) => {
                    self.pos -= c.len_utf8();
                    return Err(self.error("expected ',' or '}'"));
                }
                None => return Err(self.error("unterminated mapping, expected '}'")),
            }
        }
    }

    /// String body up to the matching `quote`; the opening quote is consumed.
    ///
    /// In a `raw` string a backslash only stops the next character from
    /// closing the string; both are kept.
    fn string(&mut self, quote: char, raw: bool) -> Result<String, LiteralError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') if raw => {
                    out.push('\\');
                    match self.bump() {
                        Some(c) => out.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('a') => '\u{07}',
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0c}',
                        Some('v') => '\u{0b}',
                        Some(c @ '0'..='7') => self.octal(c)?,
                        Some('x') => self.code_point(2)?,
                        Some('u') => self.code_point(4)?,
                        Some('U') => self.code_point(8)?,
                        Some('\n') => continue,
                        Some(c @ ('\\' | '\'' | '"')) => c,
                        Some(c) => {
                            // Unknown escapes are kept verbatim.
                            out.push('\\');
                            c
                        }
                        None => return Err(self.error("unterminated string")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Up to three octal digits, the first already consumed.
    fn octal(&mut self, first: char) -> Result<char, LiteralError> {
        let mut code = first.to_digit(8).unwrap_or_default();
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    code = code * 8 + digit;
                    self.bump();
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn code_point(&mut self, digits: usize) -> Result<char, LiteralError> {
        let start = self.pos;
        let end = start + digits;
        let hex = self
            .src
            .get(start..end)
            .ok_or_else(|| self.error("truncated escape sequence"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid escape sequence"))?;
        let c = char::from_u32(code).ok_or_else(|| self.error("invalid code point"))?;
        self.pos = end;
        Ok(c)
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '_'))
        {
            self.bump();
        }
        let text: String = self.src[start..self.pos].chars().filter(|c| *c != '_').collect();

        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError {
                offset: start,
                message: format!("invalid number {text:?}"),
            })
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let word = &self.src[start..self.pos];
        if let Some(quote @ ('\'' | '"')) = self.peek() {
            let prefix = word.to_ascii_lowercase();
            if matches!(prefix.as_str(), "u" | "b" | "r" | "br" | "rb") {
                self.bump();
                return self.string(quote, prefix.contains('r')).map(Value::String);
            }
        }
        match word {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            word => Err(LiteralError {
                offset: start,
                message: format!("unknown name {word:?}"),
            }),
        }
    }
}
