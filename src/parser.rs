//! Pattern parser.
//!
//! Supports: literals, ., *, +, ?, |, &, ~, (), [] with ranges and negation.
//!
//! `&` is intersection and `~` complement; both are first-class operators
//! of the algebra, not post-processing. `|` binds loosest, then `&`, then
//! concatenation, then the quantifiers. There are no anchors: the engine
//! matches whole strings, so `^` and `$` are ordinary characters.

use crate::exp::{
    any_character, character, character_class, complement, concat_all, concatenation,
    conjunction, disjunction, empty_string, kleene_closure, Exp, Rune,
};

/// Parse a pattern string into an expression handle.
pub fn parse(pattern: &str) -> Result<Exp, ParseError> {
    let mut parser = Parser::new(pattern);
    let exp = parser.parse_expr()?;
    match parser.peek() {
        None => Ok(exp),
        Some(c) => Err(parser.error(&format!("unexpected '{}'", c))),
    }
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            pos: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn next(&mut self) -> Option<char> {
        self.chars.next().map(|(i, c)| {
            self.pos = i + c.len_utf8();
            c
        })
    }

    fn error(&self, msg: &str) -> ParseError {
        ParseError {
            message: msg.to_string(),
            position: self.pos,
        }
    }

    /// Parse full expression (handles |)
    fn parse_expr(&mut self) -> Result<Exp, ParseError> {
        let mut operands = vec![self.parse_intersect()?];

        while self.peek() == Some('|') {
            self.next(); // consume '|'
            operands.push(self.parse_intersect()?);
        }

        Ok(disjunction(operands))
    }

    /// Parse intersection (handles &)
    fn parse_intersect(&mut self) -> Result<Exp, ParseError> {
        let mut operands = vec![self.parse_concat()?];

        while self.peek() == Some('&') {
            self.next(); // consume '&'
            operands.push(self.parse_concat()?);
        }

        Ok(conjunction(operands))
    }

    /// Parse concatenation
    fn parse_concat(&mut self) -> Result<Exp, ParseError> {
        let mut parts: Vec<Exp> = Vec::new();

        while let Some(c) = self.peek() {
            if c == '|' || c == '&' || c == ')' {
                break;
            }
            parts.push(self.parse_quantified()?);
        }

        Ok(concat_all(parts))
    }

    /// Parse quantified atom (*, +, ?)
    fn parse_quantified(&mut self) -> Result<Exp, ParseError> {
        let mut exp = self.parse_atom()?;

        loop {
            match self.peek() {
                Some('*') => {
                    self.next();
                    exp = kleene_closure(exp);
                }
                Some('+') => {
                    self.next();
                    exp = concatenation(exp.clone(), kleene_closure(exp));
                }
                Some('?') => {
                    self.next();
                    exp = disjunction(vec![empty_string(), exp]);
                }
                _ => return Ok(exp),
            }
        }
    }

    /// Parse atomic expression
    fn parse_atom(&mut self) -> Result<Exp, ParseError> {
        match self.peek() {
            None => Err(self.error("unexpected end of pattern")),
            Some('(') => {
                self.next(); // consume '('
                let inner = self.parse_expr()?;
                if self.peek() != Some(')') {
                    return Err(self.error("expected ')'"));
                }
                self.next(); // consume ')'
                Ok(inner)
            }
            Some('~') => {
                self.next(); // consume '~'
                let inner = self.parse_atom()?;
                Ok(complement(inner))
            }
            Some('.') => {
                self.next();
                Ok(any_character())
            }
            Some('[') => self.parse_class(),
            Some('\\') => {
                self.next(); // consume '\'
                match self.next() {
                    Some(c) => Ok(character(c as Rune)),
                    None => Err(self.error("expected character after \\")),
                }
            }
            Some(c) if c == '*' || c == '+' || c == '?' => {
                Err(self.error("nothing to repeat"))
            }
            Some(c) => {
                self.next();
                Ok(character(c as Rune))
            }
        }
    }

    /// Parse character class [...]
    fn parse_class(&mut self) -> Result<Exp, ParseError> {
        self.next(); // consume '['

        let negated = if self.peek() == Some('^') {
            self.next();
            true
        } else {
            false
        };

        let mut runes = Vec::new();

        loop {
            let c = match self.peek() {
                None => return Err(self.error("unterminated character class")),
                Some(']') => break,
                Some(_) => self.class_char()?,
            };

            // Check for range a-z; a trailing '-' is a literal.
            if self.peek() == Some('-') {
                self.next(); // consume '-'
                match self.peek() {
                    None => return Err(self.error("unterminated character class")),
                    Some(']') => {
                        runes.push(c as Rune);
                        runes.push('-' as Rune);
                    }
                    Some(_) => {
                        let end = self.class_char()?;
                        if end < c {
                            return Err(self.error("invalid character range"));
                        }
                        runes.extend((c..=end).map(|r| r as Rune));
                    }
                }
            } else {
                runes.push(c as Rune);
            }
        }
        self.next(); // consume ']'

        let class = character_class(runes);
        if negated {
            // One character that is not in the set. Complement alone would
            // also admit strings of other lengths.
            Ok(conjunction(vec![any_character(), complement(class)]))
        } else {
            Ok(class)
        }
    }

    /// One class member, honouring escapes.
    fn class_char(&mut self) -> Result<char, ParseError> {
        match self.next() {
            Some('\\') => self
                .next()
                .ok_or_else(|| self.error("expected character after \\")),
            Some(c) => Ok(c),
            None => Err(self.error("unterminated character class")),
        }
    }
}
