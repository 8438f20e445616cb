//! The parser for the regex surface syntax.
//!
//! The grammar is POSIX extended regex without anchors, extended with set
//! intersection `S1{-}S2` and set union `S1{+}S2` over bracket sets and
//! character classes. The parser is a plain recursive descent over the
//! pattern's characters and produces expressions through the smart
//! constructors, so the result is always in canonical form.

use std::rc::Rc;

use crate::errors::RegexError;

use super::char_set::CharSet;
use super::expr::{and, any, concat, empty_string, not, or, star, symbol, Expr};

/// Parse a pattern's surface syntax into an expression.
pub(crate) fn parse_regex(pattern: &str) -> Result<Rc<Expr>, RegexError> {
    let mut parser = Parser::new(pattern);
    let expr = parser.parse_alternation()?;
    match parser.peek() {
        None => Ok(expr),
        Some(c) => Err(RegexError::UnexpectedChar(c, parser.pos)),
    }
}

/// A bracket set or character class before it is turned into an expression.
/// Negation is kept symbolic so that the set operators can work on finite
/// sets throughout.
#[derive(Debug, Clone)]
struct SetAtom {
    set: CharSet,
    negated: bool,
}

impl SetAtom {
    fn union(self, other: SetAtom) -> SetAtom {
        match (self.negated, other.negated) {
            (false, false) => SetAtom {
                set: self.set.union(&other.set),
                negated: false,
            },
            (true, true) => SetAtom {
                set: self.set.intersect(&other.set),
                negated: true,
            },
            // A ∪ ¬B = ¬(B \ A)
            (false, true) => SetAtom {
                set: other.set.difference(&self.set),
                negated: true,
            },
            (true, false) => SetAtom {
                set: self.set.difference(&other.set),
                negated: true,
            },
        }
    }

    fn intersect(self, other: SetAtom) -> SetAtom {
        match (self.negated, other.negated) {
            (false, false) => SetAtom {
                set: self.set.intersect(&other.set),
                negated: false,
            },
            (true, true) => SetAtom {
                set: self.set.union(&other.set),
                negated: true,
            },
            // A ∩ ¬B = A \ B
            (false, true) => SetAtom {
                set: self.set.difference(&other.set),
                negated: false,
            },
            (true, false) => SetAtom {
                set: other.set.difference(&self.set),
                negated: false,
            },
        }
    }

    /// Turn the set into a single-character expression. Positive sets become
    /// alternations of symbols; negated sets become the single-character
    /// complement `. ∧ ¬(…)`.
    fn into_expr(self) -> Rc<Expr> {
        let positive = set_to_expr(&self.set);
        if self.negated {
            and(any(), not(positive))
        } else {
            positive
        }
    }
}

fn set_to_expr(set: &CharSet) -> Rc<Expr> {
    set.iter_chars()
        .fold(Rc::new(Expr::EmptySet), |acc, c| or(acc, symbol(c)))
}

/// The result of parsing one escape sequence.
enum Escaped {
    Literal(char),
    Class(SetAtom),
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(pattern: &str) -> Self {
        Parser {
            chars: pattern.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_alternation(&mut self) -> Result<Rc<Expr>, RegexError> {
        let mut expr = self.parse_concat()?;
        while self.eat('|') {
            expr = or(expr, self.parse_concat()?);
        }
        Ok(expr)
    }

    fn parse_concat(&mut self) -> Result<Rc<Expr>, RegexError> {
        let mut expr = empty_string();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            expr = concat(expr, self.parse_factor()?);
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> Result<Rc<Expr>, RegexError> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.peek() {
                Some('*') => {
                    self.bump();
                    expr = star(expr);
                }
                Some('+') => {
                    self.bump();
                    expr = concat(expr.clone(), star(expr));
                }
                Some('?') => {
                    self.bump();
                    expr = or(empty_string(), expr);
                }
                Some('{') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    expr = self.parse_counted(expr)?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Counted repetition `{m}` and `{m,n}`; the opening brace and a leading
    /// digit have been seen by the caller.
    fn parse_counted(&mut self, expr: Rc<Expr>) -> Result<Rc<Expr>, RegexError> {
        self.bump();
        let min = self.parse_number()?;
        let max = if self.eat(',') {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => self.parse_number()?,
                _ => return Err(RegexError::InvalidRepetition),
            }
        } else {
            min
        };
        if !self.eat('}') {
            return Err(RegexError::InvalidRepetition);
        }
        if max < min {
            return Err(RegexError::InvalidRepetition);
        }
        let mut result = empty_string();
        for _ in 0..min {
            result = concat(result, expr.clone());
        }
        for _ in min..max {
            result = concat(result, or(empty_string(), expr.clone()));
        }
        Ok(result)
    }

    fn parse_number(&mut self) -> Result<usize, RegexError> {
        let mut value: usize = 0;
        let mut digits = 0;
        while let Some(c) = self.peek() {
            if let Some(d) = c.to_digit(10) {
                self.bump();
                value = value.saturating_mul(10).saturating_add(d as usize);
                digits += 1;
            } else {
                break;
            }
        }
        if digits == 0 {
            return Err(RegexError::InvalidRepetition);
        }
        Ok(value)
    }

    fn parse_atom(&mut self) -> Result<Rc<Expr>, RegexError> {
        match self.peek() {
            None => Err(RegexError::UnexpectedEnd),
            Some('(') => {
                self.bump();
                let expr = self.parse_alternation()?;
                if !self.eat(')') {
                    return Err(RegexError::UnclosedGroup);
                }
                Ok(expr)
            }
            Some('.') => {
                self.bump();
                Ok(any())
            }
            Some('[') => self.parse_set_expression(),
            Some('\\') => match self.parse_escape()? {
                Escaped::Literal(c) => Ok(symbol(c)),
                Escaped::Class(_) => {
                    // Rewind so the set-operator chain sees the escape as its
                    // first operand.
                    self.pos -= 2;
                    self.parse_set_expression()
                }
            },
            Some(c @ ('*' | '+' | '?')) => Err(RegexError::UnexpectedChar(c, self.pos)),
            Some(c) => {
                self.bump();
                Ok(symbol(c))
            }
        }
    }

    /// A bracket set or class escape, optionally chained with the set
    /// operators `{-}` (intersection) and `{+}` (union).
    fn parse_set_expression(&mut self) -> Result<Rc<Expr>, RegexError> {
        let mut atom = self.parse_set_primary()?;
        loop {
            let op = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
                (Some('{'), Some('-'), Some('}')) => '-',
                (Some('{'), Some('+'), Some('}')) => '+',
                _ => break,
            };
            self.pos += 3;
            let rhs = self.parse_set_primary()?;
            atom = if op == '-' {
                atom.intersect(rhs)
            } else {
                atom.union(rhs)
            };
        }
        Ok(atom.into_expr())
    }

    /// One operand of a set expression: a bracket set, a standalone
    /// `[:name:]` class or a class escape.
    fn parse_set_primary(&mut self) -> Result<SetAtom, RegexError> {
        match self.peek() {
            Some('[') if self.peek_at(1) == Some(':') => {
                let set = self.parse_posix_class()?;
                Ok(SetAtom {
                    set,
                    negated: false,
                })
            }
            Some('[') => self.parse_bracket_set(),
            Some('\\') => match self.parse_escape()? {
                Escaped::Literal(c) => Ok(SetAtom {
                    set: CharSet::single(c),
                    negated: false,
                }),
                Escaped::Class(atom) => Ok(atom),
            },
            Some(c) => Err(RegexError::UnexpectedChar(c, self.pos)),
            None => Err(RegexError::UnexpectedEnd),
        }
    }

    /// A `[...]` or `[^...]` bracket set.
    fn parse_bracket_set(&mut self) -> Result<SetAtom, RegexError> {
        self.bump();
        let negated = self.eat('^');
        let mut set = CharSet::empty();
        loop {
            match self.peek() {
                None => return Err(RegexError::UnclosedSet),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('[') if self.peek_at(1) == Some(':') => {
                    let class = self.parse_posix_class()?;
                    self.reject_range_after_class()?;
                    set = set.union(&class);
                }
                Some('\\') => match self.parse_escape()? {
                    Escaped::Literal(c) => {
                        set = set.union(&self.parse_possible_range(c)?);
                    }
                    Escaped::Class(atom) => {
                        if atom.negated {
                            return Err(RegexError::NegatedClassInSet);
                        }
                        self.reject_range_after_class()?;
                        set = set.union(&atom.set);
                    }
                },
                Some(c) => {
                    self.bump();
                    set = set.union(&self.parse_possible_range(c)?);
                }
            }
        }
        if set.is_empty() {
            return Err(RegexError::EmptyClass);
        }
        Ok(SetAtom { set, negated })
    }

    /// A class item cannot be a range endpoint.
    fn reject_range_after_class(&self) -> Result<(), RegexError> {
        if self.peek() == Some('-') && self.peek_at(1).is_some_and(|c| c != ']') {
            return Err(RegexError::InvalidRange(
                "range endpoints must be literal characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Continue a bracket item that started with the literal `start`,
    /// producing either a single character or a range.
    fn parse_possible_range(&mut self, start: char) -> Result<CharSet, RegexError> {
        if self.peek() != Some('-') || self.peek_at(1) == Some(']') || self.peek_at(1).is_none() {
            return Ok(CharSet::single(start));
        }
        self.bump();
        let end = match self.peek() {
            Some('[') if self.peek_at(1) == Some(':') => {
                return Err(RegexError::InvalidRange(
                    "range endpoints must be literal characters".to_string(),
                ))
            }
            Some('\\') => match self.parse_escape()? {
                Escaped::Literal(c) => c,
                Escaped::Class(_) => {
                    return Err(RegexError::InvalidRange(
                        "range endpoints must be literal characters".to_string(),
                    ))
                }
            },
            Some(c) => {
                self.bump();
                c
            }
            None => return Err(RegexError::UnclosedSet),
        };
        if end <= start {
            return Err(RegexError::InvalidRange(format!(
                "'{}-{}' is not an ascending range",
                start.escape_default(),
                end.escape_default()
            )));
        }
        Ok(CharSet::range(start, end))
    }

    /// A `[:name:]` character class; the leading `[` and `:` have been seen
    /// by the caller.
    fn parse_posix_class(&mut self) -> Result<CharSet, RegexError> {
        self.pos += 2;
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(':') if self.peek_at(1) == Some(']') => {
                    self.pos += 2;
                    break;
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    self.bump();
                    name.push(c);
                }
                Some(_) | None => return Err(RegexError::UnclosedSet),
            }
        }
        posix_class(&name).ok_or(RegexError::UnknownClass(name))
    }

    /// One escape sequence, starting at the backslash.
    fn parse_escape(&mut self) -> Result<Escaped, RegexError> {
        self.bump();
        let c = self.bump().ok_or(RegexError::UnexpectedEnd)?;
        let escaped = match c {
            'd' => Escaped::Class(class_atom("digit", false)),
            'D' => Escaped::Class(class_atom("digit", true)),
            's' => Escaped::Class(class_atom("space", false)),
            'S' => Escaped::Class(class_atom("space", true)),
            'w' => Escaped::Class(class_atom("word", false)),
            'a' => Escaped::Class(class_atom("alpha", false)),
            'x' => Escaped::Class(class_atom("xdigit", false)),
            'b' => Escaped::Literal('\u{8}'),
            'f' => Escaped::Literal('\u{c}'),
            'n' => Escaped::Literal('\n'),
            'r' => Escaped::Literal('\r'),
            't' => Escaped::Literal('\t'),
            other => Escaped::Literal(other),
        };
        Ok(escaped)
    }
}

fn class_atom(name: &str, negated: bool) -> SetAtom {
    SetAtom {
        set: posix_class(name).expect("built-in class name"),
        negated,
    }
}

/// The ASCII definitions of the POSIX character classes.
fn posix_class(name: &str) -> Option<CharSet> {
    let set = match name {
        "alnum" => CharSet::from_ranges([('0', '9'), ('A', 'Z'), ('a', 'z')]),
        "word" => CharSet::from_ranges([('0', '9'), ('A', 'Z'), ('a', 'z'), ('_', '_')]),
        "alpha" => CharSet::from_ranges([('A', 'Z'), ('a', 'z')]),
        "blank" => CharSet::from_ranges([(' ', ' '), ('\t', '\t')]),
        "cntrl" => CharSet::from_ranges([('\u{0}', '\u{1f}'), ('\u{7f}', '\u{7f}')]),
        "digit" => CharSet::range('0', '9'),
        "graph" => CharSet::range('!', '~'),
        "lower" => CharSet::range('a', 'z'),
        "print" => CharSet::range(' ', '~'),
        "punct" => CharSet::from_ranges([('!', '/'), (':', '@'), ('[', '`'), ('{', '~')]),
        "space" => CharSet::from_ranges([('\t', '\r'), (' ', ' ')]),
        "upper" => CharSet::range('A', 'Z'),
        "xdigit" => CharSet::from_ranges([('0', '9'), ('A', 'F'), ('a', 'f')]),
        _ => return None,
    };
    Some(set)
}
