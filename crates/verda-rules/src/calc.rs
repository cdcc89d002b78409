// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safe arithmetic evaluation for the rule table.
//!
//! Handles `number op number` expressions with the usual precedence,
//! parentheses, and unary minus. Anything that does not parse cleanly --
//! including division by zero -- evaluates to `None`, so the query falls
//! through to the model tiers instead of producing a wrong answer.

/// Lead-in phrases stripped before parsing ("what is 2 + 2" -> "2 + 2").
const LEAD_PHRASES: &[&str] = &["what is", "what's", "whats", "calculate", "compute"];

/// Extract the arithmetic expression from a query, if it looks like one.
///
/// Returns `None` when the remainder contains characters outside the
/// arithmetic charset or no operator at all.
pub fn extract_expression(query: &str) -> Option<String> {
    let mut text = query.trim().to_lowercase();
    for phrase in LEAD_PHRASES {
        if let Some(rest) = text.strip_prefix(phrase) {
            text = rest.to_string();
            break;
        }
    }
    let text = text.replace(['=', '?'], " ");
    let text = text.trim();

    if text.is_empty() {
        return None;
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || "+-*/(). ".contains(c))
    {
        return None;
    }
    // A bare number is not an arithmetic request.
    if !text.contains(['+', '*', '/']) && !text[1..].contains('-') {
        return None;
    }
    Some(text.to_string())
}

/// Evaluate an arithmetic expression.
///
/// Returns `None` on malformed input, trailing garbage, or division by zero.
pub fn evaluate(expr: &str) -> Option<f64> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return None;
    }
    value.is_finite().then_some(value)
}

/// Format an evaluation result for the answer text.
///
/// Whole numbers render without a fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(literal.parse().ok()?));
            }
            _ => return None,
        }
    }

    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

/// Recursive-descent parser: expression -> term -> factor.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.advance();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.advance();
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.advance();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return None;
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn factor(&mut self) -> Option<f64> {
        match self.advance()? {
            Token::Number(n) => Some(n),
            Token::Minus => Some(-self.factor()?),
            Token::Open => {
                let value = self.expression()?;
                if self.advance()? != Token::Close {
                    return None;
                }
                Some(value)
            }
            _ => None,
        }
    }
}
