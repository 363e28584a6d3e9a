//! Address Expression Evaluation.
//!
//! Addresses, ranges, widths and presence conditions arrive as symbolic
//! strings. The analysis consumes them through [`ExpressionEvaluator`], a
//! pure function from expression to integer. [`ParameterEvaluator`] is the
//! evaluator used by the command-line tool: integer literals, named
//! parameters and integer arithmetic.

use super::error::EvaluationFailure;
use std::collections::HashMap;

/// Integer produced by an evaluator.
///
/// Wide enough to hold any `u64` address as well as negative intermediate
/// values, which callers reject where they are not meaningful.
pub type Value = i128;

/// Nested parameter references deeper than this are treated as recursive.
const MAX_PARAMETER_DEPTH: usize = 32;

/// Reduces a symbolic expression to an integer.
///
/// Implementations must be deterministic and free of side effects for a
/// given design snapshot.
pub trait ExpressionEvaluator {
    /// Evaluates `expression`.
    fn evaluate(&self, expression: &str) -> Result<Value, EvaluationFailure>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&str) -> Result<Value, EvaluationFailure>,
{
    fn evaluate(&self, expression: &str) -> Result<Value, EvaluationFailure> {
        self(expression)
    }
}

/// Evaluator over integer literals and a flat table of named parameters.
///
/// Supported syntax:
///
/// * decimal literals, `0x`/`0b` prefixed literals, and SystemVerilog based
///   literals with an optional size (`'h1F`, `16'd42`, `'b1010`, `'o17`);
///   `_` may separate digits,
/// * `true` and `false` as 1 and 0,
/// * parameter names, resolved recursively,
/// * unary `-` and `+`, binary `* / %`, `+ -`, `<< >>` with the usual
///   precedence, and parentheses.
#[derive(Debug, Clone, Default)]
pub struct ParameterEvaluator {
    parameters: HashMap<String, String>,
}

impl ParameterEvaluator {
    /// Creates an evaluator with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an evaluator from `(name, expression)` pairs.
    pub fn with_parameters<I, K, V>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Defines or replaces a parameter.
    pub fn set(&mut self, name: impl Into<String>, expression: impl Into<String>) {
        self.parameters.insert(name.into(), expression.into());
    }

    fn evaluate_at_depth(&self, expression: &str, depth: usize) -> Result<Value, EvaluationFailure> {
        if expression.trim().is_empty() {
            return Err(EvaluationFailure::Empty);
        }

        let mut parser = Parser {
            source: expression,
            chars: expression.char_indices().collect(),
            pos: 0,
            evaluator: self,
            depth,
        };

        let value = parser.shift()?;
        parser.skip_whitespace();
        match parser.peek() {
            None => Ok(value),
            Some((offset, found)) => Err(EvaluationFailure::UnexpectedChar {
                expression: expression.to_string(),
                found,
                offset,
            }),
        }
    }

    fn parameter(&self, name: &str, depth: usize) -> Result<Value, EvaluationFailure> {
        let expression = self
            .parameters
            .get(name)
            .ok_or_else(|| EvaluationFailure::UnknownParameter(name.to_string()))?;

        if depth >= MAX_PARAMETER_DEPTH {
            return Err(EvaluationFailure::RecursiveParameter(name.to_string()));
        }

        self.evaluate_at_depth(expression, depth + 1)
    }
}

impl ExpressionEvaluator for ParameterEvaluator {
    fn evaluate(&self, expression: &str) -> Result<Value, EvaluationFailure> {
        self.evaluate_at_depth(expression, 0)
    }
}

/// Recursive-descent parser evaluating as it goes.
struct Parser<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    evaluator: &'a ParameterEvaluator,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn overflow(&self) -> EvaluationFailure {
        EvaluationFailure::Overflow(self.source.to_string())
    }

    fn unexpected(&self) -> EvaluationFailure {
        match self.peek() {
            Some((offset, found)) => EvaluationFailure::UnexpectedChar {
                expression: self.source.to_string(),
                found,
                offset,
            },
            None => EvaluationFailure::UnexpectedEnd(self.source.to_string()),
        }
    }

    /// Consumes a two-character operator such as `<<`.
    fn eat_pair(&mut self, first: char, second: char) -> bool {
        let matches = matches!(self.chars.get(self.pos), Some((_, c)) if *c == first)
            && matches!(self.chars.get(self.pos + 1), Some((_, c)) if *c == second);
        if matches {
            self.pos += 2;
        }
        matches
    }

    fn shift(&mut self) -> Result<Value, EvaluationFailure> {
        let mut value = self.additive()?;
        loop {
            self.skip_whitespace();
            if self.eat_pair('<', '<') {
                let amount = self.additive()?;
                let amount = u32::try_from(amount).map_err(|_| self.overflow())?;
                value = value.checked_shl(amount).ok_or_else(|| self.overflow())?;
            } else if self.eat_pair('>', '>') {
                let amount = self.additive()?;
                let amount = u32::try_from(amount).map_err(|_| self.overflow())?;
                value = value.checked_shr(amount).ok_or_else(|| self.overflow())?;
            } else {
                return Ok(value);
            }
        }
    }

    fn additive(&mut self) -> Result<Value, EvaluationFailure> {
        let mut value = self.multiplicative()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some((_, '+')) => {
                    self.pos += 1;
                    let rhs = self.multiplicative()?;
                    value = value.checked_add(rhs).ok_or_else(|| self.overflow())?;
                }
                Some((_, '-')) => {
                    self.pos += 1;
                    let rhs = self.multiplicative()?;
                    value = value.checked_sub(rhs).ok_or_else(|| self.overflow())?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn multiplicative(&mut self) -> Result<Value, EvaluationFailure> {
        let mut value = self.unary()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some((_, c @ ('*' | '/' | '%'))) => c,
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value.checked_mul(rhs).ok_or_else(|| self.overflow())?,
                _ if rhs == 0 => {
                    return Err(EvaluationFailure::DivisionByZero(self.source.to_string()))
                }
                '/' => value.checked_div(rhs).ok_or_else(|| self.overflow())?,
                _ => value.checked_rem(rhs).ok_or_else(|| self.overflow())?,
            };
        }
    }

    fn unary(&mut self) -> Result<Value, EvaluationFailure> {
        self.skip_whitespace();
        match self.peek() {
            Some((_, '-')) => {
                self.pos += 1;
                let value = self.unary()?;
                value.checked_neg().ok_or_else(|| self.overflow())
            }
            Some((_, '+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Value, EvaluationFailure> {
        self.skip_whitespace();
        match self.peek() {
            Some((_, '(')) => {
                self.pos += 1;
                let value = self.shift()?;
                self.skip_whitespace();
                match self.peek() {
                    Some((_, ')')) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    _ => Err(self.unexpected()),
                }
            }
            Some((_, c)) if c.is_ascii_digit() || c == '\'' => self.literal(),
            Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {
                let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                match name.as_str() {
                    "true" => Ok(1),
                    "false" => Ok(0),
                    _ => self.evaluator.parameter(&name, self.depth),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some((_, c)) = self.peek() {
            if !pred(c) {
                break;
            }
            taken.push(c);
            self.pos += 1;
        }
        taken
    }

    fn literal(&mut self) -> Result<Value, EvaluationFailure> {
        let size = self.take_while(|c| c.is_ascii_digit() || c == '_');

        if let Some((_, '\'')) = self.peek() {
            self.pos += 1;
            let radix = match self.peek() {
                Some((_, 'h' | 'H')) => 16,
                Some((_, 'd' | 'D')) => 10,
                Some((_, 'o' | 'O')) => 8,
                Some((_, 'b' | 'B')) => 2,
                _ => return Err(self.unexpected()),
            };
            self.pos += 1;
            let digits = self.take_while(|c| c.is_ascii_hexdigit() || c == '_');
            return parse_digits(&digits, radix);
        }

        let prefix = self.peek().map(|(_, c)| c);
        if size == "0" && matches!(prefix, Some('x' | 'X' | 'b' | 'B')) {
            self.pos += 1;
            let radix = if matches!(prefix, Some('x' | 'X')) { 16 } else { 2 };
            let digits = self.take_while(|c| c.is_ascii_hexdigit() || c == '_');
            return parse_digits(&digits, radix);
        }

        parse_digits(&size, 10)
    }
}

fn parse_digits(digits: &str, radix: u32) -> Result<Value, EvaluationFailure> {
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(EvaluationFailure::InvalidLiteral(digits.to_string()));
    }
    Value::from_str_radix(&cleaned, radix)
        .map_err(|_| EvaluationFailure::InvalidLiteral(digits.to_string()))
}
