//! A small in-memory evaluation engine for compiled queries.
//!
//! Elements are serialized with `serde_json` and the predicate is parsed and
//! evaluated against the resulting values. The grammar covers what the
//! compiler emits: `AND`/`OR`, parentheses, the constant predicates, `ANY`,
//! `=`/`==`/`!=`/`<`/`>`, `IN`, `BETWEEN { a, b }`, `CONTAINS`, `BEGINSWITH`,
//! `ENDSWITH`, `[cdl]` option suffixes, key paths with `SELF`, `$variables`
//! and `@count`/`@avg`/`@sum`/`@max`/`@min`, and `SUBQUERY(...)`.
//!
//! Objects compare by their `id` key, mirroring entities bound by identity.

use safepred::{Argument, Query};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

type EngineResult<T> = Result<T, String>;

/// Return the elements of `items` satisfying `query`.
pub fn filter<'a, T: Serialize, Root>(items: &'a [T], query: &Query<Root>) -> Vec<&'a T> {
    let (format, arguments) = query.clone().into_parts();
    evaluate(items, &format, &arguments)
        .unwrap_or_else(|e| panic!("engine rejected `{}`: {}", format, e))
}

/// Evaluate a raw `(format, arguments)` pair over `items`.
pub fn evaluate<'a, T: Serialize>(
    items: &'a [T],
    format: &str,
    arguments: &[Argument],
) -> EngineResult<Vec<&'a T>> {
    let arguments = arguments
        .iter()
        .map(|a| serde_json::to_value(a).map_err(|e| e.to_string()))
        .collect::<EngineResult<Vec<_>>>()?;

    let tokens = tokenize(format)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        arguments: arguments.into_iter(),
    };
    let predicate = parser.expression()?;
    if parser.position != parser.tokens.len() {
        return Err(format!("trailing input at token {}", parser.position));
    }
    if parser.arguments.next().is_some() {
        return Err("more arguments than placeholders".into());
    }

    let mut matched = Vec::new();
    for item in items {
        let element = serde_json::to_value(item).map_err(|e| e.to_string())?;
        if predicate.holds(&element, &HashMap::new())? {
            matched.push(item);
        }
    }
    Ok(matched)
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Placeholder,
    Number(f64),
    Options(String),
    Operator(String),
    Word(String),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '@' | '.')
}

fn tokenize(input: &str) -> EngineResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '{' => {
                tokens.push(Token::LBrace);
                i += 1;
            }
            '}' => {
                tokens.push(Token::RBrace);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '?' => {
                tokens.push(Token::Placeholder);
                i += 1;
            }
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or("unterminated option list")?;
                tokens.push(Token::Options(chars[i + 1..i + end].iter().collect()));
                i += end + 1;
            }
            '=' | '!' | '<' | '>' => {
                let mut op = c.to_string();
                if chars.get(i + 1) == Some(&'=') {
                    op.push('=');
                    i += 1;
                }
                tokens.push(Token::Operator(op));
                i += 1;
            }
            c if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())) => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || matches!(chars[i], '.' | 'e' | 'E' | '-' | '+')) {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let number = text.parse().map_err(|_| format!("bad number `{}`", text))?;
                tokens.push(Token::Number(number));
            }
            c if is_word_char(c) => {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            }
            other => return Err(format!("unexpected character `{}`", other)),
        }
    }

    Ok(tokens)
}

// ============================================================================
// Syntax tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Equal,
    NotEqual,
    Less,
    Greater,
    In,
    Between,
    Contains,
    BeginsWith,
    EndsWith,
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    case: bool,
    diacritic: bool,
}

#[derive(Debug)]
enum Operand {
    Path(Vec<String>),
    Value(Value),
    List(Vec<Operand>),
    Subquery {
        collection: Vec<String>,
        variable: String,
        predicate: Box<Predicate>,
        // Applied to the filtered collection, e.g. `@count`.
        suffix: Vec<String>,
    },
}

#[derive(Debug)]
enum Predicate {
    Constant(bool),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Compare {
        any: bool,
        lhs: Operand,
        op: Op,
        flags: Flags,
        rhs: Operand,
    },
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    arguments: std::vec::IntoIter<Value>,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> EngineResult<Token> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or("unexpected end of input")?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> EngineResult<()> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(format!("expected {:?}, found {:?}", expected, token))
        }
    }

    fn peek_word(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w == word)
    }

    fn expression(&mut self) -> EngineResult<Predicate> {
        let mut lhs = self.conjunction()?;
        while self.peek_word("OR") {
            self.position += 1;
            let rhs = self.conjunction()?;
            lhs = Predicate::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn conjunction(&mut self) -> EngineResult<Predicate> {
        let mut lhs = self.primary()?;
        while self.peek_word("AND") {
            self.position += 1;
            let rhs = self.primary()?;
            lhs = Predicate::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> EngineResult<Predicate> {
        match self.peek() {
            Some(Token::LParen) => {
                self.position += 1;
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Word(w)) if w == "TRUEPREDICATE" => {
                self.position += 1;
                Ok(Predicate::Constant(true))
            }
            Some(Token::Word(w)) if w == "FALSEPREDICATE" => {
                self.position += 1;
                Ok(Predicate::Constant(false))
            }
            _ => self.comparison(),
        }
    }

    fn comparison(&mut self) -> EngineResult<Predicate> {
        let any = self.peek_word("ANY");
        if any {
            self.position += 1;
        }
        let lhs = self.operand()?;
        let op = match self.next()? {
            Token::Operator(op) => match op.as_str() {
                "=" | "==" => Op::Equal,
                "!=" => Op::NotEqual,
                "<" => Op::Less,
                ">" => Op::Greater,
                other => return Err(format!("unsupported operator `{}`", other)),
            },
            Token::Word(w) => match w.as_str() {
                "IN" => Op::In,
                "BETWEEN" => Op::Between,
                "CONTAINS" => Op::Contains,
                "BEGINSWITH" => Op::BeginsWith,
                "ENDSWITH" => Op::EndsWith,
                other => return Err(format!("unsupported keyword `{}`", other)),
            },
            other => return Err(format!("expected operator, found {:?}", other)),
        };

        let mut flags = Flags::default();
        if let Some(Token::Options(codes)) = self.peek().cloned() {
            self.position += 1;
            for code in codes.chars() {
                match code {
                    'c' => flags.case = true,
                    'd' => flags.diacritic = true,
                    'l' => {}
                    other => return Err(format!("unknown option `{}`", other)),
                }
            }
        }

        let rhs = self.operand()?;
        Ok(Predicate::Compare {
            any,
            lhs,
            op,
            flags,
            rhs,
        })
    }

    fn operand(&mut self) -> EngineResult<Operand> {
        match self.next()? {
            Token::Placeholder => self
                .arguments
                .next()
                .map(Operand::Value)
                .ok_or_else(|| "more placeholders than arguments".into()),
            Token::Number(n) => Ok(Operand::Value(Value::from(n))),
            Token::LBrace => {
                let mut items = vec![self.operand()?];
                while self.peek() == Some(&Token::Comma) {
                    self.position += 1;
                    items.push(self.operand()?);
                }
                self.expect(Token::RBrace)?;
                Ok(Operand::List(items))
            }
            Token::Word(w) if w == "SUBQUERY" => {
                self.expect(Token::LParen)?;
                let collection = match self.next()? {
                    Token::Word(path) => split_path(&path),
                    other => return Err(format!("expected collection, found {:?}", other)),
                };
                self.expect(Token::Comma)?;
                let variable = match self.next()? {
                    Token::Word(v) if v.starts_with('$') => v,
                    other => return Err(format!("expected variable, found {:?}", other)),
                };
                self.expect(Token::Comma)?;
                let predicate = self.expression()?;
                self.expect(Token::RParen)?;
                let suffix = match self.peek() {
                    Some(Token::Word(w)) if w.starts_with('.') => {
                        let suffix = split_path(&w[1..]);
                        self.position += 1;
                        suffix
                    }
                    _ => Vec::new(),
                };
                Ok(Operand::Subquery {
                    collection,
                    variable,
                    predicate: Box::new(predicate),
                    suffix,
                })
            }
            Token::Word(path) => Ok(Operand::Path(split_path(&path))),
            other => Err(format!("expected operand, found {:?}", other)),
        }
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_owned).collect()
}

// ============================================================================
// Evaluation
// ============================================================================

type Scope = HashMap<String, Value>;

impl Predicate {
    fn holds(&self, element: &Value, scope: &Scope) -> EngineResult<bool> {
        match self {
            Self::Constant(b) => Ok(*b),
            Self::And(l, r) => Ok(l.holds(element, scope)? && r.holds(element, scope)?),
            Self::Or(l, r) => Ok(l.holds(element, scope)? || r.holds(element, scope)?),
            Self::Compare {
                any,
                lhs,
                op,
                flags,
                rhs,
            } => {
                let lhs = lhs.value(element, scope)?;
                let rhs = rhs.value(element, scope)?;
                if *any {
                    let items = lhs.as_array().cloned().unwrap_or_default();
                    Ok(items.iter().any(|l| compare(l, *op, *flags, &rhs)))
                } else {
                    Ok(compare(&lhs, *op, *flags, &rhs))
                }
            }
        }
    }
}

impl Operand {
    fn value(&self, element: &Value, scope: &Scope) -> EngineResult<Value> {
        match self {
            Self::Value(v) => Ok(v.clone()),
            Self::List(items) => Ok(Value::Array(
                items
                    .iter()
                    .map(|o| o.value(element, scope))
                    .collect::<EngineResult<_>>()?,
            )),
            Self::Path(path) => resolve(path, element, scope),
            Self::Subquery {
                collection,
                variable,
                predicate,
                suffix,
            } => {
                let items = match resolve(collection, element, scope)? {
                    Value::Array(items) => items,
                    Value::Null => Vec::new(),
                    other => return Err(format!("SUBQUERY over non-collection {}", other)),
                };
                let mut kept = Vec::new();
                for item in items {
                    let mut inner = scope.clone();
                    inner.insert(variable.clone(), item.clone());
                    if predicate.holds(element, &inner)? {
                        kept.push(item);
                    }
                }
                walk(Value::Array(kept), suffix)
            }
        }
    }
}

fn resolve(path: &[String], element: &Value, scope: &Scope) -> EngineResult<Value> {
    let (head, rest) = path.split_first().ok_or("empty key path")?;
    let start = if head == "SELF" {
        element.clone()
    } else if head.starts_with('$') {
        scope
            .get(head)
            .cloned()
            .ok_or_else(|| format!("unbound variable {}", head))?
    } else if head.starts_with('@') {
        return walk(element.clone(), path);
    } else {
        element.get(head).cloned().unwrap_or(Value::Null)
    };
    walk(start, rest)
}

fn walk(value: Value, path: &[String]) -> EngineResult<Value> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(value);
    };

    if let Some(function) = head.strip_prefix('@') {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => return Err(format!("@{} over non-collection {}", function, other)),
        };
        if function == "count" {
            return Ok(Value::from(items.len()));
        }
        let numbers = items
            .into_iter()
            .map(|item| walk(item, rest))
            .collect::<EngineResult<Vec<_>>>()?
            .iter()
            .filter_map(Value::as_f64)
            .collect::<Vec<_>>();
        return Ok(match function {
            "sum" => Value::from(numbers.iter().sum::<f64>()),
            "avg" if numbers.is_empty() => Value::Null,
            "avg" => Value::from(numbers.iter().sum::<f64>() / numbers.len() as f64),
            "max" => numbers.iter().copied().reduce(f64::max).map_or(Value::Null, Value::from),
            "min" => numbers.iter().copied().reduce(f64::min).map_or(Value::Null, Value::from),
            other => return Err(format!("unknown aggregate @{}", other)),
        });
    }

    match value {
        Value::Array(items) => Ok(Value::Array(
            items
                .into_iter()
                .map(|item| walk(item, path))
                .collect::<EngineResult<_>>()?,
        )),
        Value::Object(mut map) => walk(map.remove(head).unwrap_or(Value::Null), rest),
        _ => Ok(Value::Null),
    }
}

fn compare(lhs: &Value, op: Op, flags: Flags, rhs: &Value) -> bool {
    match op {
        Op::Equal => equal(lhs, rhs, flags),
        Op::NotEqual => !equal(lhs, rhs, flags),
        Op::Less => order(lhs, rhs) == Some(Ordering::Less),
        Op::Greater => order(lhs, rhs) == Some(Ordering::Greater),
        Op::In => rhs
            .as_array()
            .is_some_and(|items| items.iter().any(|r| equal(lhs, r, flags))),
        Op::Between => match rhs.as_array().map(Vec::as_slice) {
            Some([lo, hi]) => {
                matches!(order(lhs, lo), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(order(lhs, hi), Some(Ordering::Less | Ordering::Equal))
            }
            _ => false,
        },
        Op::Contains => match (lhs, rhs) {
            (Value::String(l), Value::String(r)) => fold(l, flags).contains(&fold(r, flags)),
            (Value::Array(items), r) => items.iter().any(|l| equal(l, r, flags)),
            _ => false,
        },
        Op::BeginsWith => match (lhs, rhs) {
            (Value::String(l), Value::String(r)) => fold(l, flags).starts_with(&fold(r, flags)),
            _ => false,
        },
        Op::EndsWith => match (lhs, rhs) {
            (Value::String(l), Value::String(r)) => fold(l, flags).ends_with(&fold(r, flags)),
            _ => false,
        },
    }
}

fn identity(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get("id").unwrap_or(value),
        other => other,
    }
}

fn equal(lhs: &Value, rhs: &Value, flags: Flags) -> bool {
    match (identity(lhs), identity(rhs)) {
        (Value::Number(l), Value::Number(r)) => l.as_f64() == r.as_f64(),
        (Value::String(l), Value::String(r)) => fold(l, flags) == fold(r, flags),
        (l, r) => l == r,
    }
}

fn order(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

fn fold(text: &str, flags: Flags) -> String {
    let text = if flags.diacritic {
        text.chars().map(strip_diacritic).collect()
    } else {
        text.to_owned()
    };
    if flags.case { text.to_lowercase() } else { text }
}

fn strip_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}
