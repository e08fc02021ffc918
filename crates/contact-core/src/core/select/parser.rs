use phf::{Map, phf_map};
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextField {
    ResidueName,
    AtomName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericField {
    ResidueNumber,
    AtomNumber,
    /// One-based position of the atom in the structure.
    Index,
}

/// A name value, optionally ending in a `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Pattern {
    Exact(String),
    Prefix(String),
}

impl Pattern {
    fn parse(value: &str) -> Self {
        match value.strip_suffix('*') {
            Some(prefix) => Pattern::Prefix(prefix.to_string()),
            None => Pattern::Exact(value.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(expected) => value == expected,
            Pattern::Prefix(prefix) => value.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    All,
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Text {
        field: TextField,
        patterns: Vec<Pattern>,
    },
    Numeric {
        field: NumericField,
        ranges: Vec<RangeInclusive<i64>>,
    },
    Group(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reserved {
    And,
    Or,
    Not,
    To,
    All,
    Text(TextField),
    Numeric(NumericField),
}

static RESERVED_WORDS: Map<&'static str, Reserved> = phf_map! {
    "and" => Reserved::And,
    "or" => Reserved::Or,
    "not" => Reserved::Not,
    "to" => Reserved::To,
    "all" => Reserved::All,
    "resname" => Reserved::Text(TextField::ResidueName),
    "name" => Reserved::Text(TextField::AtomName),
    "resid" => Reserved::Numeric(NumericField::ResidueNumber),
    "resnum" => Reserved::Numeric(NumericField::ResidueNumber),
    "serial" => Reserved::Numeric(NumericField::AtomNumber),
    "index" => Reserved::Numeric(NumericField::Index),
};

fn reserved(word: &str) -> Option<Reserved> {
    RESERVED_WORDS.get(word.to_ascii_lowercase().as_str()).copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Word(String),
    Quoted(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '&' | '|' => {
                chars.next();
                if chars.next_if_eq(&c).is_none() {
                    return Err(format!("expected '{c}{c}'"));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            '"' | '\'' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some(q) if q == c => break,
                        Some(ch) => value.push(ch),
                        None => return Err(format!("unterminated quote {c}")),
                    }
                }
                tokens.push(Token::Quoted(value));
            }
            _ => {
                let mut word = String::new();
                while let Some(ch) =
                    chars.next_if(|ch| !ch.is_whitespace() && !matches!(*ch, '(' | ')' | '&' | '|'))
                {
                    word.push(ch);
                }
                tokens.push(Token::Word(word));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, op: Reserved) -> bool {
        let matched = match self.peek() {
            Some(Token::And) => op == Reserved::And,
            Some(Token::Or) => op == Reserved::Or,
            Some(Token::Not) => op == Reserved::Not,
            Some(Token::Word(word)) => reserved(word) == Some(op),
            _ => false,
        };
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_and()?;
        while self.eat(Reserved::Or) {
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_unary()?;
        while self.eat(Reserved::And) {
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        if self.eat(Reserved::Not) {
            return Ok(Expr::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.advance() {
            None => Err("unexpected end of expression".into()),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("missing closing parenthesis".into()),
                }
            }
            Some(Token::RParen) => Err("unexpected ')'".into()),
            Some(Token::And | Token::Or | Token::Not) => Err("unexpected operator".into()),
            Some(Token::Quoted(name)) => Ok(Expr::Group(name)),
            Some(Token::Word(word)) => match reserved(&word) {
                None => Ok(Expr::Group(word)),
                Some(Reserved::All) => Ok(Expr::All),
                Some(Reserved::Text(field)) => {
                    let patterns = self.text_values(&word)?;
                    Ok(Expr::Text { field, patterns })
                }
                Some(Reserved::Numeric(field)) => {
                    let ranges = self.numeric_values(&word)?;
                    Ok(Expr::Numeric { field, ranges })
                }
                Some(_) => Err(format!("unexpected '{word}'")),
            },
        }
    }

    /// Consumes the next token if it is a plain value rather than an operator or keyword.
    fn value(&mut self) -> Option<String> {
        let value = match self.peek() {
            Some(Token::Quoted(value)) => value.clone(),
            Some(Token::Word(word)) if reserved(word).is_none() => word.clone(),
            _ => return None,
        };
        self.pos += 1;
        Some(value)
    }

    fn text_values(&mut self, keyword: &str) -> Result<Vec<Pattern>, String> {
        let mut patterns = Vec::new();
        while let Some(value) = self.value() {
            patterns.push(Pattern::parse(&value));
        }
        if patterns.is_empty() {
            return Err(format!("expected a value after '{keyword}'"));
        }
        Ok(patterns)
    }

    fn numeric_values(&mut self, keyword: &str) -> Result<Vec<RangeInclusive<i64>>, String> {
        let mut ranges = Vec::new();
        while let Some(value) = self.value() {
            let range = if self.eat(Reserved::To) {
                let end = self
                    .value()
                    .ok_or_else(|| format!("expected a number after '{value} to'"))?;
                parse_number(&value)?..=parse_number(&end)?
            } else {
                parse_range(&value)?
            };
            if range.is_empty() {
                return Err(format!("empty range '{value}'"));
            }
            ranges.push(range);
        }
        if ranges.is_empty() {
            return Err(format!("expected a number after '{keyword}'"));
        }
        Ok(ranges)
    }
}

fn parse_number(value: &str) -> Result<i64, String> {
    value
        .parse()
        .map_err(|_| format!("invalid number '{value}'"))
}

/// Parses `N` or `N-M`. A leading minus sign belongs to the first number.
fn parse_range(value: &str) -> Result<RangeInclusive<i64>, String> {
    let separator = value
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(pos, _)| pos);
    match separator {
        Some(pos) => Ok(parse_number(&value[..pos])?..=parse_number(&value[pos + 1..])?),
        None => {
            let number = parse_number(value)?;
            Ok(number..=number)
        }
    }
}

/// Parses a selection expression into its syntax tree.
///
/// # Errors
///
/// Returns a message describing the first syntax error.
pub(crate) fn parse(expression: &str) -> Result<Expr, String> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err("empty expression".into());
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::Word(word) | Token::Quoted(word)) => Err(format!("unexpected '{word}'")),
        Some(Token::RParen) => Err("unexpected ')'".into()),
        Some(_) => Err("unexpected token".into()),
    }
}
