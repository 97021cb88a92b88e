//! Build constraint parsing: `//go:build` expressions and legacy `// +build` lines.

use crate::context::BuildContext;

/// A boolean expression over build tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Tag(String),
    Not(Box<Constraint>),
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
}

impl Constraint {
    /// Evaluate against a build context
    pub fn eval(&self, ctx: &BuildContext) -> bool {
        match self {
            Constraint::Tag(tag) => ctx.matches_tag(tag),
            Constraint::Not(inner) => !inner.eval(ctx),
            Constraint::And(lhs, rhs) => lhs.eval(ctx) && rhs.eval(ctx),
            Constraint::Or(lhs, rhs) => lhs.eval(ctx) || rhs.eval(ctx),
        }
    }

    /// Parse the expression of a `//go:build` line
    pub fn parse_expr(expr: &str) -> Result<Self, String> {
        let tokens = tokenize(expr)?;
        if tokens.is_empty() {
            return Err("empty //go:build expression".to_string());
        }
        let mut parser = ExprParser { tokens, pos: 0 };
        let constraint = parser.or()?;
        if parser.pos != parser.tokens.len() {
            return Err(format!("unexpected token in {expr:?}"));
        }
        Ok(constraint)
    }

    /// Parse the body of a `// +build` line.
    ///
    /// Space separated options are OR-ed, comma separated terms AND-ed.
    pub fn parse_plus_build(line: &str) -> Result<Self, String> {
        let mut options = Vec::new();
        for field in line.split_whitespace() {
            let mut terms = Vec::new();
            for term in field.split(',') {
                let (negated, tag) = match term.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, term),
                };
                if !is_valid_tag(tag) {
                    return Err(format!("invalid +build term {term:?}"));
                }
                let atom = Constraint::Tag(tag.to_string());
                terms.push(if negated {
                    Constraint::Not(Box::new(atom))
                } else {
                    atom
                });
            }
            options.extend(fold(terms, Constraint::And));
        }
        fold(options, Constraint::Or).ok_or_else(|| "empty +build line".to_string())
    }
}

/// Extract the effective constraint from a file's leading comment block.
///
/// `//go:build` wins over `// +build`. A `// +build` group only counts
/// when a blank line separates it from what follows.
pub fn file_constraint(source: &str) -> Result<Option<Constraint>, String> {
    let mut go_build: Option<Constraint> = None;
    let mut plus_build: Vec<Constraint> = Vec::new();
    let mut pending: Vec<Constraint> = Vec::new();
    let mut in_block = false;

    for raw in source.lines() {
        let line = raw.trim();
        if in_block {
            if line.contains("*/") {
                in_block = false;
            }
            continue;
        }
        if line.is_empty() {
            plus_build.append(&mut pending);
            continue;
        }
        if let Some(comment) = line.strip_prefix("//") {
            if let Some(expr) = comment.strip_prefix("go:build") {
                if expr.is_empty() || expr.starts_with([' ', '\t']) {
                    if go_build.is_some() {
                        return Err("multiple //go:build comments".to_string());
                    }
                    go_build = Some(Constraint::parse_expr(expr)?);
                }
                continue;
            }
            if let Some(body) = comment.trim_start().strip_prefix("+build") {
                if body.is_empty() || body.starts_with([' ', '\t']) {
                    pending.push(Constraint::parse_plus_build(body)?);
                }
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("/*") {
            in_block = !rest.contains("*/");
            continue;
        }
        break;
    }

    if go_build.is_some() {
        return Ok(go_build);
    }
    Ok(fold(plus_build, Constraint::And))
}

fn fold(items: Vec<Constraint>, join: fn(Box<Constraint>, Box<Constraint>) -> Constraint) -> Option<Constraint> {
    items
        .into_iter()
        .reduce(|acc, next| join(Box::new(acc), Box::new(next)))
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Not,
    And,
    Or,
    Tag(String),
}

fn tokenize(expr: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        match c {
            ' ' | '\t' => {}
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '!' => tokens.push(Token::Not),
            '&' | '|' => {
                if chars.next_if(|&(_, next)| next == c).is_none() {
                    return Err(format!("invalid operator at offset {idx} in {expr:?}"));
                }
                tokens.push(if c == '&' { Token::And } else { Token::Or });
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut end = idx + c.len_utf8();
                while let Some((next_idx, next)) =
                    chars.next_if(|&(_, n)| n.is_alphanumeric() || n == '_' || n == '.')
                {
                    end = next_idx + next.len_utf8();
                }
                tokens.push(Token::Tag(expr[idx..end].to_string()));
            }
            other => return Err(format!("unexpected character {other:?} in {expr:?}")),
        }
    }
    Ok(tokens)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn eat(&mut self, token: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Constraint, String> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            lhs = Constraint::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Constraint, String> {
        let mut lhs = self.not()?;
        while self.eat(&Token::And) {
            let rhs = self.not()?;
            lhs = Constraint::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<Constraint, String> {
        if self.eat(&Token::Not) {
            return Ok(Constraint::Not(Box::new(self.not()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Constraint, String> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        match token {
            Some(Token::LParen) => {
                let inner = self.or()?;
                if !self.eat(&Token::RParen) {
                    return Err("missing closing parenthesis".to_string());
                }
                Ok(inner)
            }
            Some(Token::Tag(tag)) => Ok(Constraint::Tag(tag)),
            Some(other) => Err(format!("unexpected {other:?}")),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}
