// LogViewer - core/expr.rs
//
// Lexer and recursive-descent parser for filter expressions.
//
// The language is deliberately small: field references, string/integer/bool
// literals, comparisons, and boolean combinators. Nothing here can call a
// function or reach anything outside the record being tested. Type checking
// and field resolution happen in `core::filter`.
//
// Precedence, lowest first: or, and, not, comparison.
//
// Recursion only happens on `not` and parentheses, and that nesting is capped
// at MAX_FILTER_NESTING_DEPTH, so no expression can exhaust the stack.

use crate::util::constants::MAX_FILTER_NESTING_DEPTH;
use crate::util::error::FilterError;

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    /// Integer literal, kept as written; range-checked by the parser.
    Int(String),
    LParen,
    RParen,
    Dot,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => s.clone(),
            TokenKind::Str(s) => format!("'{s}'"),
            TokenKind::Int(s) => s.clone(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Dot => ".".to_string(),
            TokenKind::Eq => "==".to_string(),
            TokenKind::Ne => "!=".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Le => "<=".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::Ge => ">=".to_string(),
            TokenKind::AndAnd => "&&".to_string(),
            TokenKind::OrOr => "||".to_string(),
            TokenKind::Bang => "!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset of the token's first character.
    pub position: usize,
}

/// Split an expression into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let two = chars.get(i + 1).copied();
        let kind = match (c, two) {
            ('=', Some('=')) => {
                i += 2;
                TokenKind::Eq
            }
            ('!', Some('=')) => {
                i += 2;
                TokenKind::Ne
            }
            ('<', Some('=')) => {
                i += 2;
                TokenKind::Le
            }
            ('>', Some('=')) => {
                i += 2;
                TokenKind::Ge
            }
            ('&', Some('&')) => {
                i += 2;
                TokenKind::AndAnd
            }
            ('|', Some('|')) => {
                i += 2;
                TokenKind::OrOr
            }
            ('<', _) => {
                i += 1;
                TokenKind::Lt
            }
            ('>', _) => {
                i += 1;
                TokenKind::Gt
            }
            ('!', _) => {
                i += 1;
                TokenKind::Bang
            }
            ('(', _) => {
                i += 1;
                TokenKind::LParen
            }
            (')', _) => {
                i += 1;
                TokenKind::RParen
            }
            ('.', _) => {
                i += 1;
                TokenKind::Dot
            }
            ('\'' | '"', _) => {
                let (value, next) = lex_string(&chars, i)?;
                i = next;
                TokenKind::Str(value)
            }
            (d, _) if d.is_ascii_digit() => {
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                TokenKind::Int(chars[start..i].iter().collect())
            }
            (a, _) if a.is_alphabetic() || a == '_' => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                TokenKind::Ident(chars[start..i].iter().collect())
            }
            (other, _) => {
                return Err(FilterError::UnexpectedChar {
                    position: start,
                    found: other,
                })
            }
        };

        tokens.push(Token {
            kind,
            position: start,
        });
    }

    Ok(tokens)
}

/// Lex a quoted string starting at `start` (the opening quote).
/// Returns the unescaped value and the index just past the closing quote.
fn lex_string(chars: &[char], start: usize) -> Result<(String, usize), FilterError> {
    let quote = chars[start];
    let mut value = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        match chars[i] {
            c if c == quote => return Ok((value, i + 1)),
            '\\' => {
                let Some(&escaped) = chars.get(i + 1) else {
                    break;
                };
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
                i += 2;
            }
            c => {
                value.push(c);
                i += 1;
            }
        }
    }

    Err(FilterError::UnterminatedString { position: start })
}

// =============================================================================
// Syntax tree
// =============================================================================

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `a contains b`: b is a substring of a.
    Contains,
    /// `a in b`: a is a substring of b.
    In,
    /// `a not in b`.
    NotIn,
    /// `field matches 'regex'`.
    Matches,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Contains => "contains",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
            CmpOp::Matches => "matches",
        }
    }
}

/// A leaf value in the syntax tree, before type resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Field reference; `name` is as written (without any `item.` prefix).
    Field { name: String, position: usize },
    Str { value: String, position: usize },
    Int { value: i64, position: usize },
    Bool { value: bool, position: usize },
}

impl Operand {
    pub fn position(&self) -> usize {
        match self {
            Operand::Field { position, .. }
            | Operand::Str { position, .. }
            | Operand::Int { position, .. }
            | Operand::Bool { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Two or more alternatives; a chain of `or` is kept flat.
    Or(Vec<Expr>),
    /// Two or more conjuncts; a chain of `and` is kept flat.
    And(Vec<Expr>),
    Not(Box<Expr>),
    Compare {
        lhs: Operand,
        op: CmpOp,
        rhs: Operand,
        /// Position of the operator token.
        position: usize,
    },
    /// A lone operand, tested for truthiness.
    Truthy(Operand),
}

// =============================================================================
// Parser
// =============================================================================

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "in", "contains", "matches", "true", "false",
];

/// Parse a complete expression. The input must not be blank.
pub fn parse(input: &str) -> Result<Expr, FilterError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        return Err(FilterError::UnexpectedToken {
            position: token.position,
            found: token.kind.describe(),
            expected: "'and', 'or' or end of expression",
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Current `not`/parenthesis nesting.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn peek_ident(&self, offset: usize) -> Option<&str> {
        match self.tokens.get(self.pos + offset).map(|t| &t.kind) {
            Some(TokenKind::Ident(s)) => Some(s),
            _ => None,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<Token, FilterError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FilterError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn parse_or(&mut self) -> Result<Expr, FilterError> {
        let mut terms = vec![self.parse_and()?];
        while matches!(self.peek_kind(), Some(TokenKind::OrOr)) || self.peek_ident(0) == Some("or")
        {
            self.pos += 1;
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::Or(terms)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, FilterError> {
        let mut terms = vec![self.parse_unary()?];
        while matches!(self.peek_kind(), Some(TokenKind::AndAnd))
            || self.peek_ident(0) == Some("and")
        {
            self.pos += 1;
            terms.push(self.parse_unary()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Expr::And(terms)
        })
    }

    /// Enter one level of `not` or parentheses at `position`.
    fn descend(&mut self, position: usize) -> Result<(), FilterError> {
        if self.depth >= MAX_FILTER_NESTING_DEPTH {
            return Err(FilterError::TooDeep {
                position,
                max: MAX_FILTER_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expr, FilterError> {
        let position = self.peek().map_or(0, |t| t.position);

        if matches!(self.peek_kind(), Some(TokenKind::Bang)) || self.peek_ident(0) == Some("not")
        {
            self.descend(position)?;
            self.pos += 1;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }

        if matches!(self.peek_kind(), Some(TokenKind::LParen)) {
            self.descend(position)?;
            self.pos += 1;
            let inner = self.parse_or()?;
            let close = self.next("')'")?;
            if close.kind != TokenKind::RParen {
                return Err(FilterError::UnexpectedToken {
                    position: close.position,
                    found: close.kind.describe(),
                    expected: "')'",
                });
            }
            self.depth -= 1;
            return Ok(inner);
        }

        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, FilterError> {
        let lhs = self.parse_operand()?;

        let Some(token) = self.peek().cloned() else {
            return Ok(Expr::Truthy(lhs));
        };

        let op = match &token.kind {
            TokenKind::Eq => Some(CmpOp::Eq),
            TokenKind::Ne => Some(CmpOp::Ne),
            TokenKind::Lt => Some(CmpOp::Lt),
            TokenKind::Le => Some(CmpOp::Le),
            TokenKind::Gt => Some(CmpOp::Gt),
            TokenKind::Ge => Some(CmpOp::Ge),
            TokenKind::Ident(word) => match word.as_str() {
                "contains" => Some(CmpOp::Contains),
                "in" => Some(CmpOp::In),
                "matches" => Some(CmpOp::Matches),
                "not" if self.peek_ident(1) == Some("in") => {
                    // Consume `not`; `in` is consumed below.
                    self.pos += 1;
                    Some(CmpOp::NotIn)
                }
                _ => None,
            },
            _ => None,
        };

        let Some(op) = op else {
            return Ok(Expr::Truthy(lhs));
        };
        self.pos += 1;

        let rhs = self.parse_operand()?;
        Ok(Expr::Compare {
            lhs,
            op,
            rhs,
            position: token.position,
        })
    }

    fn parse_operand(&mut self) -> Result<Operand, FilterError> {
        let token = self.next("a field or literal")?;
        let position = token.position;

        match token.kind {
            TokenKind::Str(value) => Ok(Operand::Str { value, position }),
            TokenKind::Int(raw) => {
                let value = raw
                    .parse::<i64>()
                    .map_err(|_| FilterError::InvalidInteger {
                        position,
                        literal: raw.clone(),
                    })?;
                Ok(Operand::Int { value, position })
            }
            TokenKind::Ident(word) if word == "true" || word == "false" => Ok(Operand::Bool {
                value: word == "true",
                position,
            }),
            TokenKind::Ident(word) if word == "item" => {
                let dot = self.next("'.' after 'item'")?;
                if dot.kind != TokenKind::Dot {
                    return Err(FilterError::UnexpectedToken {
                        position: dot.position,
                        found: dot.kind.describe(),
                        expected: "'.' after 'item'",
                    });
                }
                let field = self.next("a field name")?;
                match field.kind {
                    TokenKind::Ident(name) => Ok(Operand::Field {
                        name,
                        position: field.position,
                    }),
                    other => Err(FilterError::UnexpectedToken {
                        position: field.position,
                        found: other.describe(),
                        expected: "a field name",
                    }),
                }
            }
            TokenKind::Ident(word) if !KEYWORDS.contains(&word.as_str()) => {
                Ok(Operand::Field {
                    name: word,
                    position,
                })
            }
            other => Err(FilterError::UnexpectedToken {
                position,
                found: other.describe(),
                expected: "a field or literal",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, position: usize) -> Operand {
        Operand::Field {
            name: name.to_string(),
            position,
        }
    }

    #[test]
    fn test_tokenize_operators_and_literals() {
        let tokens = tokenize("item.lineno >= 42 && text != \"a\\\"b\"").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("item".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("lineno".to_string()),
                TokenKind::Ge,
                TokenKind::Int("42".to_string()),
                TokenKind::AndAnd,
                TokenKind::Ident("text".to_string()),
                TokenKind::Ne,
                TokenKind::Str("a\"b".to_string()),
            ]
        );
        assert_eq!(tokens[3].position, 12);
    }

    #[test]
    fn test_tokenize_rejects_stray_characters() {
        let err = tokenize("level = 'E'").unwrap_err();
        assert!(matches!(
            err,
            FilterError::UnexpectedChar {
                position: 6,
                found: '='
            }
        ));
    }

    #[test]
    fn test_unterminated_string_reports_opening_quote() {
        let err = tokenize("text contains 'abc").unwrap_err();
        assert!(matches!(err, FilterError::UnterminatedString { position: 14 }));
    }

    #[test]
    fn test_item_prefix_is_optional() {
        assert_eq!(
            parse("item.level").unwrap(),
            Expr::Truthy(field("level", 5))
        );
        assert_eq!(parse("level").unwrap(), Expr::Truthy(field("level", 0)));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse("a or b and c").unwrap();
        let Expr::Or(terms) = expr else {
            panic!("expected or at the root");
        };
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0], Expr::Truthy(field("a", 0)));
        assert!(matches!(&terms[1], Expr::And(inner) if inner.len() == 2));
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = parse("(a or b) and not c").unwrap();
        let Expr::And(terms) = expr else {
            panic!("expected and at the root");
        };
        assert!(matches!(terms[0], Expr::Or(_)));
        assert!(matches!(terms[1], Expr::Not(_)));
    }

    #[test]
    fn test_not_in_is_one_operator() {
        let expr = parse("'x' not in item.text").unwrap();
        let Expr::Compare { op, lhs, rhs, .. } = expr else {
            panic!("expected comparison");
        };
        assert_eq!(op, CmpOp::NotIn);
        assert!(matches!(lhs, Operand::Str { ref value, .. } if value == "x"));
        assert_eq!(rhs, field("text", 16));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse("level == 'E' 'W'").unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedToken { position: 13, .. }));
    }

    #[test]
    fn test_missing_operand_reports_end() {
        let err = parse("level ==").unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_keyword_is_not_a_field() {
        let err = parse("and == 1").unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedToken { position: 0, .. }));
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse("(level == 'E'").unwrap_err();
        assert!(matches!(err, FilterError::UnexpectedEnd { expected: "')'" }));
    }

    #[test]
    fn test_long_chains_stay_flat() {
        let source = vec!["lineno > 1"; 300].join(" and ");
        let Expr::And(terms) = parse(&source).unwrap() else {
            panic!("expected and at the root");
        };
        assert_eq!(terms.len(), 300);
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let bangs = format!("{}level == 'E'", "!".repeat(4000));
        assert!(matches!(
            parse(&bangs).unwrap_err(),
            FilterError::TooDeep {
                position: 64,
                max: MAX_FILTER_NESTING_DEPTH
            }
        ));

        let parens = format!("{}level == 'E'{}", "(".repeat(2000), ")".repeat(2000));
        assert!(matches!(
            parse(&parens).unwrap_err(),
            FilterError::TooDeep { .. }
        ));

        let at_limit = format!(
            "{}level == 'E'",
            "not ".repeat(MAX_FILTER_NESTING_DEPTH)
        );
        assert!(parse(&at_limit).is_ok());
    }
}
