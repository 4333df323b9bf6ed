// LogViewer - core/filter.rs
//
// Compiles parsed filter expressions into a typed predicate tree and
// evaluates it against records. Core layer: pure logic, no I/O or UI.
//
// All type checking happens in `Filter::compile`; evaluating a compiled
// filter cannot fail.

use crate::core::expr::{self, CmpOp, Expr};
use crate::core::model::{Level, LogRecord};
use crate::util::constants::{
    FILTER_DATETIME_FORMATS, FILTER_DATE_FORMATS, MAX_FILTER_EXPRESSION_LEN,
    MAX_REGEX_PATTERN_LENGTH,
};
use crate::util::error::FilterError;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::cmp::Ordering;

// =============================================================================
// Fields and values
// =============================================================================

/// Record fields readable from a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Name,
    Level,
    File,
    LineNo,
    Text,
}

impl Field {
    /// Resolve a field name as written in an expression.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date" => Some(Field::Date),
            "name" => Some(Field::Name),
            "level" => Some(Field::Level),
            "file" => Some(Field::File),
            "lineno" | "line" => Some(Field::LineNo),
            "text" | "message" => Some(Field::Text),
            _ => None,
        }
    }

    fn value_type(self) -> ValueType {
        match self {
            Field::Date => ValueType::Date,
            Field::Name | Field::File | Field::Text => ValueType::Str,
            Field::Level => ValueType::Level,
            Field::LineNo => ValueType::Int,
        }
    }

    fn read(self, record: &LogRecord) -> Scalar<'_> {
        match self {
            Field::Date => Scalar::Date(record.timestamp),
            Field::Name => Scalar::Str(&record.name),
            Field::Level => Scalar::Level(&record.level),
            Field::File => Scalar::Str(&record.file),
            Field::LineNo => Scalar::Int(i64::from(record.line_number)),
            Field::Text => Scalar::Str(&record.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueType {
    Str,
    Int,
    Date,
    Level,
    Bool,
}

impl ValueType {
    fn name(self) -> &'static str {
        match self {
            ValueType::Str => "string",
            ValueType::Int => "integer",
            ValueType::Date => "date",
            ValueType::Level => "level",
            ValueType::Bool => "boolean",
        }
    }
}

/// A constant after type resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Date(NaiveDateTime),
    Level(Level),
    Bool(bool),
}

/// Borrowed view of a value during evaluation.
#[derive(Debug, Clone, Copy)]
enum Scalar<'a> {
    Str(&'a str),
    Int(i64),
    Date(NaiveDateTime),
    Level(&'a Level),
    Bool(bool),
}

impl Scalar<'_> {
    fn is_truthy(&self) -> bool {
        match self {
            Scalar::Str(s) => !s.is_empty(),
            Scalar::Int(i) => *i != 0,
            Scalar::Date(_) => true,
            Scalar::Level(level) => !level.code().is_empty(),
            Scalar::Bool(b) => *b,
        }
    }
}

/// Typed operand of a compiled predicate.
#[derive(Debug, Clone)]
pub enum Operand {
    Field(Field),
    Const(Value),
}

impl Operand {
    fn eval<'a>(&'a self, record: &'a LogRecord) -> Scalar<'a> {
        match self {
            Operand::Field(field) => field.read(record),
            Operand::Const(Value::Str(s)) => Scalar::Str(s),
            Operand::Const(Value::Int(i)) => Scalar::Int(*i),
            Operand::Const(Value::Date(d)) => Scalar::Date(*d),
            Operand::Const(Value::Level(l)) => Scalar::Level(l),
            Operand::Const(Value::Bool(b)) => Scalar::Bool(*b),
        }
    }
}

// =============================================================================
// Compiled filter
// =============================================================================

/// Compiled predicate tree.
#[derive(Debug, Clone)]
pub enum Predicate {
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Compare {
        lhs: Operand,
        op: CmpOp,
        rhs: Operand,
    },
    Matches {
        field: Field,
        regex: Regex,
    },
    Truthy(Operand),
}

impl Predicate {
    fn eval(&self, record: &LogRecord) -> bool {
        match self {
            Predicate::And(terms) => terms.iter().all(|p| p.eval(record)),
            Predicate::Or(terms) => terms.iter().any(|p| p.eval(record)),
            Predicate::Not(inner) => !inner.eval(record),
            Predicate::Compare { lhs, op, rhs } => {
                compare(lhs.eval(record), *op, rhs.eval(record))
            }
            Predicate::Matches { field, regex } => match field.read(record) {
                Scalar::Str(s) => regex.is_match(s),
                _ => false,
            },
            Predicate::Truthy(operand) => operand.eval(record).is_truthy(),
        }
    }
}

/// A compiled filter expression.
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// Empty expression: every record passes.
    #[default]
    All,
    Predicate {
        /// The expression as entered (trailing whitespace removed).
        source: String,
        predicate: Predicate,
    },
}

impl Filter {
    /// Compile an expression. Blank input yields `Filter::All`.
    pub fn compile(expression: &str) -> Result<Self, FilterError> {
        let source = expression.trim_end();
        if source.trim().is_empty() {
            return Ok(Filter::All);
        }

        let length = source.chars().count();
        if length > MAX_FILTER_EXPRESSION_LEN {
            return Err(FilterError::TooLong {
                length,
                max: MAX_FILTER_EXPRESSION_LEN,
            });
        }

        let tree = expr::parse(source)?;
        let predicate = resolve(tree)?;
        Ok(Filter::Predicate {
            source: source.to_string(),
            predicate,
        })
    }

    /// Returns true if this filter lets every record through.
    pub fn is_empty(&self) -> bool {
        matches!(self, Filter::All)
    }

    /// The expression text, or "" for `Filter::All`.
    pub fn source(&self) -> &str {
        match self {
            Filter::All => "",
            Filter::Predicate { source, .. } => source,
        }
    }

    /// Test one record.
    pub fn matches(&self, record: &LogRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Predicate { predicate, .. } => predicate.eval(record),
        }
    }
}

/// Compile `expression` and test it against `record`.
///
/// An empty expression always matches. Prefer `Filter::compile` once and
/// `Filter::matches` per record when testing many records.
pub fn matches(record: &LogRecord, expression: &str) -> Result<bool, FilterError> {
    Ok(Filter::compile(expression)?.matches(record))
}

/// Apply a filter to a slice of records, returning indices of matching records.
///
/// Returns indices into the original slice in ascending order, so the
/// filtered view preserves file order without copying records.
pub fn apply_filter(records: &[LogRecord], filter: &Filter) -> Vec<usize> {
    if filter.is_empty() {
        return (0..records.len()).collect();
    }

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .map(|(idx, _)| idx)
        .collect()
}

// =============================================================================
// Evaluation
// =============================================================================

fn ordering_holds(op: CmpOp, ord: Ordering) -> bool {
    match op {
        CmpOp::Eq => ord == Ordering::Equal,
        CmpOp::Ne => ord != Ordering::Equal,
        CmpOp::Lt => ord == Ordering::Less,
        CmpOp::Le => ord != Ordering::Greater,
        CmpOp::Gt => ord == Ordering::Greater,
        CmpOp::Ge => ord != Ordering::Less,
        CmpOp::Contains | CmpOp::In | CmpOp::NotIn | CmpOp::Matches => false,
    }
}

fn compare(lhs: Scalar<'_>, op: CmpOp, rhs: Scalar<'_>) -> bool {
    match (lhs, rhs) {
        (Scalar::Str(a), Scalar::Str(b)) => match op {
            CmpOp::Contains => a.contains(b),
            CmpOp::In => b.contains(a),
            CmpOp::NotIn => !b.contains(a),
            _ => ordering_holds(op, a.cmp(b)),
        },
        (Scalar::Int(a), Scalar::Int(b)) => ordering_holds(op, a.cmp(&b)),
        (Scalar::Date(a), Scalar::Date(b)) => ordering_holds(op, a.cmp(&b)),
        (Scalar::Level(a), Scalar::Level(b)) => ordering_holds(op, a.cmp(b)),
        (Scalar::Bool(a), Scalar::Bool(b)) => ordering_holds(op, a.cmp(&b)),
        // Unreachable after type resolution.
        _ => false,
    }
}

// =============================================================================
// Type resolution
// =============================================================================

fn resolve(tree: Expr) -> Result<Predicate, FilterError> {
    Ok(match tree {
        Expr::Or(terms) => Predicate::Or(resolve_all(terms)?),
        Expr::And(terms) => Predicate::And(resolve_all(terms)?),
        Expr::Not(inner) => Predicate::Not(Box::new(resolve(*inner)?)),
        Expr::Truthy(operand) => {
            let (operand, _) = resolve_standalone(operand)?;
            Predicate::Truthy(operand)
        }
        Expr::Compare {
            lhs,
            op,
            rhs,
            position,
        } => resolve_compare(lhs, op, rhs, position)?,
    })
}

fn resolve_all(terms: Vec<Expr>) -> Result<Vec<Predicate>, FilterError> {
    terms.into_iter().map(resolve).collect()
}

/// Resolve an operand whose type does not depend on its peer.
fn resolve_standalone(operand: expr::Operand) -> Result<(Operand, ValueType), FilterError> {
    match operand {
        expr::Operand::Field { name, position } => {
            let field =
                Field::from_name(&name).ok_or(FilterError::UnknownField { position, name })?;
            Ok((Operand::Field(field), field.value_type()))
        }
        expr::Operand::Str { value, .. } => Ok((Operand::Const(Value::Str(value)), ValueType::Str)),
        expr::Operand::Int { value, .. } => Ok((Operand::Const(Value::Int(value)), ValueType::Int)),
        expr::Operand::Bool { value, .. } => {
            Ok((Operand::Const(Value::Bool(value)), ValueType::Bool))
        }
    }
}

/// Literal type as written, before coercion.
fn literal_type(operand: &expr::Operand) -> Option<ValueType> {
    match operand {
        expr::Operand::Field { .. } => None,
        expr::Operand::Str { .. } => Some(ValueType::Str),
        expr::Operand::Int { .. } => Some(ValueType::Int),
        expr::Operand::Bool { .. } => Some(ValueType::Bool),
    }
}

/// Convert a literal to `target` so it can be compared with a field of that
/// type. Strings are parsed into levels, dates and integers as needed.
fn coerce_literal(literal: expr::Operand, target: ValueType) -> Result<Operand, FilterError> {
    let found = literal_type(&literal).unwrap_or(ValueType::Str);
    let position = literal.position();

    let value = match (literal, target) {
        (expr::Operand::Str { value, .. }, ValueType::Str) => Value::Str(value),
        (expr::Operand::Int { value, .. }, ValueType::Int) => Value::Int(value),
        (expr::Operand::Bool { value, .. }, ValueType::Bool) => Value::Bool(value),
        (expr::Operand::Str { value, .. }, ValueType::Int) => {
            let parsed = value.trim().parse::<i64>().map_err(|_| FilterError::InvalidInteger {
                position,
                literal: value.clone(),
            })?;
            Value::Int(parsed)
        }
        (expr::Operand::Str { value, .. }, ValueType::Level) => {
            let code = value.trim();
            if code.is_empty() {
                return Err(FilterError::InvalidLevel {
                    position,
                    literal: value,
                });
            }
            Value::Level(Level::from_code(code))
        }
        (expr::Operand::Str { value, .. }, ValueType::Date) => {
            let parsed = parse_date_literal(&value).ok_or(FilterError::InvalidDate {
                position,
                literal: value.clone(),
            })?;
            Value::Date(parsed)
        }
        _ => {
            return Err(FilterError::TypeMismatch {
                position,
                operator: "==",
                left: target.name(),
                right: found.name(),
            })
        }
    };
    Ok(Operand::Const(value))
}

fn parse_date_literal(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    FILTER_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            FILTER_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn resolve_compare(
    lhs: expr::Operand,
    op: CmpOp,
    rhs: expr::Operand,
    position: usize,
) -> Result<Predicate, FilterError> {
    let mismatch = |left: ValueType, right: ValueType| FilterError::TypeMismatch {
        position,
        operator: op.symbol(),
        left: left.name(),
        right: right.name(),
    };

    if op == CmpOp::Matches {
        let (lhs, lhs_type) = resolve_standalone(lhs)?;
        let field = match lhs {
            Operand::Field(field) if lhs_type == ValueType::Str => field,
            _ => return Err(mismatch(lhs_type, literal_type(&rhs).unwrap_or(ValueType::Str))),
        };
        let (pattern, pattern_pos) = match rhs {
            expr::Operand::Str { value, position } => (value, position),
            other => {
                let (_, rhs_type) = resolve_standalone(other)?;
                return Err(mismatch(lhs_type, rhs_type));
            }
        };
        let length = pattern.chars().count();
        if length > MAX_REGEX_PATTERN_LENGTH {
            return Err(FilterError::RegexTooLong {
                position: pattern_pos,
                length,
                max: MAX_REGEX_PATTERN_LENGTH,
            });
        }
        let regex = Regex::new(&pattern).map_err(|e| FilterError::InvalidRegex {
            position: pattern_pos,
            pattern: pattern.clone(),
            source: e,
        })?;
        return Ok(Predicate::Matches { field, regex });
    }

    // Resolve fields first; a literal takes the type of the field it faces.
    let (lhs, lhs_type, rhs, rhs_type) = match (literal_type(&lhs), literal_type(&rhs)) {
        (None, Some(_)) => {
            let (lhs, lhs_type) = resolve_standalone(lhs)?;
            let rhs = coerce_for(rhs, lhs_type, op, position)?;
            (lhs, lhs_type, rhs, lhs_type)
        }
        (Some(_), None) => {
            let (rhs, rhs_type) = resolve_standalone(rhs)?;
            let lhs = coerce_for(lhs, rhs_type, op, position)?;
            (lhs, rhs_type, rhs, rhs_type)
        }
        _ => {
            let (lhs, lhs_type) = resolve_standalone(lhs)?;
            let (rhs, rhs_type) = resolve_standalone(rhs)?;
            (lhs, lhs_type, rhs, rhs_type)
        }
    };

    if lhs_type != rhs_type {
        return Err(mismatch(lhs_type, rhs_type));
    }

    let containment = matches!(op, CmpOp::Contains | CmpOp::In | CmpOp::NotIn);
    if containment && lhs_type != ValueType::Str {
        return Err(mismatch(lhs_type, rhs_type));
    }

    Ok(Predicate::Compare { lhs, op, rhs })
}

/// Coerce a literal facing a field of type `field_type` under `op`.
///
/// Containment operators only accept strings, so the literal is not
/// reinterpreted as a level or date there.
fn coerce_for(
    literal: expr::Operand,
    field_type: ValueType,
    op: CmpOp,
    position: usize,
) -> Result<Operand, FilterError> {
    let containment = matches!(op, CmpOp::Contains | CmpOp::In | CmpOp::NotIn);
    if containment && field_type != ValueType::Str {
        return Err(FilterError::TypeMismatch {
            position,
            operator: op.symbol(),
            left: field_type.name(),
            right: literal_type(&literal).unwrap_or(ValueType::Str).name(),
        });
    }
    coerce_literal(literal, field_type).map_err(|e| match e {
        FilterError::TypeMismatch { left, right, .. } => FilterError::TypeMismatch {
            position,
            operator: op.symbol(),
            left,
            right,
        },
        other => other,
    })
}
