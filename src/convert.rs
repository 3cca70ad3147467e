//! Literal type inference.
//!
//! The parser cannot know whether `"2021-06-01"` is a string or a date; that
//! depends on the field it is compared against. This pass walks the tree and,
//! for each comparison between a field and a string literal, replaces the
//! literal with a materialized date, glob or regex literal when the field type
//! and operator call for one.
//!
//! Literals that fail to parse or compile are left as strings without a
//! diagnostic. Validation then reports them as ordinary type mismatches.

use std::sync::LazyLock;

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use regex::Regex;
use tracing::trace;

use crate::{
    ast::{
        BinOp, DateLiteral, Expr, GlobLiteral, RegexLiteral, StringLiteral,
        literals::DATE_TIME_FORMAT,
    },
    pattern::GlobPattern,
    restrictions::OperandSide,
    types::{FieldType, FieldTypeDescriptor},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));
static DATE_TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("valid date-time pattern")
});

/// Rebuilds `expr` with typed literals substituted into its comparisons.
///
/// The shape of the tree is unchanged. Running the pass on its own output is a
/// no-op, since materialized literals are no longer string literals.
pub fn convert_types(expr: Expr, fields: &dyn FieldTypeDescriptor) -> Expr {
    match expr {
        Expr::Paren { inner, pos } => Expr::Paren {
            inner: convert_logical(inner, fields),
            pos,
        },
        Expr::Unary { op, token, operand } => Expr::Unary {
            op,
            token,
            operand: convert_logical(operand, fields),
        },
        Expr::Binary { op, left, right } if !op.is_comparison() => Expr::Binary {
            op,
            left: convert_logical(left, fields),
            right: convert_logical(right, fields),
        },
        Expr::Binary {
            op,
            mut left,
            mut right,
        } => {
            coerce_operand(&mut left, &mut right, fields, FieldType::Date, parse_date);
            if op == BinOp::Glob {
                coerce_operand(&mut left, &mut right, fields, FieldType::String, compile_glob);
            }
            if op == BinOp::Regexp {
                coerce_operand(&mut left, &mut right, fields, FieldType::String, compile_regex);
            }
            Expr::Binary { op, left, right }
        }
        value => value,
    }
}

/// Non-logical children are a validation concern and pass through untouched.
fn convert_logical(expr: Box<Expr>, fields: &dyn FieldTypeDescriptor) -> Box<Expr> {
    if expr.is_logical() {
        Box::new(convert_types(*expr, fields))
    } else {
        expr
    }
}

/// Replaces the string-literal side of a `field OP "literal"` or
/// `"literal" OP field` comparison, when the field has `field_type` and
/// `materialize` accepts the literal.
fn coerce_operand<F>(
    left: &mut Expr,
    right: &mut Expr,
    fields: &dyn FieldTypeDescriptor,
    field_type: FieldType,
    materialize: F,
) where
    F: FnOnce(&StringLiteral) -> Option<Expr>,
{
    let (side, literal) = match (&*left, &*right) {
        (Expr::Identifier(identifier), Expr::String(literal))
            if identifier.field_type(fields) == field_type =>
        {
            (OperandSide::Right, literal)
        }
        (Expr::String(literal), Expr::Identifier(identifier))
            if identifier.field_type(fields) == field_type =>
        {
            (OperandSide::Left, literal)
        }
        _ => return,
    };

    let Some(replacement) = materialize(literal) else {
        trace!(
            literal = %literal.value,
            pos = %literal.token.pos,
            "string literal left uncoerced"
        );
        return;
    };

    trace!(
        kind = replacement.kind_name(),
        pos = %replacement.pos(),
        "coerced string literal"
    );

    match side {
        OperandSide::Left => *left = replacement,
        OperandSide::Right => *right = replacement,
    }
}

/// Accepts `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`, interpreted in local time.
fn parse_date(literal: &StringLiteral) -> Option<Expr> {
    let text = literal.value.as_str();

    let naive = if DATE_PATTERN.is_match(text) {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .ok()?
            .and_hms_opt(0, 0, 0)?
    } else if DATE_TIME_PATTERN.is_match(text) {
        NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT).ok()?
    } else {
        return None;
    };

    Some(Expr::Date(DateLiteral {
        value: resolve_local(&naive)?,
        token: literal.token.clone(),
    }))
}

/// Maps a wall-clock time to an instant in the local zone.
///
/// An ambiguous time (clocks turned back) resolves to its earlier instant. A
/// time skipped by clocks turning forward is read with the offset in force
/// before the transition, so `02:30` in a one-hour gap becomes `03:30`.
fn resolve_local(naive: &NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(naive) {
        LocalResult::Single(value) => Some(value),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let before = naive.checked_sub_signed(TimeDelta::days(1))?;
            let offset = Local.offset_from_local_datetime(&before).earliest()?;
            let shift = TimeDelta::seconds(offset.local_minus_utc().into());
            Some(Local.from_utc_datetime(&naive.checked_sub_signed(shift)?))
        }
    }
}

fn compile_glob(literal: &StringLiteral) -> Option<Expr> {
    let pattern = GlobPattern::new(&literal.value).ok()?;

    Some(Expr::Glob(GlobLiteral {
        pattern,
        token: literal.token.clone(),
    }))
}

fn compile_regex(literal: &StringLiteral) -> Option<Expr> {
    let regex = Regex::new(&literal.value).ok()?;

    Some(Expr::Regex(RegexLiteral {
        regex,
        token: literal.token.clone(),
    }))
}
