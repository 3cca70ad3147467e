//! Static validation of a (type-converted) query.
//!
//! Validation never stops at the first problem: every node is visited and all
//! diagnostics are returned together, in tree order.

use crate::{
    ast::{BinOp, Expr},
    diagnostic::Diagnostic,
    restrictions::{self, OperandSide},
    types::{FieldType, FieldTypeDescriptor, type_names},
};

/// Collects every diagnostic for `expr`. Empty iff the expression is well-typed.
pub fn validate(expr: &Expr, fields: &dyn FieldTypeDescriptor) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_expr(expr, fields, &mut diagnostics);
    diagnostics
}

fn validate_expr(expr: &Expr, fields: &dyn FieldTypeDescriptor, diagnostics: &mut Vec<Diagnostic>) {
    match expr {
        Expr::Identifier(identifier) => {
            if fields.field_type(identifier.name()).is_none() {
                diagnostics.push(Diagnostic::at(
                    expr,
                    format!("invalid field: {}", identifier.name()),
                ));
            }
        }

        Expr::String(_) | Expr::Number(_) | Expr::Date(_) | Expr::Glob(_) | Expr::Regex(_) => {}

        Expr::Paren { inner, .. } => {
            if !inner.is_logical() {
                diagnostics.push(Diagnostic::at(
                    expr,
                    "expression in parentheses must resolve to a boolean value",
                ));
            }
            validate_expr(inner, fields, diagnostics);
        }

        Expr::Unary { token, operand, .. } => {
            if !operand.is_logical() {
                diagnostics.push(Diagnostic::at(
                    expr,
                    format!(
                        "{} operator can only be applied to expressions that resolve to a boolean value",
                        token.value
                    ),
                ));
            }
            validate_expr(operand, fields, diagnostics);
        }

        Expr::Binary { op, left, right } if !op.is_comparison() => {
            for operand in [left, right] {
                if operand.is_logical() {
                    validate_expr(operand, fields, diagnostics);
                } else {
                    // At the operand, unlike other diagnostics, so the failing side is named
                    diagnostics.push(Diagnostic::at(
                        operand,
                        "operands of a logical operator must resolve to boolean values",
                    ));
                }
            }
        }

        Expr::Binary { op, left, right } => {
            validate_expr(left, fields, diagnostics);
            validate_expr(right, fields, diagnostics);
            validate_comparison(expr, *op, left, right, fields, diagnostics);
        }
    }
}

fn validate_comparison(
    expr: &Expr,
    op: BinOp,
    left: &Expr,
    right: &Expr,
    fields: &dyn FieldTypeDescriptor,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (Some(left_type), Some(right_type)) = (left.value_type(fields), right.value_type(fields))
    else {
        diagnostics.push(Diagnostic::at(
            expr,
            "comparison expressions must compare value types",
        ));
        return;
    };

    // Unknown fields are already reported by the identifier itself
    if left_type == FieldType::Invalid || right_type == FieldType::Invalid {
        return;
    }

    if restrictions::is_restricted(op) {
        for (side, field_type) in [(OperandSide::Left, left_type), (OperandSide::Right, right_type)] {
            if !restrictions::is_valid_operand(op, side, field_type) {
                diagnostics.push(Diagnostic::at(
                    expr,
                    format!(
                        "argument on {} has invalid type: {}. Allowed types are: {}",
                        side,
                        field_type,
                        type_names(restrictions::allowed_types(op, side))
                    ),
                ));
            }
        }
    } else if left_type != right_type {
        diagnostics.push(Diagnostic::at(
            expr,
            format!(
                "attempting to compare different types - LHS Type: {} vs RHS Type: {}",
                left_type, right_type
            ),
        ));
    }
}
