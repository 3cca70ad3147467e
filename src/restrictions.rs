//! Operand types allowed per comparison operator.
//!
//! Operators missing from the table are unrestricted: any operand types are
//! accepted, subject only to both sides having the same type.

use std::fmt;

use crate::{ast::BinOp, types::FieldType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandSide {
    Left,
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSide::Left => f.write_str("LHS"),
            OperandSide::Right => f.write_str("RHS"),
        }
    }
}

#[derive(Debug)]
struct OperandRestriction {
    left: &'static [FieldType],
    right: &'static [FieldType],
}

impl OperandRestriction {
    fn side(&self, side: OperandSide) -> &'static [FieldType] {
        match side {
            OperandSide::Left => self.left,
            OperandSide::Right => self.right,
        }
    }
}

static OPERAND_RESTRICTIONS: &[(BinOp, OperandRestriction)] = &[
    (
        BinOp::Glob,
        OperandRestriction {
            left: &[FieldType::String],
            right: &[FieldType::Glob],
        },
    ),
    (
        BinOp::Regexp,
        OperandRestriction {
            left: &[FieldType::String],
            right: &[FieldType::Regex],
        },
    ),
];

fn restriction(op: BinOp) -> Option<&'static OperandRestriction> {
    OPERAND_RESTRICTIONS
        .iter()
        .find(|(restricted, _)| *restricted == op)
        .map(|(_, restriction)| restriction)
}

pub fn is_restricted(op: BinOp) -> bool {
    restriction(op).is_some()
}

/// Always true for unrestricted operators.
pub fn is_valid_operand(op: BinOp, side: OperandSide, field_type: FieldType) -> bool {
    restriction(op).is_none_or(|restriction| restriction.side(side).contains(&field_type))
}

/// Empty for unrestricted operators.
pub fn allowed_types(op: BinOp, side: OperandSide) -> &'static [FieldType] {
    restriction(op)
        .map(|restriction| restriction.side(side))
        .unwrap_or_default()
}
