use alloc::{
    collections::VecDeque,
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use p3_field::Field;

use super::errors::FiatShamirError;

/// Kind of a transcript interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Sample,
    Observe,
    Grind,
}

impl Pattern {
    #[must_use]
    pub fn as_field_element<F: Field>(self) -> F {
        F::from_u8(self as u8)
    }
}

/// One expected interaction: its kind, its label and the number of extension scalars it carries.
///
/// For [`Pattern::Grind`], `len` is the number of grinding bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub pattern: Pattern,
    pub label: String,
    pub len: usize,
}

impl Op {
    pub fn new(pattern: Pattern, label: impl Into<String>, len: usize) -> Self {
        Self {
            pattern,
            label: label.into(),
            len,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.pattern, self.label)
    }
}

/// Encodes a label as one field element per byte.
pub(crate) fn label_to_field_elements<F: Field>(label: &str) -> Vec<F> {
    label.bytes().map(F::from_u8).collect()
}

/// Walks the ops of a domain separator in order.
#[derive(Debug, Clone, Default)]
pub(crate) struct PatternTracker {
    expected: VecDeque<Op>,
}

impl PatternTracker {
    pub(crate) fn new(ops: &[Op]) -> Self {
        Self {
            expected: ops.iter().cloned().collect(),
        }
    }

    /// Consumes the next op, checking that it matches the interaction being performed.
    pub(crate) fn advance(
        &mut self,
        pattern: Pattern,
        label: &str,
        len: usize,
    ) -> Result<(), FiatShamirError> {
        let found = Op::new(pattern, label, len);
        let Some(expected) = self.expected.pop_front() else {
            return Err(FiatShamirError::UnexpectedLabel {
                expected: "end of protocol".to_string(),
                found: found.to_string(),
            });
        };

        if expected.pattern != pattern || expected.label != label {
            return Err(FiatShamirError::UnexpectedLabel {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        if expected.len != len {
            return Err(FiatShamirError::LengthMismatch {
                label: expected.label,
                expected: expected.len,
                found: len,
            });
        }
        Ok(())
    }

    /// Fails if some declared interaction never happened.
    pub(crate) fn finish(&self) -> Result<(), FiatShamirError> {
        match self.expected.front() {
            None => Ok(()),
            Some(op) => Err(FiatShamirError::UnexpectedLabel {
                expected: op.to_string(),
                found: "end of protocol".to_string(),
            }),
        }
    }
}
