//! Pool keys: the identity of a filter configuration.
//!
//! A key is the filter kind plus its arguments, split into an ordered
//! positional list and a name-sorted keyword map. Two configurations share a
//! pool entry exactly when their keys are equal:
//!
//! - positional order matters, keyword order does not
//! - a positional argument never equals a keyword argument, even when the
//!   values match
//! - floats compare by bit pattern after folding `-0.0` into `0.0`

use std::collections::BTreeMap;

/// A hashable argument value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgValue {
    Int(i64),
    /// `f64` bit pattern.
    Float(u64),
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Float argument, normalizing negative zero.
    pub fn float(v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        ArgValue::Float(v.to_bits())
    }

    /// Whether this value (or any nested value) is NaN.
    pub fn is_nan(&self) -> bool {
        match self {
            ArgValue::Int(_) => false,
            ArgValue::Float(bits) => f64::from_bits(*bits).is_nan(),
            ArgValue::List(items) => items.iter().any(ArgValue::is_nan),
        }
    }
}

macro_rules! int_arg {
    ($($t:ty),*) => {
        $(impl From<$t> for ArgValue {
            fn from(v: $t) -> Self {
                ArgValue::Int(v as i64)
            }
        })*
    };
}

int_arg!(i32, i64, u8, u32, usize);

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        ArgValue::float(v as f64)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::float(v)
    }
}

impl<A: Into<ArgValue>, B: Into<ArgValue>> From<(A, B)> for ArgValue {
    fn from((a, b): (A, B)) -> Self {
        ArgValue::List(vec![a.into(), b.into()])
    }
}

impl<T: Into<ArgValue> + Clone> From<&[T]> for ArgValue {
    fn from(items: &[T]) -> Self {
        ArgValue::List(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<ArgValue>, const N: usize> From<[T; N]> for ArgValue {
    fn from(items: [T; N]) -> Self {
        ArgValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Argument builder for a [`FilterKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    positional: Vec<ArgValue>,
    keyword: BTreeMap<String, ArgValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument, replacing any earlier value for `name`.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }
}

/// Identity of a pooled filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey {
    pub kind: String,
    pub positional: Vec<ArgValue>,
    pub keyword: BTreeMap<String, ArgValue>,
}

impl FilterKey {
    pub fn new(kind: impl Into<String>, args: Args) -> Self {
        Self {
            kind: kind.into(),
            positional: args.positional,
            keyword: args.keyword,
        }
    }

    /// Whether any argument is NaN.
    pub fn has_nan(&self) -> bool {
        self.positional.iter().any(ArgValue::is_nan) || self.keyword.values().any(ArgValue::is_nan)
    }
}
