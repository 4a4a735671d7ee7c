//! Handler outcomes.

use serde_json::Value;

/// What a handler reports back to the dispatcher.
///
/// Failure is a soft signal: it never stops sibling or ancestor handlers
/// from running, it only makes `publish` return `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// The handler ran and did not signal failure.
    #[default]
    Success,
    /// The handler explicitly signalled failure.
    Failure,
}

impl Outcome {
    /// Whether this is [`Outcome::Success`].
    pub const fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Whether this is [`Outcome::Failure`].
    pub const fn is_failure(self) -> bool {
        matches!(self, Outcome::Failure)
    }

    /// Combine two outcomes; failure wins.
    pub const fn and(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Outcome::Success, Outcome::Success) => Outcome::Success,
            _ => Outcome::Failure,
        }
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        value.into_outcome()
    }
}

impl From<Outcome> for bool {
    fn from(value: Outcome) -> Self {
        value.is_success()
    }
}

/// Trait for converting a handler's return value into an [`Outcome`].
///
/// Only an explicit `false` counts as failure; anything else is success.
///
/// # Default Implementations
///
/// - `()` → Success
/// - `bool` → `false` = Failure, `true` = Success
/// - `Outcome` → As is
/// - `Option<T>` → `None` = Success, `Some(t)` delegates to `t`
/// - `Result<T, E>` → `Err` = Failure, `Ok(t)` delegates to `t`
/// - strings and every primitive number → Success
/// - `serde_json::Value` → `Value::Bool(false)` = Failure, anything else Success
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a handler",
    label = "missing `IntoOutcome` implementation",
    note = "Return `()`, `bool`, `Outcome`, `Option<_>` or `Result<_, _>` from handlers."
)]
pub trait IntoOutcome {
    /// Convert the return value into an outcome.
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Success
    }
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> Outcome {
        if self {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl<T: IntoOutcome> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Outcome {
        match self {
            Some(t) => t.into_outcome(),
            None => Outcome::Success,
        }
    }
}

impl<T: IntoOutcome, E> IntoOutcome for Result<T, E> {
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(t) => t.into_outcome(),
            Err(_) => Outcome::Failure,
        }
    }
}

impl IntoOutcome for Value {
    fn into_outcome(self) -> Outcome {
        match self {
            Value::Bool(false) => Outcome::Failure,
            _ => Outcome::Success,
        }
    }
}

/// Values that never signal failure.
macro_rules! impl_always_success {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOutcome for $ty {
                fn into_outcome(self) -> Outcome {
                    Outcome::Success
                }
            }
        )*
    };
}

impl_always_success!(
    String, &'static str, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_false_fails() {
        assert_eq!(false.into_outcome(), Outcome::Failure);
        assert_eq!(true.into_outcome(), Outcome::Success);
        assert_eq!(().into_outcome(), Outcome::Success);
        assert_eq!("done".into_outcome(), Outcome::Success);
        assert_eq!(3usize.into_outcome(), Outcome::Success);
    }

    #[test]
    fn test_numbers_succeed() {
        assert_eq!(0u8.into_outcome(), Outcome::Success);
        assert_eq!((-1i32).into_outcome(), Outcome::Success);
        assert_eq!(0i64.into_outcome(), Outcome::Success);
        assert_eq!(u128::MAX.into_outcome(), Outcome::Success);
        assert_eq!(0.0f64.into_outcome(), Outcome::Success);
        assert_eq!(String::new().into_outcome(), Outcome::Success);
    }

    #[test]
    fn test_option_and_result() {
        assert_eq!(None::<bool>.into_outcome(), Outcome::Success);
        assert_eq!(Some(false).into_outcome(), Outcome::Failure);
        assert_eq!(Ok::<_, String>(()).into_outcome(), Outcome::Success);
        assert_eq!(Err::<(), _>("boom").into_outcome(), Outcome::Failure);
        assert_eq!(Ok::<_, String>(false).into_outcome(), Outcome::Failure);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(json!(false).into_outcome(), Outcome::Failure);
        assert_eq!(json!(null).into_outcome(), Outcome::Success);
        assert_eq!(json!(0).into_outcome(), Outcome::Success);
        assert_eq!(json!("").into_outcome(), Outcome::Success);
    }

    #[test]
    fn test_and() {
        assert_eq!(Outcome::Success.and(Outcome::Success), Outcome::Success);
        assert_eq!(Outcome::Success.and(Outcome::Failure), Outcome::Failure);
        assert_eq!(Outcome::Failure.and(Outcome::Success), Outcome::Failure);
    }
}
