//! Error types produced by the bridge and everything built on top of it.

use std::error::Error;
use std::fmt;

/// The error returned when a callback-style operation is awaited.
///
/// Besides the operation's own error, waiting can fail in two ways of its own: the deadline may
/// elapse before the operation completes, or the operation may give up its completion without
/// ever reporting a result.
///
/// # Examples
///
/// ```
/// use future_awaits::sync::Completion;
/// use future_awaits::{block_on, BridgeError};
///
/// // The operation throws its completion away without calling it.
/// let res = block_on(|completion: Completion<Result<(), ()>>| drop(completion));
///
/// assert_eq!(res, Err(BridgeError::NoResult));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BridgeError<E> {
    /// The operation finished without reporting any result.
    NoResult,

    /// The waiter gave up before the operation reported a result.
    TimedOut,

    /// The operation reported its own error.
    Wrapped(E),
}

impl<E> BridgeError<E> {
    /// Returns `true` if the waiter gave up before a result was reported.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, BridgeError::TimedOut)
    }

    /// Returns `true` if no result was ever reported.
    pub fn is_no_result(&self) -> bool {
        matches!(self, BridgeError::NoResult)
    }

    /// Returns the operation's own error, if this is one.
    pub fn wrapped(&self) -> Option<&E> {
        match self {
            BridgeError::Wrapped(err) => Some(err),
            _ => None,
        }
    }

    /// Converts into the operation's own error, discarding the bridge's sentinels.
    pub fn into_wrapped(self) -> Option<E> {
        match self {
            BridgeError::Wrapped(err) => Some(err),
            _ => None,
        }
    }

    /// Maps the wrapped error, leaving the sentinels untouched.
    pub fn map<F>(self, f: impl FnOnce(E) -> F) -> BridgeError<F> {
        match self {
            BridgeError::NoResult => BridgeError::NoResult,
            BridgeError::TimedOut => BridgeError::TimedOut,
            BridgeError::Wrapped(err) => BridgeError::Wrapped(f(err)),
        }
    }
}

impl<E> BridgeError<BridgeError<E>> {
    /// Collapses a bridge error that wraps another bridge error.
    pub fn flatten(self) -> BridgeError<E> {
        match self {
            BridgeError::NoResult | BridgeError::Wrapped(BridgeError::NoResult) => {
                BridgeError::NoResult
            }
            BridgeError::TimedOut | BridgeError::Wrapped(BridgeError::TimedOut) => {
                BridgeError::TimedOut
            }
            BridgeError::Wrapped(BridgeError::Wrapped(err)) => BridgeError::Wrapped(err),
        }
    }
}

impl<E: fmt::Display> fmt::Display for BridgeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::NoResult => f.write_str("operation finished without a result"),
            BridgeError::TimedOut => f.write_str("operation has timed out"),
            BridgeError::Wrapped(err) => err.fmt(f),
        }
    }
}

impl<E: Error + 'static> Error for BridgeError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BridgeError::Wrapped(err) => Some(err),
            _ => None,
        }
    }
}

/// An error from one of two differently-typed sources.
///
/// Used wherever two operations with unrelated error types are composed into one, so that the
/// caller can still tell which side failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PairError<A, B> {
    /// The first operation failed.
    First(A),

    /// The second operation failed.
    Second(B),
}

impl<A, B> PairError<A, B> {
    /// Returns `true` if the first operation failed.
    pub fn is_first(&self) -> bool {
        matches!(self, PairError::First(_))
    }

    /// Returns `true` if the second operation failed.
    pub fn is_second(&self) -> bool {
        matches!(self, PairError::Second(_))
    }
}

impl<T> PairError<T, T> {
    /// Returns the error regardless of which side produced it.
    pub fn into_inner(self) -> T {
        match self {
            PairError::First(err) | PairError::Second(err) => err,
        }
    }
}

impl<A: fmt::Display, B: fmt::Display> fmt::Display for PairError<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairError::First(err) => write!(f, "first operation failed: {}", err),
            PairError::Second(err) => write!(f, "second operation failed: {}", err),
        }
    }
}

impl<A: Error + 'static, B: Error + 'static> Error for PairError<A, B> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PairError::First(err) => Some(err),
            PairError::Second(err) => Some(err),
        }
    }
}
