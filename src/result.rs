//! Side-effect taps on results.
//!
//! Every operation in this crate reports its outcome as a plain [`Result`]. The [`ResultExt`]
//! trait lets a call site react to either branch while keeping the result around:
//!
//! ```
//! use future_awaits::result::ResultExt;
//!
//! let mut seen = Vec::new();
//! let res: Result<u8, &str> = Ok(7);
//!
//! let res = res
//!     .on_success(|v| seen.push(*v))
//!     .on_failure(|_| unreachable!());
//!
//! assert_eq!(res, Ok(7));
//! assert_eq!(seen, [7]);
//! ```
//!
//! [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
//! [`ResultExt`]: trait.ResultExt.html

/// Extension methods for [`Result`].
///
/// [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
pub trait ResultExt<T, E>: Sized {
    /// Calls `f` with the success value, if there is one, and returns the result unchanged.
    fn on_success(self, f: impl FnOnce(&T)) -> Self;

    /// Calls `f` with the error, if there is one, and returns the result unchanged.
    fn on_failure(self, f: impl FnOnce(&E)) -> Self;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    #[inline]
    fn on_success(self, f: impl FnOnce(&T)) -> Self {
        if let Ok(value) = &self {
            f(value);
        }
        self
    }

    #[inline]
    fn on_failure(self, f: impl FnOnce(&E)) -> Self {
        if let Err(err) = &self {
            f(err);
        }
        self
    }
}
