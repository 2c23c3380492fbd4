use core::fmt::Debug;
use log::{Level, STATIC_MAX_LEVEL};

/// When enabling backtraces (but not feature `backtrace_full`), the number of
/// stack frames to log.
#[cfg(feature = "backtrace")]
const SHORT_BACKTRACE_LOG_FRAMES: usize = 2;

/// Utility trait for error reporting, primarily used with [`Option`].
///
/// This provides an alternative to `Option`'s `ok_or()` and `ok_or_else()`,
/// and addresses the following issues:
///
/// - With `ok_or`, the error is not reported at the point it is generated.
///   When decoding a deeply nested tuple, catching and reporting errors
///   further up the call stack rarely says which child failed.
/// - While `ok_or_else` addresses the above issue, it requires more verbose
///   syntax (a closure) at each and every call location.
///
/// The error is logged with the `log` crate when the `trace` feature is
/// present, followed by a backtrace (always at the `trace` level) if the
/// `backtrace` feature is present.
pub(crate) trait OkOrLog<O, E>: Sized
where
  E: Debug,
{
  fn ok_or_log(self, level: Level, error: E) -> Result<O, E>;
}

impl<O, E> OkOrLog<O, E> for Option<O>
where
  E: Debug,
{
  #[inline(always)]
  fn ok_or_log(self, level: Level, error: E) -> Result<O, E> {
    if let Some(value) = self {
      Ok(value)
    } else {
      Err::<O, E>(error).log_err(level)
    }
  }
}

/// Logs the error of a [`Result`] (see [`OkOrLog`]) and passes it through.
///
/// Mostly useful on results from other crates, whose errors are translated
/// into an `AbiErr` without a call to `err!`.
pub(crate) trait LogErr<O, E>
where
  E: Debug,
{
  fn log_err(self, level: Level) -> Result<O, E>;
}

impl<O, E> LogErr<O, E> for Result<O, E>
where
  E: Debug,
{
  #[inline(always)]
  fn log_err(self, level: Level) -> Result<O, E> {
    match self {
      Ok(value) => Ok(value),
      Err(error) => {
        // Const comparison allows dead code elimination.
        if cfg!(feature = "trace") && level <= STATIC_MAX_LEVEL {
          log::log!(level, "{:?}", error);
          #[cfg(feature = "backtrace")]
          {
            let mut bt = backtrace::Backtrace::new_unresolved();
            bt.resolve();
            if cfg!(feature = "backtrace_full") {
              log::trace!("{:?}", bt);
            } else {
              for frame in
                bt.frames().iter().skip(1).take(SHORT_BACKTRACE_LOG_FRAMES)
              {
                log::trace!("{frame:?}");
              }
            }
          }
        }
        Err(error)
      },
    }
  }
}
