/// A macro wrapper for creating an [`AbiErr`](crate::AbiErr) that allows
/// logging of errors.
///
/// Specifically, in debug build mode with the `trace` feature enabled, before
/// the error is returned calls are made to the given [`log`] level that
/// describe the error and (with the `backtrace` feature) the stack backtrace.
///
/// Usage:  `err!(trace, AbiErr::InvalidUtf8) -> AbiErr::InvalidUtf8`.
macro_rules! err {
  ($level:ident, $error:expr) => {{
    let error = $error;

    #[cfg(all(debug_assertions, feature = "trace"))]
    {
      ::log::$level!("{}:{}: {:?}", file!(), line!(), &error);
      #[cfg(feature = "backtrace")]
      {
        let bt = backtrace::Backtrace::new();
        ::log::trace!("{:?}", bt);
      }
    }

    error
  }};
}

/// Returns the error (through [`err!`]) from the enclosing function when the
/// condition does not hold.
macro_rules! ensure {
  ($cond:expr, $level:ident, $error:expr) => {
    if !$cond {
      return Err(err!($level, $error));
    }
  };
}
