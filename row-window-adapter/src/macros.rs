// Same shims as the core crate, on the `row_window_adapter` target.

#[cfg(feature = "tracing")]
macro_rules! alog {
    (trace, $($tt:tt)*) => {
        tracing::trace!(target: "row_window_adapter", $($tt)*)
    };
    (debug, $($tt:tt)*) => {
        tracing::debug!(target: "row_window_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! alog {
    ($level:ident, $($tt:tt)*) => {};
}

macro_rules! atrace {
    ($($tt:tt)*) => {
        alog!(trace, $($tt)*)
    };
}

macro_rules! adebug {
    ($($tt:tt)*) => {
        alog!(debug, $($tt)*)
    };
}
