// Crate-private logging shims. With `feature = "tracing"` every event goes to the `row_window`
// target; without it the macros expand to nothing and the crate stays dependency-free.

#[cfg(feature = "tracing")]
macro_rules! vlog {
    (trace, $($tt:tt)*) => {
        tracing::trace!(target: "row_window", $($tt)*)
    };
    (debug, $($tt:tt)*) => {
        tracing::debug!(target: "row_window", $($tt)*)
    };
    (warn, $($tt:tt)*) => {
        tracing::warn!(target: "row_window", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! vlog {
    ($level:ident, $($tt:tt)*) => {};
}

macro_rules! vtrace {
    ($($tt:tt)*) => {
        vlog!(trace, $($tt)*)
    };
}

macro_rules! vdebug {
    ($($tt:tt)*) => {
        vlog!(debug, $($tt)*)
    };
}

macro_rules! vwarn {
    ($($tt:tt)*) => {
        vlog!(warn, $($tt)*)
    };
}
