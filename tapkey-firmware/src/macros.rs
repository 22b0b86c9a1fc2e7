//! Trace macros: `debug!`, `info!`, `warn!` and `error!`.
//!
//! A board built with the `defmt` feature sends them to defmt. Unit tests and the `test-utils`
//! feature print them to stderr with a level prefix, and there `error!` panics under `cfg(test)`
//! so a logged error fails the test. Any other build only evaluates the arguments.
//!
//! `debug!` carries the verbose key trace. Each dispatched event logs its position, direction
//! and action with the time since its edge and the gap to the previous event. Tap/hold and pair
//! decisions, deferred debouncer events and layer mask changes are logged too. `info!` reports connection and command changes and
//! `warn!` reports transport, handler and storage failures.
//!
//! Format strings must stay within `{}` and `{:?}`, which both defmt and `format_args!` accept.

#[allow(unused)]
#[cfg(all(not(test), not(feature = "defmt"), not(feature = "test-utils")))]
mod quiet {
    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),*) => {{let _ = ($($arg),*);}};
    }
}

#[cfg(all(not(test), not(feature = "test-utils"), feature = "defmt"))]
mod defmt_log {
    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),*) => {
            defmt::debug!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),*) => {
            defmt::info!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),*) => {
            defmt::warn!($($arg,)*)
        };
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),*) => {
            defmt::error!($($arg,)*)
        };
    }
}

#[cfg(any(test, feature = "test-utils"))]
mod stderr {
    /// `eprintln!` with a level prefix.
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __trace_line {
        ($level:literal, $($arg:expr),*) => {{
            extern crate std;
            std::eprintln!("{}: {}", $level, format_args!($($arg,)*))
        }};
    }

    #[macro_export]
    macro_rules! debug {
        ($($arg:expr),*) => {
            $crate::__trace_line!("DEBUG", $($arg),*)
        };
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:expr),*) => {
            $crate::__trace_line!("INFO", $($arg),*)
        };
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:expr),*) => {
            $crate::__trace_line!("WARN", $($arg),*)
        };
    }

    #[macro_export]
    macro_rules! error {
        ($($arg:expr),*) => {{
            if cfg!(test) {
                panic!("{}", format_args!($($arg,)*));
            } else {
                $crate::__trace_line!("ERROR", $($arg),*)
            }
        }};
    }
}
