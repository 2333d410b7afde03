//! Logging macros.
//!
//! Forward to `defmt` when the `defmt` feature is enabled. Without it the
//! arguments are still type-checked but nothing is emitted. Format strings
//! must stick to plain `{}` placeholders so both expansions accept them.
//!
//! The warning macro is `warning!` since `warn` is taken by the built-in lint
//! attribute.

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! warning {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
        #[cfg(not(feature = "defmt"))]
        let _ = format_args!($($arg)*);
    }};
}

pub(crate) use {debug, info, trace, warning};
