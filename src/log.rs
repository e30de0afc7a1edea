//! Port log points
//!
//! With the `defmt` feature the macros forward to `defmt` (RTT transport,
//! `mtime` timestamps) and take its format syntax. Without it they expand to
//! nothing, so arguments are not evaluated.
//!
//! [`fatal!`] is the exception: it always parks the hart after logging.

/// Debug message
#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

/// Info message
#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

/// Warning message
#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

/// Error message
#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { defmt::error!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! debug { ($($arg:tt)*) => {}; }
#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! info { ($($arg:tt)*) => {}; }
#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! warn { ($($arg:tt)*) => {}; }
#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! error { ($($arg:tt)*) => {}; }

/// Log an unrecoverable condition, then mask interrupts and spin
///
/// Evaluates to `!`.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {{
        $crate::error!($($arg)*);
        $crate::port::park()
    }};
}
