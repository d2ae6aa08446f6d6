//! Logging macros shared by every lensguard crate.
//!
//! All of them forward to [`tracing`]. `success!` is emitted at `INFO` level
//! under the [`SUCCESS_TARGET`] target so terminal formatters can give it its
//! own symbol.

pub const SUCCESS_TARGET: &str = "lensguard::success";
pub const PRINT_TARGET: &str = "lensguard::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "lensguard::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!($($arg)*)
    };
}
