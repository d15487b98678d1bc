//! Error reporting for the command line.

use std::env;
use std::io::{self, Write};

/// Environment variable that makes `anyhow` capture a backtrace with each error.
const LIB_BACKTRACE_VAR: &str = "RUST_LIB_BACKTRACE";

/// Makes errors created from now on carry a stack backtrace.
///
/// An explicit `RUST_LIB_BACKTRACE` setting is left untouched. Must run before
/// the first error is created.
pub fn enable_error_backtraces() {
    if env::var_os(LIB_BACKTRACE_VAR).is_none() {
        env::set_var(LIB_BACKTRACE_VAR, "1");
    }
}

/// Writes the message, the cause chain and any captured backtrace of `err`.
pub fn write_error_report<W: Write>(err: &anyhow::Error, out: &mut W) -> io::Result<()> {
    writeln!(out, "Error: {err:?}")
}
