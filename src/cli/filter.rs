//! Filter command: corrects a single message from stdin.

use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::cli::TableArgs;
use crate::correction::CorrectionTable;

/// Filter command options.
///
/// Reads the whole of stdin as one commit message and writes the corrected
/// message to stdout without adding anything. Suitable as a per-commit
/// message filter, e.g. `git filter-branch --msg-filter 'fix-commit-encoding filter'`.
#[derive(Parser)]
pub struct FilterCommand {
    /// Correction table selection.
    #[command(flatten)]
    pub table: TableArgs,
}

impl FilterCommand {
    /// Executes the filter command.
    pub fn execute(self) -> Result<()> {
        let table = self.table.load()?;
        run_filter(&table, io::stdin().lock(), io::stdout().lock())
    }
}

/// Copies one message from `input` to `output`, correcting it on the way.
///
/// Input that is not valid UTF-8 is passed through byte for byte.
pub fn run_filter<R: Read, W: Write>(
    table: &CorrectionTable,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let mut raw = Vec::new();
    input
        .read_to_end(&mut raw)
        .context("Failed to read commit message from stdin")?;

    let written = match std::str::from_utf8(&raw) {
        Ok(message) => output.write_all(table.apply(message).as_bytes()),
        Err(e) => {
            debug!("Message is not UTF-8 ({e}), passing it through");
            output.write_all(&raw)
        }
    };
    written.context("Failed to write commit message to stdout")?;
    output.flush().context("Failed to flush stdout")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(input: &[u8]) -> Vec<u8> {
        let mut output = Vec::new();
        run_filter(CorrectionTable::builtin(), input, &mut output).unwrap();
        output
    }

    #[test]
    fn corrects_message_without_adding_framing() {
        let output = filter("OptimizaciÃ³n de cachÃ©\n\nCuerpo con pÃ¡ginas\n".as_bytes());
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Optimización de caché\n\nCuerpo con páginas\n"
        );
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(filter(b"").is_empty());
    }

    #[test]
    fn keeps_missing_trailing_newline() {
        assert_eq!(filter("diseÃ±o".as_bytes()), "diseño".as_bytes());
    }

    #[test]
    fn passes_invalid_utf8_through() {
        let latin1 = b"Versi\xf3n final";
        assert_eq!(filter(latin1), latin1);
    }
}
