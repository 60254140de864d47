//! Redact command - run text through the sanitizer

use anyhow::Context;
use mergeflow::secret::sanitize_text;
use std::io::{Read, Write};

/// Copy stdin to stdout with secrets redacted, line by line
pub fn run_redact() -> anyhow::Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let mut out = anstream::stdout().lock();
    for line in input.lines() {
        writeln!(out, "{}", sanitize_text(line)).context("failed to write stdout")?;
    }
    Ok(())
}
