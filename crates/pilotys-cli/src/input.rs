//! Reading meeting notes from a file or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::Context;

/// Read the whole input: `path` when given and not `-`, stdin otherwise.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}
