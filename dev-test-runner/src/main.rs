//! Runs `fixtures/cases/*.json` against the built-in models.
//!
//! usage: dev-test-runner [CASE_DIR]
use std::path::PathBuf;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use json_shape::models::builtin_registry;
use json_shape::{Codec, ErrorKind, Path};

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    shape: String,
    input: Value,
    expect: Expect,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Expect {
    Ok(bool),
    Error(ExpectedError),
}

#[derive(Debug, Deserialize)]
struct ExpectedError {
    kind: ErrorKind,
    path: Path,
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/cases")));
    let pattern = format!("{}/*.json", dir.display());

    let codec = Codec::new(builtin_registry()?);
    let mut failures = 0usize;
    let mut total = 0usize;

    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let src = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let case = serde_json::from_str::<Case>(&src)
            .with_context(|| format!("malformed case {}", path.display()))?;
        total += 1;
        match check(&codec, &case) {
            Ok(()) => eprintln!("{} {}", "pass".green(), case.name),
            Err(reason) => {
                failures += 1;
                eprintln!("{} {} ({}): {reason}", "FAIL".red().bold(), case.name, path.display());
            }
        }
    }

    eprintln!("{} cases, {failures} failed", total);
    if failures > 0 {
        anyhow::bail!("{failures} fixture cases failed");
    }
    Ok(())
}

fn check(codec: &Codec<'_>, case: &Case) -> Result<(), String> {
    let decoded = codec.decode(&case.input, &case.shape);
    match (&case.expect, decoded) {
        (Expect::Ok(true), Ok(record)) => {
            // canonical output must decode back to the same record
            let encoded = codec.encode(&record).map_err(|e| format!("re-encode failed: {e}"))?;
            let again = codec.decode(&encoded, &case.shape).map_err(|e| format!("re-decode failed: {e}"))?;
            if again == record { Ok(()) } else { Err("round trip changed the record".into()) }
        }
        (Expect::Ok(_), Ok(_)) => Err("decoded, but the case expects a failure".into()),
        (Expect::Ok(_), Err(e)) => Err(format!("unexpected error: {e}")),
        (Expect::Error(want), Err(got)) if got.kind() == want.kind && got.path() == &want.path => Ok(()),
        (Expect::Error(want), Err(got)) => Err(format!(
            "expected {:?} at {}, got {:?} at {}",
            want.kind, want.path, got.kind(), got.path()
        )),
        (Expect::Error(want), Ok(_)) => Err(format!("expected {:?} at {}, but decoding succeeded", want.kind, want.path)),
    }
}
