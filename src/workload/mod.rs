/*!
 * Workload Module
 * Process descriptor files and synthetic workload generation
 *
 * A workload file holds one process per line as
 * `id,memory,arrival,run_length` in decimal. Whitespace around fields is
 * tolerated and blank lines are skipped.
 */

pub mod generator;

pub use generator::{generate_workload, write_workload_files, WorkloadParams};

use crate::process::ProcessSpec;
use miette::Diagnostic;
use std::fmt::Write as _;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Workload result
pub type WorkloadResult<T> = Result<T, WorkloadError>;

const FIELDS: [&str; 4] = ["id", "memory", "arrival", "run_length"];

/// Workload errors
#[derive(Error, Debug, Diagnostic)]
pub enum WorkloadError {
    #[error("Line {line}: expected 4 comma-separated fields, found {found}")]
    #[diagnostic(
        code(workload::field_count),
        help("Each line must read id,memory,arrival,run_length")
    )]
    FieldCount { line: usize, found: usize },

    #[error("Line {line}: invalid {field} {value:?}")]
    #[diagnostic(
        code(workload::invalid_field),
        help("Fields must be non-negative decimal integers")
    )]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Line {line}: {field} {value} is out of range")]
    #[diagnostic(code(workload::out_of_range))]
    OutOfRange {
        line: usize,
        field: &'static str,
        value: u64,
    },

    #[error("Failed to access workload file {}", path.display())]
    #[diagnostic(code(workload::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parse workload text into process descriptors, in input order
pub fn parse_workload(text: &str) -> WorkloadResult<Vec<ProcessSpec>> {
    let mut specs = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
        if fields.len() != FIELDS.len() {
            return Err(WorkloadError::FieldCount {
                line,
                found: fields.len(),
            });
        }

        let mut values = [0u64; 4];
        for (slot, (value, field)) in values.iter_mut().zip(fields.iter().zip(FIELDS)) {
            *slot = value.parse().map_err(|source| WorkloadError::InvalidField {
                line,
                field,
                value: value.to_string(),
                source,
            })?;
        }

        let [id, memory, arrival, run_length] = values;
        let id = u32::try_from(id).map_err(|_| invalid_range(line, "id", id))?;
        let memory = usize::try_from(memory).map_err(|_| invalid_range(line, "memory", memory))?;
        specs.push(ProcessSpec::new(id, memory, arrival, run_length));
    }

    debug!(processes = specs.len(), "Parsed workload");
    Ok(specs)
}

fn invalid_range(line: usize, field: &'static str, value: u64) -> WorkloadError {
    WorkloadError::OutOfRange { line, field, value }
}

/// Read and parse a workload file
pub fn load_workload(path: impl AsRef<Path>) -> WorkloadResult<Vec<ProcessSpec>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| WorkloadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_workload(&text)
}

/// Render descriptors in the workload text format
pub fn to_csv(specs: &[ProcessSpec]) -> String {
    let mut out = String::new();
    for spec in specs {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            spec.id, spec.memory, spec.arrival, spec.run_length
        );
    }
    out
}
