use crate::core::io::traits::TrajectoryFile;
use crate::core::models::atom::AtomInfo;
use crate::core::models::topology::Topology;
use crate::core::trajectory::{InMemoryTrajectory, TrajectoryError};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent trajectory: {0}")]
    Inconsistency(#[from] TrajectoryError),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
    #[error("MODEL record opened while the previous model is still open")]
    NestedModel,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Multi-model PDB trajectory reader.
///
/// Each `MODEL`/`ENDMDL` block is one frame. Files without `MODEL` records are
/// split on `END` records, so a plain single-structure PDB is a one-frame
/// trajectory. Atom attributes come from the first frame; later frames only
/// contribute coordinates and must have the same atom count. Alternate
/// locations other than blank or `A` are skipped.
pub struct PdbTrajectoryFile;

impl PdbTrajectoryFile {
    fn parse_atom_info(line: &str, line_num: usize) -> Result<AtomInfo, PdbError> {
        let serial_str = slice_and_trim(line, 6, 11);
        let serial: usize = serial_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "7-11".into(),
                value: serial_str.into(),
            },
        })?;
        let res_id_str = slice_and_trim(line, 22, 26);
        let resid: isize = res_id_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26".into(),
                value: res_id_str.into(),
            },
        })?;
        let name = slice_and_trim(line, 12, 16);
        let resname = slice_and_trim(line, 17, 20);
        let chain_id = slice_and_trim(line, 21, 22);
        let segid = match slice_and_trim(line, 72, 76) {
            "" => chain_id,
            seg => seg,
        };
        Ok(AtomInfo::new(serial, name, resid, resname, segid))
    }
}

impl TrajectoryFile for PdbTrajectoryFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<InMemoryTrajectory, Self::Error> {
        let mut atoms: Vec<AtomInfo> = Vec::new();
        let mut frames: Vec<Vec<Point3<f64>>> = Vec::new();
        let mut current: Vec<Point3<f64>> = Vec::new();
        let mut saw_model = false;
        let mut in_model = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = line.get(0..6).unwrap_or(&line).trim();
            match record_type {
                "MODEL" => {
                    if in_model {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::NestedModel,
                        });
                    }
                    if !current.is_empty() {
                        frames.push(std::mem::take(&mut current));
                    }
                    saw_model = true;
                    in_model = true;
                }
                "ENDMDL" => {
                    if !current.is_empty() {
                        frames.push(std::mem::take(&mut current));
                    }
                    in_model = false;
                }
                "END" if !saw_model => {
                    if !current.is_empty() {
                        frames.push(std::mem::take(&mut current));
                    }
                }
                "ATOM" | "HETATM" => {
                    if saw_model && !in_model {
                        continue;
                    }
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }
                    let alt_loc = line.as_bytes()[16];
                    if alt_loc != b' ' && alt_loc != b'A' {
                        continue;
                    }
                    let x = parse_float(&line, 30, 38, line_num)?;
                    let y = parse_float(&line, 38, 46, line_num)?;
                    let z = parse_float(&line, 46, 54, line_num)?;
                    if frames.is_empty() {
                        atoms.push(Self::parse_atom_info(&line, line_num)?);
                    }
                    current.push(Point3::new(x, y, z));
                }
                _ => {}
            }
        }

        if !current.is_empty() {
            frames.push(current);
        }
        if frames.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        debug!(
            "Parsed PDB trajectory: {} frame(s) of {} atom(s).",
            frames.len(),
            atoms.len()
        );
        Ok(InMemoryTrajectory::new(Topology::new(atoms), frames)?)
    }
}
