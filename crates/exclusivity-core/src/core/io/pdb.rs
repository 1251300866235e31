use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::{Atom, infer_element};
use crate::core::models::chain::ChainType;
use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, trace};

const MIN_COORDINATE_LINE_LENGTH: usize = 54;
const WATER_RESIDUE_NAMES: [&str; 3] = ["HOH", "WAT", "DOD"];

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> char {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ')
}

fn finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

// `f64::from_str` accepts "nan" and "inf"; neither is a usable coordinate.
fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    finite(value).ok_or_else(|| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(line: &str, start: usize, end: usize, default: f64) -> f64 {
    finite(slice_and_trim(line, start, end)).unwrap_or(default)
}

/// Reader and writer for the coordinate section of PDB files.
///
/// Only ATOM and HETATM records of the first model are read. Waters are dropped and, for
/// atoms with alternate locations, only the first conformer (`A` or `1`) is kept.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<MolecularSystem, Self::Error> {
        let mut system = MolecularSystem::new();
        let mut current_chain: Option<(char, ChainId)> = None;
        let mut current_residue: Option<((isize, char), ResidueId)> = None;
        let mut seen_model = false;
        let mut skipped_alt_locs = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "MODEL" => {
                    if seen_model {
                        break;
                    }
                    seen_model = true;
                }
                "ENDMDL" | "END" => break,
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_COORDINATE_LINE_LENGTH {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let alt_loc = column_char(&line, 16);
                    if !matches!(alt_loc, ' ' | 'A' | '1') {
                        skipped_alt_locs += 1;
                        continue;
                    }

                    let res_name = slice_and_trim(&line, 17, 20);
                    if WATER_RESIDUE_NAMES.contains(&res_name) {
                        continue;
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }

                    let chain_char = column_char(&line, 21);
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let insertion_code = column_char(&line, 26);

                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;
                    let occupancy = parse_optional_float(&line, 54, 60, 1.0);
                    let b_factor = parse_optional_float(&line, 60, 66, 0.0);

                    let element = match slice_and_trim(&line, 76, 78) {
                        "" => infer_element(name),
                        e => e.to_ascii_uppercase(),
                    };
                    let is_hetero = record_type == "HETATM";
                    let serial = slice_and_trim(&line, 6, 11)
                        .parse()
                        .unwrap_or(system.atom_count() + 1);

                    let chain_id = match current_chain {
                        Some((id, chain_id)) if id == chain_char => chain_id,
                        _ => {
                            let chain_type = ChainType::from_opening_record(is_hetero, res_name);
                            let chain_id = system.add_chain(chain_char, chain_type);
                            current_chain = Some((chain_char, chain_id));
                            current_residue = None;
                            chain_id
                        }
                    };

                    let residue_key = (res_seq, insertion_code);
                    let residue_id = match current_residue {
                        Some((key, residue_id)) if key == residue_key => residue_id,
                        _ => {
                            let residue_id = system
                                .add_residue(chain_id, res_seq, insertion_code, res_name)
                                .ok_or_else(|| {
                                    PdbError::MissingRecord(format!("chain '{}'", chain_char))
                                })?;
                            current_residue = Some((residue_key, residue_id));
                            residue_id
                        }
                    };

                    let mut atom = Atom::new(name, residue_id, Point3::new(x, y, z));
                    atom.serial = serial;
                    atom.alt_loc = alt_loc;
                    atom.element = element;
                    atom.occupancy = occupancy;
                    atom.b_factor = b_factor;
                    atom.is_hetero = is_hetero;
                    system.add_atom_to_residue(residue_id, atom);
                }
                _ => {}
            }
        }

        if system.atom_count() == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        if skipped_alt_locs > 0 {
            trace!(
                "Skipped {} atoms at secondary alternate locations.",
                skipped_alt_locs
            );
        }
        debug!(
            "Read {} atoms in {} chains.",
            system.atom_count(),
            system.chains_iter().count()
        );
        Ok(system)
    }

    fn write_to(system: &MolecularSystem, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut serial = 0usize;
        for (chain_id, chain) in system.chains_iter() {
            let mut last_residue = None;
            for atom_id in system.chain_atom_ids(chain_id) {
                let Some(atom) = system.atom(atom_id) else {
                    continue;
                };
                let Some(residue) = system.residue(atom.residue_id) else {
                    continue;
                };
                serial += 1;
                let record_type = if atom.is_hetero { "HETATM" } else { "ATOM" };
                let padded_name = if atom.name.len() < 4 && atom.element.len() == 1 {
                    format!(" {:<3}", atom.name)
                } else {
                    format!("{:<4}", atom.name)
                };
                writeln!(
                    writer,
                    "{:<6}{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                    record_type,
                    serial,
                    padded_name,
                    atom.alt_loc,
                    residue.name,
                    chain.id,
                    residue.residue_number,
                    residue.insertion_code,
                    atom.position.x,
                    atom.position.y,
                    atom.position.z,
                    atom.occupancy,
                    atom.b_factor,
                    atom.element
                )?;
                last_residue = Some(residue);
            }
            if let Some(residue) = last_residue {
                serial += 1;
                writeln!(
                    writer,
                    "TER   {:>5}      {:>3} {}{:>4}{}",
                    serial, residue.name, chain.id, residue.residue_number, residue.insertion_code
                )?;
            }
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
