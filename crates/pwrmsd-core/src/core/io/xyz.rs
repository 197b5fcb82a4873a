use crate::core::io::traits::GeometryFile;
use crate::core::models::atom::Atom;
use crate::core::models::conformer::Conformer;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("File declares {declared} atoms but contains {found}")]
    AtomCount { declared: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Missing atom count line")]
    MissingCount,
    #[error("Invalid atom count '{0}'")]
    InvalidCount(String),
    #[error("Atom record needs an element and three coordinates")]
    TooFewColumns,
    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

/// Reader/writer for the plain XYZ format.
///
/// Line 1 holds the atom count, line 2 a free comment, and each following line an
/// element symbol and three Cartesian coordinates in Angstroms. Anything after the
/// declared number of atoms is ignored.
pub struct XyzFile;

impl GeometryFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Conformer, Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().transpose()?.ok_or(XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::MissingCount,
        })?;
        let declared: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::InvalidCount(count_line.trim().to_string()),
        })?;

        let comment = lines.next().transpose()?.unwrap_or_default();

        let mut atoms = Vec::with_capacity(declared);
        for (offset, line_res) in lines.enumerate() {
            if atoms.len() == declared {
                break;
            }
            let line = line_res?;
            let line_num = offset + 3;
            if line.trim().is_empty() {
                continue;
            }
            atoms.push(parse_atom_line(&line, line_num)?);
        }

        if atoms.len() != declared {
            return Err(XyzError::AtomCount {
                declared,
                found: atoms.len(),
            });
        }

        Ok(Conformer::new(comment.trim_end(), atoms))
    }

    fn write_to(conformer: &Conformer, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", conformer.len())?;
        writeln!(writer, "{}", conformer.comment)?;
        for atom in &conformer.atoms {
            writeln!(
                writer,
                "{:<2} {:>14.8} {:>14.8} {:>14.8}",
                atom.element, atom.position.x, atom.position.y, atom.position.z
            )?;
        }
        Ok(())
    }
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, XyzError> {
    let mut fields = line.split_whitespace();
    let (Some(element), Some(x), Some(y), Some(z)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::TooFewColumns,
        });
    };

    let parse = |value: &str| -> Result<f64, XyzError> {
        value.parse().map_err(|_| XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::InvalidCoordinate(value.to_string()),
        })
    };

    Ok(Atom::new(
        element,
        Point3::new(parse(x)?, parse(y)?, parse(z)?),
    ))
}
