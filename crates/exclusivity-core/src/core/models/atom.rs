use super::ids::ResidueId;
use nalgebra::Point3;

const BACKBONE_ATOM_NAMES: [&str; 4] = ["N", "CA", "C", "O"];

/// Represents an atom read from a coordinate file.
///
/// Besides its position, an atom carries the per-atom attributes a comparison reads back:
/// the B-factor column (which holds the pLDDT confidence score in predicted models) and the
/// occupancy. The parent residue is referenced by its stable ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "OG1").
    pub name: String,
    /// The alternate location indicator, or `' '` when absent.
    pub alt_loc: char,
    /// The chemical element symbol (e.g., "C", "N", "SE").
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The occupancy column.
    pub occupancy: f64,
    /// The temperature factor column; pLDDT for predicted structures.
    pub b_factor: f64,
    /// Whether the atom came from a HETATM record.
    pub is_hetero: bool,
}

impl Atom {
    /// Creates a new `Atom` with default values for the per-atom attributes.
    ///
    /// The element is inferred from the atom name; occupancy defaults to 1.0 and the
    /// B-factor to 0.0.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            alt_loc: ' ',
            element: infer_element(name),
            residue_id,
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            is_hetero: false,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.as_str(), "H" | "D")
    }

    pub fn is_backbone(&self) -> bool {
        BACKBONE_ATOM_NAMES.contains(&self.name.as_str())
    }
}

/// Infers an element symbol from a PDB atom name.
///
/// Leading digits are skipped (e.g. "1HB" is a hydrogen). Two-letter symbols are only
/// recognized for the handful of elements common in protein files, so that "CA" stays carbon.
pub fn infer_element(atom_name: &str) -> String {
    let trimmed = atom_name.trim_start_matches(|c: char| c.is_ascii_digit());
    let upper = trimmed.to_ascii_uppercase();
    for two_letter in ["SE", "ZN", "MG", "FE", "CL", "BR", "MN", "CU", "NA"] {
        if upper == two_letter {
            return upper;
        }
    }
    upper
        .chars()
        .next()
        .map(|c| c.to_string())
        .unwrap_or_default()
}
