use super::models::OutputFormat;
use exclusivity::engine::config::AlignmentAtoms;

pub struct DefaultsConfig {
    pub contact_cutoff: f64,
    pub confidence_atom: String,
    pub cycles: usize,
    pub outlier_cutoff: f64,
    pub atoms: AlignmentAtoms,
    pub gap_open: i32,
    pub gap_extend: i32,
    pub pair_delimiter: String,
    pub dimer_delimiter: String,
    pub output_directory: String,
    pub format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            contact_cutoff: 4.0,
            confidence_atom: "CA".to_string(),
            cycles: 5,
            outlier_cutoff: 2.0,
            atoms: AlignmentAtoms::All,
            gap_open: 10,
            gap_extend: 1,
            pair_delimiter: "-".to_string(),
            dimer_delimiter: "|".to_string(),
            output_directory: "overlap_results".to_string(),
            format: OutputFormat::Text,
        }
    }
}
