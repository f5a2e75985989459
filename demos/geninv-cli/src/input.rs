use std::path::Path;

use geninv::InverseParams;
use serde::Deserialize;

/// Error raised while reading the input file.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file is not a valid input document.
    #[error("Invalid input document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Matrix and optional parameter overrides read from a JSON document.
#[derive(Debug, Deserialize)]
pub struct Input {
    /// The matrix as nested rows.
    pub rows: Vec<Vec<f64>>,

    /// Tolerances, missing fields take their default value.
    #[serde(default)]
    pub params: InverseParams,
}

/// Read an [`Input`] document such as `{"rows": [[1, 2], [3, 4]], "params": {"tolerance": 1e-8}}`.
pub fn read_input(path: impl AsRef<Path>) -> Result<Input, InputError> {
    let content = std::fs::read_to_string(path)?;
    let input = serde_json::from_str(&content)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_input() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"rows": [[1, 2], [3, 4]], "params": {{"tolerance": 1e-6}}}}"#)?;

        let input = read_input(file.path())?;
        assert_eq!(input.rows, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(input.params.tolerance, 1e-6);
        assert_eq!(input.params.det_tolerance, 1e-14);
        Ok(())
    }

    #[test]
    fn test_read_input_default_params() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("input.json");
        std::fs::write(&path, r#"{"rows": [[2.0]]}"#)?;

        let input = read_input(&path)?;
        assert_eq!(input.rows, vec![vec![2.0]]);
        assert_eq!(input.params, InverseParams::default());
        Ok(())
    }

    #[test]
    fn test_read_input_errors() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;

        let missing = read_input(tmp_dir.path().join("missing.json"));
        assert!(matches!(missing, Err(InputError::Io(_))));

        let path = tmp_dir.path().join("bad.json");
        std::fs::write(&path, r#"{"params": {}}"#)?;
        assert!(matches!(read_input(&path), Err(InputError::Json(_))));
        Ok(())
    }
}
