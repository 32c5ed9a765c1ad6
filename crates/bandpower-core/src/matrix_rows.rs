//! Serde adapter storing an `Array2<f64>` as a list of rows
//!
//! Use with `#[serde(with = "bandpower_core::matrix_rows")]`.

use ndarray::Array2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S: Serializer>(matrix: &Array2<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    let rows: Vec<Vec<f64>> = matrix.outer_iter().map(|row| row.to_vec()).collect();
    rows.serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Array2<f64>, D::Error> {
    let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
    from_rows(rows).map_err(D::Error::custom)
}

/// Build a matrix from row vectors, rejecting ragged input
pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, String> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);

    if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(format!(
            "row {} has {} values, expected {}",
            index,
            row.len(),
            n_cols
        ));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::matrix_rows")]
        data: Array2<f64>,
    }

    #[test]
    fn test_rows_layout() {
        let wrapper = Wrapper {
            data: array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"data":[[1.0,2.0,3.0],[4.0,5.0,6.0]]}"#);

        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, wrapper.data);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = serde_json::from_str::<Wrapper>(r#"{"data":[[1.0,2.0],[3.0]]}"#);
        let err = result.err().unwrap().to_string();
        assert!(err.contains("row 1"));
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = from_rows(Vec::new()).unwrap();
        assert_eq!(matrix.dim(), (0, 0));
    }
}
