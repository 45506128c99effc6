//! Conversion from polars frames to ndarray inputs for the models.

use crate::error::{FeatureError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| FeatureError::MissingColumn(name.to_string()))?
        .cast(&DataType::Float64)?;

    Ok(column
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Build a row-major `(rows, columns.len())` feature matrix.
///
/// Nulls become `NaN`.
///
/// # Errors
/// Returns [`FeatureError::MissingColumn`] if a column is absent.
pub fn to_matrix(df: &DataFrame, columns: &[String]) -> Result<Array2<f64>> {
    let rows = df.height();
    let mut matrix = Array2::<f64>::from_elem((rows, columns.len()), f64::NAN);

    for (j, name) in columns.iter().enumerate() {
        let values = float_values(df, name)?;
        for (i, value) in values.into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }

    Ok(matrix)
}

/// Extract a single numeric column. Nulls become `NaN`.
///
/// # Errors
/// Returns [`FeatureError::MissingColumn`] if the column is absent.
pub fn to_vector(df: &DataFrame, name: &str) -> Result<Array1<f64>> {
    Ok(Array1::from(float_values(df, name)?))
}

/// Extract a string column as owned values.
///
/// # Errors
/// Returns [`FeatureError::MissingColumn`] if the column is absent.
pub fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| FeatureError::MissingColumn(name.to_string()))?
        .cast(&DataType::String)?;

    Ok(column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df!(
            "a" => [Some(1.0), None, Some(3.0)],
            "b" => [4.0, 5.0, 6.0],
            "team" => [Some("Auburn"), None, Some("LSU")],
        )
        .unwrap()
    }

    #[test]
    fn test_to_matrix_layout() {
        let m = to_matrix(&frame(), &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(m.dim(), (3, 2));
        assert_eq!(m[[0, 0]], 1.0);
        assert!(m[[1, 0]].is_nan());
        assert_eq!(m[[2, 1]], 6.0);
    }

    #[test]
    fn test_to_vector() {
        let v = to_vector(&frame(), "b").unwrap();
        assert_eq!(v.to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_string_column() {
        let teams = string_column(&frame(), "team").unwrap();
        assert_eq!(
            teams,
            vec![Some("Auburn".to_string()), None, Some("LSU".to_string())]
        );
    }

    #[test]
    fn test_missing_column() {
        assert!(matches!(
            to_vector(&frame(), "c"),
            Err(FeatureError::MissingColumn(_))
        ));
    }
}
