//! Paired home/away score models.

use crate::booster::{BoosterConfig, GradientBoostedRegressor};
use crate::error::ModelError;
use crate::regressor::Regressor;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Predicted final score of one matchup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePrediction {
    /// Home team name
    pub home_team: String,
    /// Away team name
    pub away_team: String,
    /// Predicted home points
    pub home_points: i32,
    /// Predicted away points
    pub away_points: i32,
}

impl ScorePrediction {
    /// Predicted home margin.
    pub const fn margin(&self) -> i32 {
        self.home_points - self.away_points
    }
}

/// Two independently fitted regressors on the same features, one per side.
#[derive(Debug, Clone)]
pub struct DualRegressor<R = GradientBoostedRegressor> {
    home: R,
    away: R,
}

impl DualRegressor<GradientBoostedRegressor> {
    /// Two boosters sharing one set of hyperparameters.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn boosted(config: BoosterConfig) -> Result<Self, ModelError> {
        Ok(Self::new(
            GradientBoostedRegressor::new(config.clone())?,
            GradientBoostedRegressor::new(config)?,
        ))
    }
}

impl<R: Regressor> DualRegressor<R> {
    /// Pair two regressors.
    pub const fn new(home: R, away: R) -> Self {
        Self { home, away }
    }

    /// The home-points model.
    pub const fn home(&self) -> &R {
        &self.home
    }

    /// The away-points model.
    pub const fn away(&self) -> &R {
        &self.away
    }

    /// Fit both models on the same feature matrix.
    ///
    /// # Errors
    /// Returns the first fitting error.
    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        home_points: &Array1<f64>,
        away_points: &Array1<f64>,
    ) -> Result<(), ModelError> {
        self.home.fit(x, home_points)?;
        self.away.fit(x, away_points)?;
        info!(rows = x.nrows(), features = x.ncols(), "fitted home and away models");
        Ok(())
    }

    /// Predict `(home, away)` scores, truncated toward zero.
    ///
    /// # Errors
    /// Returns an error if either model is unfitted or the width differs.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<(i32, i32)>, ModelError> {
        let home = self.home.predict(x)?;
        let away = self.away.predict(x)?;
        Ok(home
            .iter()
            .zip(away.iter())
            .map(|(h, a)| (truncate(*h), truncate(*a)))
            .collect())
    }

    /// Predict named matchups, one per row of `x`.
    ///
    /// # Errors
    /// Returns [`ModelError::DimensionMismatch`] if the team lists do not
    /// match the row count.
    pub fn predict_matchups(
        &self,
        x: &Array2<f64>,
        home_teams: &[String],
        away_teams: &[String],
    ) -> Result<Vec<ScorePrediction>, ModelError> {
        for teams in [home_teams, away_teams] {
            if teams.len() != x.nrows() {
                return Err(ModelError::DimensionMismatch {
                    expected: x.nrows(),
                    actual: teams.len(),
                });
            }
        }

        Ok(self
            .predict(x)?
            .into_iter()
            .zip(home_teams.iter().zip(away_teams))
            .map(|((home_points, away_points), (home, away))| ScorePrediction {
                home_team: home.clone(),
                away_team: away.clone(),
                home_points,
                away_points,
            })
            .collect())
    }
}

/// Truncate toward zero, so 27.9 becomes 27 and -0.5 becomes 0.
fn truncate(value: f64) -> i32 {
    value.trunc() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Returns a fixed value for every row.
    #[derive(Debug, Default)]
    struct Constant {
        value: f64,
        fitted: bool,
    }

    impl Regressor for Constant {
        fn fit(&mut self, _x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
            self.value = y.mean().ok_or(ModelError::EmptyTrainingSet)?;
            self.fitted = true;
            Ok(())
        }

        fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
            if !self.fitted {
                return Err(ModelError::NotFitted);
            }
            Ok(Array1::from_elem(x.nrows(), self.value))
        }

        fn is_fitted(&self) -> bool {
            self.fitted
        }
    }

    #[test]
    fn test_truncation_toward_zero() {
        assert_eq!(truncate(27.9), 27);
        assert_eq!(truncate(27.1), 27);
        assert_eq!(truncate(-0.5), 0);
        assert_eq!(truncate(-3.7), -3);
    }

    #[test]
    fn test_sides_fitted_independently() {
        let mut model = DualRegressor::new(Constant::default(), Constant::default());
        let x = array![[1.0], [2.0]];
        model
            .fit(&x, &array![30.0, 25.8], &array![10.0, 11.0])
            .unwrap();

        // Means 27.9 and 10.5 truncate to 27 and 10.
        assert_eq!(model.predict(&x).unwrap(), vec![(27, 10), (27, 10)]);
        assert!(model.home().is_fitted() && model.away().is_fitted());
    }

    #[test]
    fn test_predict_matchups() {
        let mut model = DualRegressor::new(Constant::default(), Constant::default());
        let x = array![[1.0]];
        model.fit(&x, &array![31.0], &array![17.0]).unwrap();

        let predictions = model
            .predict_matchups(&x, &["Louisville".to_string()], &["Kentucky".to_string()])
            .unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].home_team, "Louisville");
        assert_eq!(predictions[0].away_points, 17);
        assert_eq!(predictions[0].margin(), 14);
    }

    #[test]
    fn test_team_count_mismatch() {
        let mut model = DualRegressor::new(Constant::default(), Constant::default());
        let x = array![[1.0], [2.0]];
        model.fit(&x, &array![1.0, 2.0], &array![1.0, 2.0]).unwrap();

        let result = model.predict_matchups(&x, &["A".to_string()], &["B".to_string()]);
        assert!(matches!(result, Err(ModelError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_unfitted_dual() {
        let model = DualRegressor::boosted(BoosterConfig::default()).unwrap();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(ModelError::NotFitted)
        ));
    }
}
