use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    forest::RandomForest,
    metrics::{mean_squared_error, r2_score},
    split::train_test_split,
    FeatureRow,
};
use crate::{
    config::TrainingConfig,
    data::types::{CondensedRecord, SongFeatures, FEATURE_NAMES},
    error::{DataError, Result, TrainingError},
};

/// Minimum number of condensed rows needed to split and fit
pub const MIN_TRAINING_ROWS: usize = 2;

/// Held-out evaluation of a fitted model
///
/// Diagnostic only: a poor score never prevents the model from being saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub r2: f64,
    pub mse: f64,
    pub n_estimators: usize,
    pub seed: u64,
}

/// Persisted regression artifact mapping song features to average pace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceModel {
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
    pub report: TrainingReport,
    forest: RandomForest,
}

impl PaceModel {
    /// Predict average pace for a features record (missing values count as 0)
    pub fn predict(&self, features: &SongFeatures) -> f64 {
        self.predict_row(&features.numeric_vector())
    }

    pub fn predict_row(&self, row: &FeatureRow) -> f64 {
        self.forest.predict_row(row)
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Reject an artifact whose inputs or trees this build cannot evaluate
    pub fn validate(&self) -> Result<()> {
        if self.feature_names != FEATURE_NAMES {
            return Err(DataError::Malformed {
                source_name: "pace model".to_string(),
                reason: format!("expected features {:?}, found {:?}", FEATURE_NAMES, self.feature_names),
            }
            .into());
        }

        self.forest.validate().map_err(|reason| DataError::Malformed {
            source_name: "pace model".to_string(),
            reason,
        })?;
        Ok(())
    }
}

/// Fits and evaluates the pace model
pub struct RegressionTrainer {
    config: TrainingConfig,
}

impl RegressionTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Feature matrix (tempo, danceability, energy; 0 when missing) and target
    pub fn prepare(records: &[CondensedRecord]) -> Result<(Vec<FeatureRow>, Vec<f64>)> {
        let mut x = Vec::with_capacity(records.len());
        let mut y = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if !record.avg_pace().is_finite() {
                return Err(DataError::InvalidValue {
                    index,
                    field: "avg_pace".to_string(),
                    value: record.avg_pace().to_string(),
                }
                .into());
            }

            x.push(record.features.numeric_vector());
            y.push(record.avg_pace());
        }

        Ok((x, y))
    }

    /// Split, fit on the training partition, and evaluate on the held-out one
    pub fn train(&self, records: &[CondensedRecord]) -> Result<PaceModel> {
        if records.len() < MIN_TRAINING_ROWS {
            return Err(TrainingError::InsufficientData {
                rows: records.len(),
                required: MIN_TRAINING_ROWS,
            }
            .into());
        }

        let (x, y) = Self::prepare(records)?;
        let split = train_test_split(records.len(), self.config.test_fraction, self.config.seed)?;

        let x_train: Vec<FeatureRow> = split.train.iter().map(|&i| x[i]).collect();
        let y_train: Vec<f64> = split.train.iter().map(|&i| y[i]).collect();
        let x_test: Vec<FeatureRow> = split.test.iter().map(|&i| x[i]).collect();
        let y_test: Vec<f64> = split.test.iter().map(|&i| y[i]).collect();

        debug!(
            "Fitting {} trees on {} rows ({} held out) with {} threads",
            self.config.n_estimators,
            x_train.len(),
            x_test.len(),
            self.config.threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map_err(|e| TrainingError::ThreadPool { reason: e.to_string() })?;

        let params = self.config.forest_params();
        let forest = pool.install(|| RandomForest::fit(&x_train, &y_train, params));

        let y_pred = forest.predict(&x_test);
        let report = TrainingReport {
            rows: records.len(),
            train_rows: x_train.len(),
            test_rows: x_test.len(),
            r2: r2_score(&y_test, &y_pred),
            mse: mean_squared_error(&y_test, &y_pred),
            n_estimators: forest.n_estimators(),
            seed: self.config.seed,
        };

        info!("Model R^2: {:.3}, MSE: {:.3}", report.r2, report.mse);

        Ok(PaceModel {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            trained_at: Utc::now(),
            report,
            forest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaceError;
    use crate::testing::{condensed, tempo_driven_table};

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            n_estimators: 25,
            threads: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_row_is_training_error() {
        let trainer = RegressionTrainer::new(small_config());
        let result = trainer.train(&[condensed("Solo - One", 3.0, 1, 120.0, 0.5, 0.5)]);

        assert!(matches!(
            result,
            Err(PaceError::Training(TrainingError::InsufficientData { rows: 1, required: 2 }))
        ));
    }

    #[test]
    fn test_two_rows_always_train() {
        let trainer = RegressionTrainer::new(small_config());
        let model = trainer
            .train(&[
                condensed("A - X", 2.0, 1, 90.0, 0.2, 0.3),
                condensed("B - Y", 4.0, 2, 170.0, 0.8, 0.9),
            ])
            .unwrap();

        assert_eq!(model.report.train_rows, 1);
        assert_eq!(model.report.test_rows, 1);
        assert!(model.report.r2.is_finite());
    }

    #[test]
    fn test_report_and_prediction_on_tempo_signal() {
        let trainer = RegressionTrainer::new(small_config());
        let model = trainer.train(&tempo_driven_table(60)).unwrap();

        assert_eq!(model.report.rows, 60);
        assert_eq!(model.report.test_rows, 12);
        assert_eq!(model.report.train_rows, 48);
        assert_eq!(model.report.n_estimators, 25);
        assert!(model.report.r2 > 0.8, "r2 = {}", model.report.r2);
        assert_eq!(model.feature_names, vec!["bpm", "danceability", "energy"]);

        let slow = model.predict(&SongFeatures { tempo: Some(90.0), ..Default::default() });
        let fast = model.predict(&SongFeatures { tempo: Some(350.0), ..Default::default() });
        assert!(slow < fast);
    }

    #[test]
    fn test_training_is_reproducible() {
        let table = tempo_driven_table(30);
        let a = RegressionTrainer::new(small_config()).train(&table).unwrap();
        let b = RegressionTrainer::new(TrainingConfig { threads: 1, ..small_config() })
            .train(&table)
            .unwrap();

        assert_eq!(a.forest(), b.forest());
        assert_eq!(a.report.mse, b.report.mse);
    }

    #[test]
    fn test_missing_features_count_as_zero() {
        let mut table = tempo_driven_table(10);
        table[0].features = SongFeatures::empty();

        let (x, _) = RegressionTrainer::prepare(&table).unwrap();
        assert_eq!(x[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_model_serde_roundtrip() {
        let model = RegressionTrainer::new(small_config()).train(&tempo_driven_table(12)).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: PaceModel = serde_json::from_str(&json).unwrap();

        let sample_row = [130.0, 0.4, 0.6];
        assert!((restored.predict_row(&sample_row) - model.predict_row(&sample_row)).abs() < 1e-9);
        assert_eq!(restored.report.rows, 12);
    }

    #[test]
    fn test_trained_model_validates() {
        let model = RegressionTrainer::new(small_config()).train(&tempo_driven_table(12)).unwrap();
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_hand_edited_model_is_rejected() {
        let model = RegressionTrainer::new(small_config()).train(&tempo_driven_table(12)).unwrap();
        let json = serde_json::to_string(&model).unwrap();

        let broken = json.replacen("\"feature\":0", "\"feature\":9", 1);
        assert_ne!(broken, json);
        let restored: PaceModel = serde_json::from_str(&broken).unwrap();

        assert!(matches!(
            restored.validate(),
            Err(PaceError::Data(DataError::Malformed { .. }))
        ));
        assert!(restored.predict_row(&[130.0, 0.4, 0.6]).is_finite());
    }
}
