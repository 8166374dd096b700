use std::ops::Range;

use errors::CfError;
use predict;
use types::{PredictionMatrix, RatingMatrix};

/// Partition `0..num_entities` into `num_folds` contiguous folds in natural
/// order; the first `num_entities % num_folds` folds hold one entity more.
/// The folds are pairwise disjoint and their union is the full index range,
/// so every entity is held out exactly once.
pub fn kfold_partition(
    num_entities: usize,
    num_folds: usize,
) -> Result<Vec<Range<usize>>, CfError> {

    if num_folds < 1 || num_folds > num_entities {
        return Err(CfError::InvalidArgument(
            format!("fold count must be between 1 and the number of entities ({}), got {}",
                num_entities, num_folds)));
    }

    let base_size = num_entities / num_folds;
    let num_larger_folds = num_entities % num_folds;

    let mut folds = Vec::with_capacity(num_folds);
    let mut start = 0;

    for fold in 0..num_folds {
        let size = if fold < num_larger_folds { base_size + 1 } else { base_size };
        folds.push(start..(start + size));
        start += size;
    }

    Ok(folds)
}

/// Mean absolute error between ground truth and predictions, skipping
/// entries that carry the no-prediction sentinel.
pub fn mean_absolute_error(
    truth: &RatingMatrix,
    predictions: &PredictionMatrix,
) -> Result<f64, CfError> {

    let mut total_absolute_error = 0.0;
    let mut num_compared: u64 = 0;

    for (entity, predicted_row) in predictions.iter().enumerate() {
        for (counterpart, predicted) in predicted_row.iter() {

            if *predicted == predict::NO_PREDICTION {
                continue;
            }

            let actual = truth.get(entity)
                .and_then(|row| row.get(counterpart))
                .ok_or_else(|| CfError::UnknownEntity(
                    format!("no ground truth for entity {} and counterpart {}",
                        entity, counterpart)))?;

            total_absolute_error += (actual - predicted).abs();
            num_compared += 1;
        }
    }

    if num_compared == 0 {
        return Err(CfError::EmptyInput);
    }

    Ok(total_absolute_error / num_compared as f64)
}

#[cfg(test)]
mod tests {

    use std::f64::EPSILON;

    use fnv::FnvHashMap;

    use errors::CfError;
    use eval::{kfold_partition, mean_absolute_error};
    use predict::NO_PREDICTION;
    use types::RatingMatrix;

    fn row(entries: &[(u32, f64)]) -> FnvHashMap<u32, f64> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn partition_covers_every_index_exactly_once() {
        let folds = kfold_partition(10, 3).unwrap();

        assert_eq!(folds.len(), 3);
        assert_eq!(folds[0], 0..4);
        assert_eq!(folds[1], 4..7);
        assert_eq!(folds[2], 7..10);

        let mut seen = vec![0; 10];
        for fold in &folds {
            for index in fold.clone() {
                seen[index] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn partition_with_evenly_divisible_entities() {
        let folds = kfold_partition(10, 5).unwrap();
        assert!(folds.iter().all(|fold| fold.end - fold.start == 2));
    }

    #[test]
    fn partition_rejects_degenerate_fold_counts() {
        assert!(kfold_partition(10, 0).is_err());
        assert!(kfold_partition(3, 5).is_err());
        assert!(kfold_partition(5, 5).is_ok());
    }

    #[test]
    fn mae_of_perfect_predictions_is_zero() {
        let truth: RatingMatrix = vec![row(&[(0, 3.0), (1, 4.0), (2, 2.0)])];
        let predictions = vec![row(&[(0, 3.0), (1, 4.0), (2, 2.0)])];

        assert_eq!(mean_absolute_error(&truth, &predictions).unwrap(), 0.0);
    }

    #[test]
    fn mae_of_a_known_example() {
        // truth [3, 4, 2] against predictions [3, 5, 2] gives 1/3.
        let truth: RatingMatrix = vec![row(&[(0, 3.0), (1, 4.0), (2, 2.0)])];
        let predictions = vec![row(&[(0, 3.0), (1, 5.0), (2, 2.0)])];

        let mae = mean_absolute_error(&truth, &predictions).unwrap();
        assert!((mae - 1.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn mae_excludes_sentinel_entries() {
        let truth: RatingMatrix = vec![row(&[(0, 3.0), (1, 4.0)])];
        let predictions = vec![row(&[(0, 3.0), (1, NO_PREDICTION)])];

        assert_eq!(mean_absolute_error(&truth, &predictions).unwrap(), 0.0);
    }

    #[test]
    fn mae_over_nothing_comparable() {
        let truth: RatingMatrix = vec![row(&[(0, 3.0)])];
        let predictions = vec![row(&[(0, NO_PREDICTION)])];

        assert_eq!(mean_absolute_error(&truth, &predictions), Err(CfError::EmptyInput));
    }
}
