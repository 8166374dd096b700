extern crate csv;
extern crate fnv;
extern crate scoped_pool;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;

use std::ops::Range;
use std::sync::Mutex;
use std::time::Instant;

use fnv::FnvHashMap;
use scoped_pool::Pool;

pub mod errors;
pub mod eval;
pub mod io;
pub mod predict;
pub mod recommend;
pub mod similarity;
pub mod stats;
pub mod types;
pub mod utils;
mod usage_tests;

use errors::CfError;
use similarity::{Mode, Neighbor, SimilarityCache};
use stats::Ratings;
use types::{PredictionMatrix, RatingVector};

/// k-fold cross-validated prediction of every rating in the dataset.
///
/// Entities (users or items, depending on mode) are enumerated in their
/// natural dictionary order and partitioned into contiguous folds. Each fold
/// is held out in turn; every held-out entity is scored against the training
/// entities, its top-k neighborhood selected, and a rating predicted for
/// every counterpart it has actually rated.
///
/// Held-out entities of a fold are scored in parallel. The similarity cache
/// is shared across the entire run, so a pair first scored in one fold is
/// reused when the reversed pair shows up in a later fold.
pub fn cross_validate(
    ratings: &Ratings,
    mode: Mode,
    num_folds: usize,
    num_neighbors: usize,
    pool_size: usize,
) -> Result<PredictionMatrix, CfError> {

    if num_neighbors < 1 {
        return Err(CfError::InvalidArgument(
            format!("neighborhood size must be at least 1, got {}", num_neighbors)));
    }

    let num_entities = mode.num_entities(ratings);
    let folds = eval::kfold_partition(num_entities, num_folds)?;

    let pool = Pool::new(pool_size);

    let cache = Mutex::new(SimilarityCache::new());
    let failure: Mutex<Option<CfError>> = Mutex::new(None);

    let predictions: Vec<Mutex<RatingVector>> = (0..num_entities)
        .map(|_| Mutex::new(FnvHashMap::default()))
        .collect();

    let evaluation_start = Instant::now();

    for held_out in &folds {

        pool.scoped(|scope| {
            for entity in held_out.clone() {

                let fold = held_out.clone();
                let reference_to_cache = &cache;
                let reference_to_predictions = &predictions;
                let reference_to_failure = &failure;

                scope.execute(move || {
                    let outcome = score_held_out_entity(
                        ratings,
                        mode,
                        entity as u32,
                        &fold,
                        num_entities,
                        num_neighbors,
                        reference_to_cache,
                        reference_to_predictions,
                    );

                    if let Err(failed) = outcome {
                        *reference_to_failure.lock().unwrap() = Some(failed);
                    }
                });
            }
        });
    }

    if let Some(failed) = failure.into_inner().unwrap() {
        return Err(failed);
    }

    let duration_for_evaluation = utils::to_millis(evaluation_start.elapsed());
    println!("{} pairwise similarities computed, {}ms evaluation time",
        cache.lock().unwrap().len(), duration_for_evaluation);

    Ok(predictions.into_iter()
        .map(|row| row.into_inner().unwrap())
        .collect())
}

/// Scores one held-out entity: similarity against every training entity,
/// top-k neighborhood, then a prediction per rated counterpart.
fn score_held_out_entity(
    ratings: &Ratings,
    mode: Mode,
    entity: u32,
    held_out: &Range<usize>,
    num_entities: usize,
    num_neighbors: usize,
    cache: &Mutex<SimilarityCache>,
    predictions: &[Mutex<RatingVector>],
) -> Result<(), CfError> {

    let fold_size = held_out.end - held_out.start;
    let mut candidates = Vec::with_capacity(num_entities - fold_size);

    for other in 0..num_entities as u32 {

        if held_out.contains(&(other as usize)) {
            continue;
        }

        let cached = { cache.lock().unwrap().get(entity, other) };

        let score = match cached {
            Some(score) => score,
            None => {
                // Every task of this fold pairs a distinct held-out entity
                // with training entities, so no other task can be computing
                // this pair; holding the lock during the computation is not
                // needed to keep the cache exactly-once.
                let score = mode.similarity(ratings, entity, other)?;
                cache.lock().unwrap().insert(entity, other, score);
                score
            },
        };

        candidates.push(Neighbor { id: other, similarity: score });
    }

    let neighbors = similarity::top_k(candidates, num_neighbors);

    let rated = mode.counterparts(ratings, entity);
    let mut predicted_row: RatingVector =
        FnvHashMap::with_capacity_and_hasher(rated.len(), Default::default());

    for counterpart in rated.keys() {
        let predicted = match mode {
            Mode::UserBased =>
                predict::user_based(ratings, entity, *counterpart, &neighbors)?,
            Mode::ItemBased =>
                predict::item_based(ratings, *counterpart, entity, &neighbors)?,
        };
        predicted_row.insert(*counterpart, predicted);
    }

    *predictions[entity as usize].lock().unwrap() = predicted_row;

    Ok(())
}

#[cfg(test)]
mod tests {

    use cross_validate;
    use eval;
    use similarity::Mode;
    use stats::{DataDictionary, Ratings};

    fn ratings_from(triples: &[(&str, &str, f64)]) -> Ratings {
        let owned: Vec<(String, String, f64)> = triples.iter()
            .map(|&(user, item, rating)| (user.to_string(), item.to_string(), rating))
            .collect();
        let data_dict = DataDictionary::from(owned.iter());
        Ratings::from_triples(&owned, &data_dict).unwrap()
    }

    fn fixture() -> Ratings {
        ratings_from(&[
            ("u1", "m1", 5.0), ("u1", "m2", 3.0), ("u1", "m3", 4.0),
            ("u2", "m1", 4.0), ("u2", "m2", 2.0), ("u2", "m3", 5.0),
            ("u3", "m1", 5.0), ("u3", "m2", 3.0), ("u3", "m4", 2.0),
            ("u4", "m2", 4.0), ("u4", "m3", 3.0), ("u4", "m4", 1.0),
        ])
    }

    #[test]
    fn cross_validation_predicts_every_rated_entry() {
        let ratings = fixture();

        let predictions = cross_validate(&ratings, Mode::UserBased, 2, 2, 2).unwrap();

        assert_eq!(predictions.len(), ratings.num_users());
        for (user, predicted_row) in predictions.iter().enumerate() {
            let rated = ratings.items_rated_by(user as u32);
            assert_eq!(predicted_row.len(), rated.len());
            for item in rated.keys() {
                assert!(predicted_row.contains_key(item));
            }
        }
    }

    #[test]
    fn cross_validated_mae_is_finite_and_non_negative() {
        let ratings = fixture();

        let predictions = cross_validate(&ratings, Mode::UserBased, 2, 2, 2).unwrap();
        let mae = eval::mean_absolute_error(ratings.by_user(), &predictions).unwrap();

        assert!(mae.is_finite());
        assert!(mae >= 0.0);
    }

    #[test]
    fn item_mode_covers_every_item() {
        let ratings = fixture();

        let predictions = cross_validate(&ratings, Mode::ItemBased, 2, 2, 2).unwrap();

        assert_eq!(predictions.len(), ratings.num_items());
        for (item, predicted_row) in predictions.iter().enumerate() {
            assert_eq!(predicted_row.len(), ratings.users_rating(item as u32).len());
        }
    }

    #[test]
    fn rejects_an_empty_neighborhood_size() {
        let ratings = fixture();
        assert!(cross_validate(&ratings, Mode::UserBased, 2, 0, 2).is_err());
    }
}
