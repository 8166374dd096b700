use std::cmp::Ordering;

use errors::CfError;
use predict;
use similarity;
use similarity::{Mode, Neighbor, SimilarityCache};
use stats::Ratings;

/// Top-N recommendation of unrated items for a single target user.
///
/// User mode ranks the other users once and reuses that neighborhood for
/// every candidate item. Item mode builds a neighborhood per candidate item,
/// memoizing pairwise similarities in a session-local cache (candidate items
/// pair with the full item set, so symmetric pairs do recur). Candidates
/// whose prediction carries the no-prediction sentinel are dropped before
/// ranking.
pub fn recommend(
    ratings: &Ratings,
    mode: Mode,
    user: u32,
    num_neighbors: usize,
    how_many: usize,
) -> Result<Vec<u32>, CfError> {

    let rated = ratings.items_rated_by(user);
    let unrated: Vec<u32> = (0..ratings.num_items() as u32)
        .filter(|item| !rated.contains_key(item))
        .collect();

    let mut scored: Vec<(u32, f64)> = Vec::with_capacity(unrated.len());

    match mode {

        Mode::UserBased => {

            let mut candidates = Vec::with_capacity(ratings.num_users() - 1);
            for other in 0..ratings.num_users() as u32 {
                if other != user {
                    candidates.push(Neighbor {
                        id: other,
                        similarity: similarity::pearson(ratings, user, other)?,
                    });
                }
            }
            let neighbors = similarity::top_k(candidates, num_neighbors);

            for item in &unrated {
                let predicted = predict::user_based(ratings, user, *item, &neighbors)?;
                scored.push((*item, predicted));
            }
        },

        Mode::ItemBased => {

            let mut cache = SimilarityCache::new();

            for item in &unrated {

                let mut candidates = Vec::with_capacity(ratings.num_items() - 1);
                for other in 0..ratings.num_items() as u32 {
                    if other == *item {
                        continue;
                    }

                    let score = match cache.get(*item, other) {
                        Some(score) => score,
                        None => {
                            let score = similarity::adjusted_cosine(ratings, *item, other)?;
                            cache.insert(*item, other, score);
                            score
                        },
                    };

                    candidates.push(Neighbor { id: other, similarity: score });
                }

                let neighbors = similarity::top_k(candidates, num_neighbors);
                let predicted = predict::item_based(ratings, user, *item, &neighbors)?;
                scored.push((*item, predicted));
            }
        },
    }

    scored.retain(|&(_, predicted)| predicted != predict::NO_PREDICTION);

    // Stable descending sort, so equally scored items keep enumeration order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(how_many);

    Ok(scored.into_iter().map(|(item, _)| item).collect())
}
