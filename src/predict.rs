use errors::CfError;
use similarity::Neighbor;
use stats::Ratings;
use utils;

/// Reserved value marking "no prediction possible" in item-based output.
/// Consumers must exclude it, never read it as a rating.
pub const NO_PREDICTION: f64 = -1.0;

/// Weighted mean-centered prediction of user `user`'s rating for `item` from
/// a list of user neighbors. Neighbors that have not rated the item are
/// skipped. The denominator sums signed similarities, so negative-similarity
/// neighbors can cancel it; a zero denominator falls back to the target
/// user's own mean. Results are rounded to 15 decimal places.
pub fn user_based(
    ratings: &Ratings,
    user: u32,
    item: u32,
    neighbors: &[Neighbor],
) -> Result<f64, CfError> {

    let own_mean = ratings.user_mean(user)?;

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for neighbor in neighbors {

        let rating = match ratings.rating_by_user(neighbor.id, item) {
            Some(rating) => rating,
            None => continue,
        };

        let neighbor_mean = ratings.user_mean(neighbor.id)?;

        numerator += neighbor.similarity * (rating - neighbor_mean);
        denominator += neighbor.similarity;
    }

    if denominator == 0.0 {
        return Ok(utils::round_to(own_mean, 15));
    }

    Ok(utils::round_to(own_mean + numerator / denominator, 15))
}

/// Weighted prediction of user `user`'s rating for `item` from a list of
/// item neighbors. Neighbors the user has not rated are skipped. There is no
/// natural fallback value here; a zero denominator yields the sentinel.
/// Results are rounded to 16 decimal places, one more than the user-based
/// formula, to match the reference output.
pub fn item_based(
    ratings: &Ratings,
    user: u32,
    item: u32,
    neighbors: &[Neighbor],
) -> Result<f64, CfError> {

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for neighbor in neighbors {

        let rating = match ratings.rating_of_item(neighbor.id, user) {
            Some(rating) => rating,
            None => continue,
        };

        numerator += neighbor.similarity * rating;
        denominator += neighbor.similarity;
    }

    if denominator == 0.0 {
        return Ok(NO_PREDICTION);
    }

    Ok(utils::round_to(numerator / denominator, 16))
}
