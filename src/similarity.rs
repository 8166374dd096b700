/**
 * neighborec
 * Copyright (C) 2019 the neighborec developers
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::cmp::Ordering;
use std::fmt;

use fnv::FnvHashMap;

use errors::CfError;
use stats::{Ratings, Renaming};
use types::{RatingMatrix, RatingVector};
use utils;

/// The two neighborhood strategies. Selected once at configuration time;
/// everything downstream dispatches through it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    UserBased,
    ItemBased,
}

impl Mode {

    pub fn parse(raw: &str) -> Result<Mode, CfError> {
        match raw {
            "user" => Ok(Mode::UserBased),
            "item" => Ok(Mode::ItemBased),
            other => Err(CfError::InvalidMode(other.to_string())),
        }
    }

    /// Number of entities (users or items) this mode evaluates over.
    pub fn num_entities(&self, ratings: &Ratings) -> usize {
        match *self {
            Mode::UserBased => ratings.num_users(),
            Mode::ItemBased => ratings.num_items(),
        }
    }

    /// Pairwise similarity between two entities of this mode. Self-similarity
    /// is outside the domain of both metrics.
    pub fn similarity(&self, ratings: &Ratings, a: u32, b: u32) -> Result<f64, CfError> {
        if a == b {
            return Err(CfError::InvalidArgument(
                format!("self-similarity queried for entity {}", a)));
        }
        match *self {
            Mode::UserBased => pearson(ratings, a, b),
            Mode::ItemBased => adjusted_cosine(ratings, a, b),
        }
    }

    /// The sparse row of counterparts an entity has ratings for: items in
    /// user mode, users in item mode.
    pub fn counterparts<'a>(&self, ratings: &'a Ratings, entity: u32) -> &'a RatingVector {
        match *self {
            Mode::UserBased => ratings.items_rated_by(entity),
            Mode::ItemBased => ratings.users_rating(entity),
        }
    }

    /// The ground-truth matrix in this mode's orientation.
    pub fn ground_truth<'a>(&self, ratings: &'a Ratings) -> &'a RatingMatrix {
        match *self {
            Mode::UserBased => ratings.by_user(),
            Mode::ItemBased => ratings.by_item(),
        }
    }

    pub fn entity_name<'a>(&self, renaming: &'a Renaming, index: u32) -> &'a str {
        match *self {
            Mode::UserBased => renaming.user_name(index),
            Mode::ItemBased => renaming.item_name(index),
        }
    }

    pub fn counterpart_name<'a>(&self, renaming: &'a Renaming, index: u32) -> &'a str {
        match *self {
            Mode::UserBased => renaming.item_name(index),
            Mode::ItemBased => renaming.user_name(index),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Mode::UserBased => write!(f, "user"),
            Mode::ItemBased => write!(f, "item"),
        }
    }
}

/// Pearson correlation between two users over the items both have rated.
/// An empty overlap or zero variance on either side yields 0, never NaN.
pub fn pearson(ratings: &Ratings, u1: u32, u2: u32) -> Result<f64, CfError> {

    let ratings_u1 = ratings.items_rated_by(u1);
    let ratings_u2 = ratings.items_rated_by(u2);

    let mean1 = ratings.user_mean(u1)?;
    let mean2 = ratings.user_mean(u2)?;

    let mut numerator = 0.0;
    let mut denominator1 = 0.0;
    let mut denominator2 = 0.0;
    let mut overlap_is_empty = true;

    for (item, ra) in ratings_u1.iter() {
        if let Some(rb) = ratings_u2.get(item) {
            overlap_is_empty = false;

            let centered_a = ra - mean1;
            let centered_b = rb - mean2;

            numerator += centered_a * centered_b;
            denominator1 += centered_a * centered_a;
            denominator2 += centered_b * centered_b;
        }
    }

    if overlap_is_empty || denominator1 == 0.0 || denominator2 == 0.0 {
        return Ok(0.0);
    }

    Ok(utils::round_to(numerator / (denominator1.sqrt() * denominator2.sqrt()), 15))
}

/// Adjusted cosine similarity between two items over the users who rated
/// both. Each rating is centered on the mean of the user who gave it.
pub fn adjusted_cosine(ratings: &Ratings, m1: u32, m2: u32) -> Result<f64, CfError> {

    let ratings_m1 = ratings.users_rating(m1);
    let ratings_m2 = ratings.users_rating(m2);

    let mut numerator = 0.0;
    let mut denominator1 = 0.0;
    let mut denominator2 = 0.0;
    let mut overlap_is_empty = true;

    for (user, ra) in ratings_m1.iter() {
        if let Some(rb) = ratings_m2.get(user) {
            overlap_is_empty = false;

            let mean = ratings.user_mean(*user)?;
            let centered_a = ra - mean;
            let centered_b = rb - mean;

            numerator += centered_a * centered_b;
            denominator1 += centered_a * centered_a;
            denominator2 += centered_b * centered_b;
        }
    }

    if overlap_is_empty || denominator1 == 0.0 || denominator2 == 0.0 {
        return Ok(0.0);
    }

    Ok(utils::round_to(numerator / (denominator1.sqrt() * denominator2.sqrt()), 15))
}

/// Memoized pairwise similarities with unordered-pair keys: `(a,b)` and
/// `(b,a)` denote the same entry and only one of them is ever stored. Owned
/// by the evaluation or recommendation session, never process-wide state.
/// Grows to one entry per queried pair, O(entities²) in the worst case.
pub struct SimilarityCache {
    scores: FnvHashMap<(u32, u32), f64>,
}

impl SimilarityCache {

    pub fn new() -> Self {
        SimilarityCache { scores: FnvHashMap::default() }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn get(&self, a: u32, b: u32) -> Option<f64> {
        self.scores.get(&(a, b))
            .or_else(|| self.scores.get(&(b, a)))
            .cloned()
    }

    pub fn insert(&mut self, a: u32, b: u32, score: f64) {
        self.scores.insert((a, b), score);
    }
}

/// A similarity-scored candidate neighbor.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub id: u32,
    pub similarity: f64,
}

/// The k most similar candidates, sorted descending. The sort is stable, so
/// candidates with equal similarity keep their enumeration order; fewer than
/// k candidates are all returned. Similarities are never NaN (degenerate
/// cases resolve to 0), which makes the comparator total in practice.
pub fn top_k(mut candidates: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    candidates.sort_by(|a, b| {
        b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal)
    });
    candidates.truncate(k);
    candidates
}
