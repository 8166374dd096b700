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

use fnv::FnvHashMap;

/// One row of a sparse matrix: counterpart index to rating (or prediction).
pub type RatingVector = FnvHashMap<u32, f64>;

/// Sparse matrix keyed by dense entity indices. Depending on the orientation,
/// rows are users and columns items, or the other way around.
pub type RatingMatrix = Vec<RatingVector>;

/// Predictions have the same shape as ratings: entity index to a sparse row
/// of predicted values for its counterparts.
pub type PredictionMatrix = Vec<RatingVector>;

pub type DenseVector = Vec<f64>;

pub fn new_rating_matrix(num_rows: usize) -> RatingMatrix {
    vec![FnvHashMap::with_capacity_and_hasher(0, Default::default()); num_rows]
}
