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

#[cfg(test)]
mod tests {

    use cross_validate;
    use eval;
    use recommend;
    use similarity::Mode;
    use stats::{DataDictionary, Ratings, Renaming};

    #[test]
    fn programmatic_usage() {

        /* Our input data comprises of explicit ratings that users gave to
           items. The identifiers can be strings of arbitrary length and
           structure; ratings are small positive integers. */
        let triples = vec![
            ("alice".to_string(), "inception".to_string(), 5.0),
            ("alice".to_string(), "vertigo".to_string(), 3.0),
            ("alice".to_string(), "alien".to_string(), 4.0),
            ("bob".to_string(), "inception".to_string(), 4.0),
            ("bob".to_string(), "vertigo".to_string(), 2.0),
            ("bob".to_string(), "alien".to_string(), 5.0),
            ("charles".to_string(), "inception".to_string(), 5.0),
            ("charles".to_string(), "vertigo".to_string(), 3.0),
            ("charles".to_string(), "brazil".to_string(), 2.0),
            ("dora".to_string(), "vertigo".to_string(), 4.0),
            ("dora".to_string(), "alien".to_string(), 3.0),
            ("dora".to_string(), "brazil".to_string(), 1.0),
        ];

        /* Internally, we use consecutive integer ids. We read the ratings
           once to build a data dictionary that maps the string identifiers
           to integer indices and carries basic statistics of the data. */
        let data_dict = DataDictionary::from(triples.iter());

        println!(
            "Found {} ratings from {} users for {} items.",
            data_dict.num_ratings(),
            data_dict.num_users(),
            data_dict.num_items(),
        );

        /* The rating store keeps the sparse matrix in both orientations,
           together with the mean rating of every user. */
        let ratings = Ratings::from_triples(&triples, &data_dict).unwrap();

        /* Cross-validate rating predictions: two folds, a neighborhood of
           two, user mode, two worker threads. */
        let predictions = cross_validate(&ratings, Mode::UserBased, 2, 2, 2).unwrap();

        /* Every rating in the dataset was held out exactly once, so the
           prediction table covers the whole matrix. */
        for (user, predicted_row) in predictions.iter().enumerate() {
            assert_eq!(predicted_row.len(), ratings.items_rated_by(user as u32).len());
        }

        let mae = eval::mean_absolute_error(ratings.by_user(), &predictions).unwrap();
        println!("mae = {}", mae);
        assert!(mae.is_finite());

        /* Recommend unrated items for alice. The renaming data structure
           maps the integer ids back to the original string ids. */
        let recommendations =
            recommend::recommend(&ratings, Mode::UserBased, 0, 2, 10).unwrap();

        let renaming = Renaming::from(data_dict);

        println!("Recommendations for alice:");
        for item_index in recommendations.iter() {
            println!("\t{}", renaming.item_name(*item_index));
        }

        /* Alice has not seen brazil yet, and it is the only unrated item. */
        assert_eq!(recommendations.len(), 1);
        assert_eq!(renaming.item_name(recommendations[0]), "brazil");
    }
}
