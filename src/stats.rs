use fnv::FnvHashMap;

use errors::CfError;
use types;
use types::{DenseVector, RatingMatrix, RatingVector};

/// Maps the string identifiers found in the input data to dense, consecutive
/// integer indices, in order of first appearance. That order is also the
/// deterministic entity enumeration order used by cross-validation.
pub struct DataDictionary {
    user_dict: FnvHashMap<String, u32>,
    item_dict: FnvHashMap<String, u32>,
    num_ratings: u64,
}

impl DataDictionary {

    pub fn num_users(&self) -> usize {
        self.user_dict.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_dict.len()
    }

    pub fn num_ratings(&self) -> u64 {
        self.num_ratings
    }

    pub fn user_index(&self, name: &str) -> Option<u32> {
        self.user_dict.get(name).cloned()
    }

    pub fn item_index(&self, name: &str) -> Option<u32> {
        self.item_dict.get(name).cloned()
    }
}

impl<'a, T> From<T> for DataDictionary
    where T: Iterator<Item = &'a (String, String, f64)> {

    fn from(triples: T) -> Self {

        let mut user_index: u32 = 0;
        let mut user_dict: FnvHashMap<String, u32> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        let mut item_index: u32 = 0;
        let mut item_dict: FnvHashMap<String, u32> =
            FnvHashMap::with_capacity_and_hasher(100, Default::default());

        let mut num_ratings: u64 = 0;

        for &(ref user, ref item, _rating) in triples {

            if !user_dict.contains_key(user) {
                user_dict.insert(user.clone(), user_index);
                user_index += 1;
            }

            if !item_dict.contains_key(item) {
                item_dict.insert(item.clone(), item_index);
                item_index += 1;
            }

            num_ratings += 1;
        }

        DataDictionary { user_dict, item_dict, num_ratings }
    }
}

/// Reverse index from dense indices back to the original identifiers, used
/// when writing output.
pub struct Renaming {
    user_names: FnvHashMap<u32, String>,
    item_names: FnvHashMap<u32, String>,
}

impl Renaming {

    pub fn user_name(&self, user_index: u32) -> &str {
        &self.user_names[&user_index]
    }

    pub fn item_name(&self, item_index: u32) -> &str {
        &self.item_names[&item_index]
    }
}

impl From<DataDictionary> for Renaming {

    fn from(data_dict: DataDictionary) -> Self {

        let mut user_names: FnvHashMap<u32, String> =
            FnvHashMap::with_capacity_and_hasher(data_dict.num_users(), Default::default());

        let mut item_names: FnvHashMap<u32, String> =
            FnvHashMap::with_capacity_and_hasher(data_dict.num_items(), Default::default());

        for (user, user_id) in data_dict.user_dict.into_iter() {
            user_names.insert(user_id, user);
        }

        for (item, item_id) in data_dict.item_dict.into_iter() {
            item_names.insert(item_id, item);
        }

        Renaming { user_names, item_names }
    }
}

/// The sparse rating matrix in both orientations, plus the per-user mean
/// rating. Built once from the loaded triples and immutable afterwards.
///
/// The mean table is always indexed by user: item-based similarity centers
/// every rating on the mean of the user who gave it, not on an item mean.
pub struct Ratings {
    by_user: RatingMatrix,
    by_item: RatingMatrix,
    user_means: DenseVector,
}

impl Ratings {

    pub fn from_triples(
        triples: &[(String, String, f64)],
        data_dict: &DataDictionary,
    ) -> Result<Ratings, CfError> {

        let mut by_user = types::new_rating_matrix(data_dict.num_users());
        let mut by_item = types::new_rating_matrix(data_dict.num_items());

        for &(ref user, ref item, rating) in triples {

            let user_index = data_dict.user_index(user)
                .ok_or_else(|| CfError::UnknownEntity(user.clone()))?;
            let item_index = data_dict.item_index(item)
                .ok_or_else(|| CfError::UnknownEntity(item.clone()))?;

            // A duplicated (user, item) pair keeps the last rating seen,
            // identically in both orientations.
            by_user[user_index as usize].insert(item_index, rating);
            by_item[item_index as usize].insert(user_index, rating);
        }

        // Every user in the dictionary has at least one rating, so every row
        // is non-empty here.
        let user_means = by_user.iter()
            .map(|row| row.values().sum::<f64>() / row.len() as f64)
            .collect();

        Ok(Ratings { by_user, by_item, user_means })
    }

    pub fn num_users(&self) -> usize {
        self.by_user.len()
    }

    pub fn num_items(&self) -> usize {
        self.by_item.len()
    }

    /// Mean of all ratings the user has given.
    pub fn user_mean(&self, user: u32) -> Result<f64, CfError> {
        self.user_means.get(user as usize)
            .cloned()
            .ok_or_else(|| CfError::UnknownEntity(format!("user index {}", user)))
    }

    pub fn rating_by_user(&self, user: u32, item: u32) -> Option<f64> {
        self.by_user.get(user as usize).and_then(|row| row.get(&item)).cloned()
    }

    pub fn rating_of_item(&self, item: u32, user: u32) -> Option<f64> {
        self.by_item.get(item as usize).and_then(|row| row.get(&user)).cloned()
    }

    /// All (item, rating) entries of a user, the overlap key set for
    /// user-based similarity. The index must come from the data dictionary.
    pub fn items_rated_by(&self, user: u32) -> &RatingVector {
        &self.by_user[user as usize]
    }

    /// All (user, rating) entries of an item, the overlap key set for
    /// item-based similarity.
    pub fn users_rating(&self, item: u32) -> &RatingVector {
        &self.by_item[item as usize]
    }

    pub fn by_user(&self) -> &RatingMatrix {
        &self.by_user
    }

    pub fn by_item(&self) -> &RatingMatrix {
        &self.by_item
    }
}

#[cfg(test)]
mod tests {

    use stats::{DataDictionary, Ratings, Renaming};

    fn triples() -> Vec<(String, String, f64)> {
        vec![
            ("alice".to_string(), "inception".to_string(), 4.0),
            ("alice".to_string(), "vertigo".to_string(), 2.0),
            ("bob".to_string(), "inception".to_string(), 3.0),
            ("bob".to_string(), "alien".to_string(), 5.0),
        ]
    }

    #[test]
    fn dictionary_assigns_consecutive_indices() {
        let triples = triples();
        let data_dict = DataDictionary::from(triples.iter());

        assert_eq!(data_dict.num_users(), 2);
        assert_eq!(data_dict.num_items(), 3);
        assert_eq!(data_dict.num_ratings(), 4);

        assert_eq!(data_dict.user_index("alice"), Some(0));
        assert_eq!(data_dict.user_index("bob"), Some(1));
        assert_eq!(data_dict.item_index("inception"), Some(0));
        assert_eq!(data_dict.item_index("vertigo"), Some(1));
        assert_eq!(data_dict.item_index("alien"), Some(2));
        assert_eq!(data_dict.user_index("mallory"), None);
    }

    #[test]
    fn renaming_restores_original_identifiers() {
        let triples = triples();
        let data_dict = DataDictionary::from(triples.iter());
        let renaming = Renaming::from(data_dict);

        assert_eq!(renaming.user_name(1), "bob");
        assert_eq!(renaming.item_name(2), "alien");
    }

    #[test]
    fn both_orientations_stay_consistent() {
        let triples = triples();
        let data_dict = DataDictionary::from(triples.iter());
        let ratings = Ratings::from_triples(&triples, &data_dict).unwrap();

        assert_eq!(ratings.num_users(), 2);
        assert_eq!(ratings.num_items(), 3);

        assert_eq!(ratings.rating_by_user(0, 1), Some(2.0));
        assert_eq!(ratings.rating_of_item(1, 0), Some(2.0));
        assert_eq!(ratings.rating_by_user(1, 1), None);

        assert_eq!(ratings.items_rated_by(1).len(), 2);
        assert_eq!(ratings.users_rating(0).len(), 2);
    }

    #[test]
    fn user_means() {
        let triples = triples();
        let data_dict = DataDictionary::from(triples.iter());
        let ratings = Ratings::from_triples(&triples, &data_dict).unwrap();

        assert_eq!(ratings.user_mean(0).unwrap(), 3.0);
        assert_eq!(ratings.user_mean(1).unwrap(), 4.0);
        assert!(ratings.user_mean(7).is_err());
    }

    #[test]
    fn duplicate_ratings_keep_the_last_value() {
        let mut triples = triples();
        triples.push(("alice".to_string(), "inception".to_string(), 1.0));

        let data_dict = DataDictionary::from(triples.iter());
        let ratings = Ratings::from_triples(&triples, &data_dict).unwrap();

        assert_eq!(ratings.rating_by_user(0, 0), Some(1.0));
        assert_eq!(ratings.rating_of_item(0, 0), Some(1.0));
        assert_eq!(ratings.user_mean(0).unwrap(), 1.5);
    }
}
