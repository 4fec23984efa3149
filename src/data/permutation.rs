use crate::data::Dataset;
use rand::Rng;

/// Uniform in-place Fisher–Yates shuffle
///
/// Walks from the last index down to 1, swapping each element with one drawn
/// uniformly from the prefix that includes it.
pub fn fisher_yates<T, R: Rng>(values: &mut [T], rng: &mut R) {
    for i in (1..values.len()).rev() {
        let j = rng.random_range(0..=i);
        values.swap(i, j);
    }
}

/// Null-hypothesis variant of a dataset
///
/// Keeps every x in place and shuffles the y column, so both marginal
/// multisets survive exactly while any x–y dependency is destroyed.
/// The input is left untouched.
pub fn permute<R: Rng>(dataset: &Dataset, rng: &mut R) -> Dataset {
    let xs = dataset.xs();
    let mut ys = dataset.ys();
    fisher_yates(&mut ys, rng);
    Dataset::from_columns(&xs, &ys)
}
