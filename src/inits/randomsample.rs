use crate::{dataset::Dataset, memory::*};
use rand::{seq::index, Rng};

/// Draw **k** distinct sample indices uniformly at random, without replacement.
#[inline(always)]
pub(crate) fn select<T: Primitive, R: Rng + ?Sized>(data: &Dataset<T>, k: usize, rnd: &mut R) -> Vec<usize> {
    index::sample(rnd, data.len(), k).into_vec()
}
