// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod brute_force;

use core::cmp::Ordering;

use crate::types::neighbor::Neighbor;

/// Ranking order: score descending. Equal scores compare `Equal`, so a stable
/// sort keeps their input order.
///
/// `total_cmp` makes this a total order, which keeps sorting deterministic
/// even if a NaN ever reaches it.
pub fn by_score_desc(a: &Neighbor, b: &Neighbor) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// True when `list` is non-increasing by score.
pub fn is_ranked(list: &[Neighbor]) -> bool {
    list.windows(2)
        .all(|pair| by_score_desc(&pair[0], &pair[1]) != Ordering::Greater)
}
