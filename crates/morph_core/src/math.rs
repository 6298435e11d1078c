//! Numeric helpers shared by the animation crates

/// Clamp `value` between two bounds given in either order
pub fn clamp_between(value: f32, a: f32, b: f32) -> f32 {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    value.max(min).min(max)
}

/// Map `value` from `from_min..from_max` onto `to_min..to_max`, clamped to the output range.
///
/// Either range may be descending. A zero-width input range maps everything at or
/// past `from_max` to `to_max` and the rest to `to_min`.
pub fn map_range(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    map_range_clamped(value, from_min, from_max, to_min, to_max, to_min, to_max)
}

/// [`map_range`] with an explicit clamp range
pub fn map_range_clamped(
    value: f32,
    from_min: f32,
    from_max: f32,
    to_min: f32,
    to_max: f32,
    clamp_min: f32,
    clamp_max: f32,
) -> f32 {
    let span = from_max - from_min;
    let mapped = if span == 0.0 {
        let past_end = if from_max >= from_min {
            value >= from_max
        } else {
            value <= from_max
        };
        if past_end {
            to_max
        } else {
            to_min
        }
    } else {
        (value - from_min) * (to_max - to_min) / span + to_min
    };
    clamp_between(mapped, clamp_min, clamp_max)
}

/// Fuzzy equality: `value` lies in `(target - margin, target + margin]`
pub fn approximate(value: f32, target: f32, margin: f32) -> bool {
    value <= target + margin && value > target - margin
}

/// Group items around leaders, preserving input order.
///
/// Each group is opened by a leader. An item whose key equals an existing
/// leader's key joins that leader's group. Otherwise it is tested against the
/// leader of the most recently opened group with `joins(item, leader)`: on
/// success it joins that group, on failure it opens a new group and becomes
/// its leader.
///
/// The comparison is asymmetric (the leader decides, e.g. through a margin
/// derived from the leader's own value), so the result depends on input
/// order. Callers sort first.
///
/// # Example
///
/// ```
/// use morph_core::math::{approximate, group_by_leader};
///
/// let distances = [8.0_f32, 10.0, 12.0, 15.0, 18.0];
/// let groups = group_by_leader(distances, |d| *d, |d, leader| {
///     approximate(*d, *leader, *leader * 0.3)
/// });
/// assert_eq!(groups, vec![vec![8.0, 10.0], vec![12.0, 15.0], vec![18.0]]);
/// ```
pub fn group_by_leader<T, K, I, F, P>(items: I, key: F, joins: P) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = T>,
    K: PartialEq,
    F: Fn(&T) -> K,
    P: Fn(&T, &T) -> bool,
{
    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut leader_keys: Vec<K> = Vec::new();

    for item in items {
        let item_key = key(&item);
        if let Some(index) = leader_keys.iter().position(|k| *k == item_key) {
            groups[index].push(item);
            continue;
        }

        let joins_last = groups
            .last()
            .and_then(|group| group.first())
            .map(|leader| joins(&item, leader))
            .unwrap_or(false);

        match groups.last_mut() {
            Some(group) if joins_last => group.push(item),
            _ => {
                leader_keys.push(item_key);
                groups.push(vec![item]);
            }
        }
    }

    groups
}
