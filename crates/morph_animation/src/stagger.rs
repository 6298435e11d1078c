//! Distance-based staggering
//!
//! Staggering spreads the start of a step across a set of nodes according to
//! their distance from an epicenter:
//!
//! 1. measure the distance from each node's center to the epicenter
//! 2. sort ascending
//! 3. fuzzy-group nodes whose distances are within the margin of the group
//!    leader (see [`morph_core::group_by_leader`])
//! 4. split the stagger budget (`duration * offset`) evenly between the groups
//!
//! Each node receives a `(start_offset, end_offset)` window inside the step,
//! suitable for [`AnimatedValue::set_duration_offsets`](crate::AnimatedValue::set_duration_offsets).
//! Every window has the same length, `1 - offset`, and the last group always
//! ends with the step. When every node falls into one group the window is the
//! whole step.
//!
//! # Example
//!
//! ```rust
//! use morph_animation::{compute_stagger, GroupMargin, StaggerConfig};
//! use morph_core::Bounds;
//!
//! let children = [
//!     ("near", Bounds::new(0.0, 0.0, 10.0, 10.0)),
//!     ("far", Bounds::new(100.0, 0.0, 10.0, 10.0)),
//! ];
//! let config = StaggerConfig::new(0.5)
//!     .unwrap()
//!     .with_margin(GroupMargin::Relative(0.3));
//! let infos = compute_stagger(&config, &children, 1000.0);
//!
//! assert_eq!((infos[0].start_offset, infos[0].end_offset), (0.0, 0.5));
//! assert_eq!((infos[1].start_offset, infos[1].end_offset), (0.5, 1.0));
//! ```

use crate::error::{Result, ValueError};
use morph_core::{approximate, group_by_leader, Bounds, Coordinates};
use std::sync::Arc;

/// Margin used to decide whether a node joins its group leader
#[derive(Clone)]
pub enum GroupMargin {
    /// Fixed distance
    Absolute(f32),
    /// Fraction of the leader's distance
    Relative(f32),
    /// Margin computed from the leader's distance
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl GroupMargin {
    pub fn margin_for(&self, leader_distance: f32) -> f32 {
        match self {
            GroupMargin::Absolute(margin) => *margin,
            GroupMargin::Relative(ratio) => leader_distance * ratio,
            GroupMargin::Custom(f) => f(leader_distance),
        }
    }
}

impl Default for GroupMargin {
    fn default() -> Self {
        GroupMargin::Absolute(0.0)
    }
}

impl std::fmt::Debug for GroupMargin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupMargin::Absolute(margin) => write!(f, "Absolute({})", margin),
            GroupMargin::Relative(ratio) => write!(f, "Relative({})", ratio),
            GroupMargin::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Which end of the distance order starts first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StaggerOrder {
    /// Nearest group first
    #[default]
    Reveal,
    /// Farthest group first
    Conceal,
}

/// Stagger settings for one step
#[derive(Clone, Debug)]
pub struct StaggerConfig {
    /// Share of the duration used as stagger budget
    pub offset: f32,
    pub epicenter: Coordinates,
    pub margin: GroupMargin,
    /// Nodes whose bounds do not overlap the filter are not staggered
    pub filter: Option<Bounds>,
    pub order: StaggerOrder,
}

impl StaggerConfig {
    pub fn new(offset: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(ValueError::OffsetOutOfRange(offset));
        }
        Ok(Self {
            offset,
            epicenter: Coordinates::ZERO,
            margin: GroupMargin::default(),
            filter: None,
            order: StaggerOrder::default(),
        })
    }

    pub fn with_epicenter(mut self, epicenter: Coordinates) -> Self {
        self.epicenter = epicenter;
        self
    }

    pub fn with_margin(mut self, margin: GroupMargin) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_filter(mut self, filter: Bounds) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order(mut self, order: StaggerOrder) -> Self {
        self.order = order;
        self
    }
}

/// Stagger window for one node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaggerInfo<K> {
    pub key: K,
    /// Distance from the node's center to the epicenter
    pub distance: f32,
    /// Delay before this node starts, in milliseconds
    pub stagger_ms: f32,
    pub start_offset: f32,
    pub end_offset: f32,
    /// False when the node was excluded by the filter
    pub staggered: bool,
}

/// Compute stagger windows for `entries`.
///
/// The result holds one [`StaggerInfo`] per entry, in input order. Entries
/// outside the filter animate over the whole step.
pub fn compute_stagger<K: Copy>(
    config: &StaggerConfig,
    entries: &[(K, Bounds)],
    duration_ms: f32,
) -> Vec<StaggerInfo<K>> {
    let mut infos: Vec<StaggerInfo<K>> = entries
        .iter()
        .map(|(key, bounds)| StaggerInfo {
            key: *key,
            distance: bounds.center().distance(&config.epicenter),
            stagger_ms: 0.0,
            start_offset: 0.0,
            end_offset: 1.0,
            staggered: config
                .filter
                .map_or(true, |filter| filter.overlaps(bounds)),
        })
        .collect();

    let mut candidates: Vec<usize> = (0..infos.len()).filter(|i| infos[*i].staggered).collect();
    if candidates.is_empty() {
        if !infos.is_empty() {
            tracing::warn!(entries = infos.len(), "stagger filter excluded every node");
        }
        return infos;
    }
    if duration_ms <= 0.0 {
        return infos;
    }

    candidates.sort_by(|a, b| infos[*a].distance.total_cmp(&infos[*b].distance));

    let mut groups = group_by_leader(
        candidates,
        |index| infos[*index].distance,
        |index, leader| {
            let leader_distance = infos[*leader].distance;
            approximate(
                infos[*index].distance,
                leader_distance,
                config.margin.margin_for(leader_distance),
            )
        },
    );
    if config.order == StaggerOrder::Conceal {
        groups.reverse();
    }

    // A single group spans the whole step
    let stagger = if groups.len() > 1 {
        duration_ms * config.offset
    } else {
        0.0
    };
    let duration_delta = duration_ms - stagger;
    let delay_addition = if groups.len() > 1 {
        stagger / (groups.len() - 1) as f32
    } else {
        0.0
    };

    tracing::debug!(
        nodes = infos.len(),
        groups = groups.len(),
        stagger_ms = stagger,
        "stagger groups computed"
    );

    for (position, group) in groups.iter().enumerate() {
        let delay = position as f32 * delay_addition;
        let start_offset = delay / duration_ms;
        let end_offset = ((delay + duration_delta) / duration_ms).min(1.0);
        for index in group {
            let info = &mut infos[*index];
            info.stagger_ms = delay;
            info.start_offset = start_offset;
            info.end_offset = end_offset;
        }
    }

    infos
}

/// Delay for a node at `center`, scaled by its distance to `epicenter`
/// relative to the diagonal of `bounds`.
///
/// Negative speeds produce positive delays; the sign follows the direction
/// of the wave.
pub fn stagger_delay(
    bounds: &Bounds,
    epicenter: Coordinates,
    center: Coordinates,
    speed: f32,
    duration_ms: f32,
) -> f32 {
    let diagonal = bounds.diagonal();
    if diagonal == 0.0 || speed == 0.0 {
        return 0.0;
    }
    let distance_fraction = center.distance(&epicenter) / diagonal;
    (duration_ms * -1.0 / speed * distance_fraction).round()
}
