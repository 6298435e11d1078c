//! Demo scene
//!
//! A card that pops, arcs to the center of the stage while morphing its
//! corners and color, settles back to its original scale, and then reveals a
//! grid of tiles with a stagger from the card's landing point. A badge inside
//! the card mirrors the card's corner radii through a binding.

use anyhow::{Context, Result};
use morph_animation::{Curve, StaggerConfig};
use morph_choreography::{Choreographer, ChoreographerConfig, Choreography, NodeId, NodeState};
use morph_core::{Anchor, Bind, BindableId, BindingGraph, Bounds, Color, Corner, CornerRadii};

pub const STAGE: Bounds = Bounds::new(0.0, 0.0, 800.0, 600.0);
const TILE_COLUMNS: usize = 4;
const TILE_ROWS: usize = 2;

pub struct Scene {
    pub choreography: Choreography,
    /// Named nodes in output order
    pub nodes: Vec<(String, NodeId)>,
    card: NodeId,
    badge: NodeId,
    radii: BindingGraph<CornerRadii>,
    card_radii: BindableId,
    badge_radii: BindableId,
}

impl Scene {
    pub fn build(config: ChoreographerConfig) -> Result<Self> {
        let mut choreographer = Choreographer::with_config(config);

        let stage = choreographer.register(NodeState::new(STAGE));
        let card_radius = CornerRadii::uniform(8.0);
        let card = choreographer.register(
            NodeState::new(Bounds::new(40.0, 40.0, 240.0, 160.0))
                .with_color(Color::from_hex(0x3F51B5))
                .with_corner_radii(card_radius),
        );
        let badge = choreographer
            .register_child(
                card,
                NodeState::new(Bounds::new(56.0, 56.0, 48.0, 48.0)).with_corner_radii(card_radius),
            )
            .context("card was not registered")?;

        let mut nodes = vec![
            ("stage".to_string(), stage),
            ("card".to_string(), card),
            ("badge".to_string(), badge),
        ];
        for row in 0..TILE_ROWS {
            for column in 0..TILE_COLUMNS {
                let bounds = Bounds::new(
                    80.0 + column as f32 * 170.0,
                    360.0 + row as f32 * 110.0,
                    150.0,
                    90.0,
                );
                let tile = choreographer
                    .register_child(stage, NodeState::new(bounds))
                    .context("stage was not registered")?;
                nodes.push((format!("tile_{}_{}", row, column), tile));
            }
        }

        let stagger = StaggerConfig::new(0.6)?.with_epicenter(STAGE.center());

        let intro = choreographer
            .animate(&[card])
            .scale_to(1.1)
            .with_duration(250)
            .with_curve(Curve::STANDARD);
        let pop = intro.id();

        let choreography = intro
            .then()
            .anchor_arc_to(Anchor::Center, stage, 0.0)
            .with_duration(600)
            .with_curve(Curve::FAST_OUT_SLOW_IN)
            .and()
            .corner_radius_to(Corner::TopLeft | Corner::BottomRight, 32.0)
            .and()
            .color_to(Color::from_hex(0xE91E63))
            .then_reversed_with(pop)
            .then_children_of(stage, Some(stagger))
            .alpha_from(0.0, 1.0)
            .y_translate_from(24.0, 0.0)
            .with_duration(500)
            .with_curve(Curve::QUART_OUT)
            .with_start_visibility(true)
            .build()?;

        let mut radii = BindingGraph::new();
        let card_radii = radii.create(card_radius);
        let badge_radii = radii.create(card_radius);
        radii.bind(Bind::Unidirectional, card_radii, badge_radii);

        Ok(Self {
            choreography,
            nodes,
            card,
            badge,
            radii,
            card_radii,
            badge_radii,
        })
    }

    /// Push the card's radii through the binding to the badge
    pub fn sync_bindings(&mut self) {
        let Some(radii) = self.choreography.node(self.card).map(|n| n.corner_radii()) else {
            return;
        };
        self.radii.notify_change(self.card_radii, radii);

        let mirrored = self.radii.get(self.badge_radii).copied();
        if let (Some(mirrored), Some(badge)) = (mirrored, self.choreography.node_mut(self.badge)) {
            badge.set_corner_radii(mirrored);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_choreography::PlaybackState;

    #[test]
    fn test_scene_builds_with_defaults() {
        let scene = Scene::build(ChoreographerConfig::default()).unwrap();
        let schedule = scene.choreography.schedule();

        assert_eq!(schedule.steps().len(), 6);
        assert_eq!(scene.nodes.len(), 3 + TILE_ROWS * TILE_COLUMNS);
        // pop, arc with its parallel steps, reversal, tiles
        assert_eq!(schedule.total_duration_ms(), 250.0 + 600.0 + 250.0 + 500.0);
    }

    #[test]
    fn test_badge_mirrors_card_corners() {
        let mut scene = Scene::build(ChoreographerConfig::default()).unwrap();
        scene.choreography.play().unwrap();
        while scene.choreography.state() == PlaybackState::Playing {
            scene.choreography.tick(16.0).unwrap();
            scene.sync_bindings();
        }

        let card = scene.choreography.node(scene.card).unwrap().corner_radii();
        let badge = scene.choreography.node(scene.badge).unwrap().corner_radii();
        assert_eq!(card.top_left(), 32.0);
        assert_eq!(badge, card);
    }
}
