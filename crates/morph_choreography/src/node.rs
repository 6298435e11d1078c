//! Morphable nodes and the node registry
//!
//! The engine never touches a concrete rendering object. Hosts expose their
//! visual elements through the [`Morphable`] trait and register them with a
//! [`NodeRegistry`], which owns them for the lifetime of a choreography and
//! tracks the parent/child relation used by `children_of` steps.
//!
//! [`NodeState`] is a plain in-memory implementation, useful for headless
//! playback and tests.

use morph_core::{Bounds, Color, CornerRadii};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use thiserror::Error;

new_key_type! {
    /// Handle to a registered node, scoped to one registry
    pub struct NodeId;
}

/// Classification of a node's background
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    Vector,
    Bitmap,
    Gradient,
    #[default]
    None,
}

/// Error reported by a host when it cannot apply a frame
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct NodeError {
    pub message: String,
}

impl NodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Capability surface a host element implements to be animated
///
/// Position is the laid-out origin; translation is applied on top of it. The
/// node's visual bounds are therefore `(x + translation_x, y + translation_y)`.
pub trait Morphable {
    fn x(&self) -> f32;
    fn set_x(&mut self, value: f32);
    fn y(&self) -> f32;
    fn set_y(&mut self, value: f32);

    fn width(&self) -> f32;
    fn set_width(&mut self, value: f32);
    fn height(&self) -> f32;
    fn set_height(&mut self, value: f32);

    fn alpha(&self) -> f32;
    fn set_alpha(&mut self, value: f32);
    fn elevation(&self) -> f32;
    fn set_elevation(&mut self, value: f32);

    fn translation_x(&self) -> f32;
    fn set_translation_x(&mut self, value: f32);
    fn translation_y(&self) -> f32;
    fn set_translation_y(&mut self, value: f32);
    fn translation_z(&self) -> f32;
    fn set_translation_z(&mut self, value: f32);

    fn pivot_x(&self) -> f32;
    fn set_pivot_x(&mut self, value: f32);
    fn pivot_y(&self) -> f32;
    fn set_pivot_y(&mut self, value: f32);

    fn rotation(&self) -> f32;
    fn set_rotation(&mut self, value: f32);
    fn rotation_x(&self) -> f32;
    fn set_rotation_x(&mut self, value: f32);
    fn rotation_y(&self) -> f32;
    fn set_rotation_y(&mut self, value: f32);

    fn scale_x(&self) -> f32;
    fn set_scale_x(&mut self, value: f32);
    fn scale_y(&self) -> f32;
    fn set_scale_y(&mut self, value: f32);

    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);

    fn corner_radii(&self) -> CornerRadii;
    fn set_corner_radii(&mut self, radii: CornerRadii);

    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn background_kind(&self) -> BackgroundKind {
        BackgroundKind::None
    }

    /// False until the host has measured the node
    fn is_laid_out(&self) -> bool {
        true
    }

    /// Laid-out bounds, without translation
    fn bounds(&self) -> Bounds {
        Bounds::new(self.x(), self.y(), self.width(), self.height())
    }

    /// Called once per frame after all writes to this node
    fn commit_frame(&mut self) -> Result<(), NodeError> {
        Ok(())
    }
}

// ============================================================================
// NodeState
// ============================================================================

/// In-memory node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub alpha: f32,
    pub elevation: f32,
    pub translation_x: f32,
    pub translation_y: f32,
    pub translation_z: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
    pub rotation: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub color: Color,
    pub corner_radii: CornerRadii,
    pub visible: bool,
    pub background: BackgroundKind,
    pub laid_out: bool,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            alpha: 1.0,
            elevation: 0.0,
            translation_x: 0.0,
            translation_y: 0.0,
            translation_z: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            rotation: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            color: Color::TRANSPARENT,
            corner_radii: CornerRadii::ZERO,
            visible: true,
            background: BackgroundKind::None,
            laid_out: true,
        }
    }
}

impl NodeState {
    /// A measured node at `bounds`
    pub fn new(bounds: Bounds) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            ..Default::default()
        }
    }

    /// A node the host has not measured yet
    pub fn unmeasured() -> Self {
        Self {
            laid_out: false,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_corner_radii(mut self, radii: CornerRadii) -> Self {
        self.corner_radii = radii;
        self
    }

    pub fn with_background(mut self, background: BackgroundKind) -> Self {
        self.background = background;
        self
    }
}

impl Morphable for NodeState {
    fn x(&self) -> f32 {
        self.x
    }
    fn set_x(&mut self, value: f32) {
        self.x = value;
    }
    fn y(&self) -> f32 {
        self.y
    }
    fn set_y(&mut self, value: f32) {
        self.y = value;
    }
    fn width(&self) -> f32 {
        self.width
    }
    fn set_width(&mut self, value: f32) {
        self.width = value;
    }
    fn height(&self) -> f32 {
        self.height
    }
    fn set_height(&mut self, value: f32) {
        self.height = value;
    }
    fn alpha(&self) -> f32 {
        self.alpha
    }
    fn set_alpha(&mut self, value: f32) {
        self.alpha = value;
    }
    fn elevation(&self) -> f32 {
        self.elevation
    }
    fn set_elevation(&mut self, value: f32) {
        self.elevation = value;
    }
    fn translation_x(&self) -> f32 {
        self.translation_x
    }
    fn set_translation_x(&mut self, value: f32) {
        self.translation_x = value;
    }
    fn translation_y(&self) -> f32 {
        self.translation_y
    }
    fn set_translation_y(&mut self, value: f32) {
        self.translation_y = value;
    }
    fn translation_z(&self) -> f32 {
        self.translation_z
    }
    fn set_translation_z(&mut self, value: f32) {
        self.translation_z = value;
    }
    fn pivot_x(&self) -> f32 {
        self.pivot_x
    }
    fn set_pivot_x(&mut self, value: f32) {
        self.pivot_x = value;
    }
    fn pivot_y(&self) -> f32 {
        self.pivot_y
    }
    fn set_pivot_y(&mut self, value: f32) {
        self.pivot_y = value;
    }
    fn rotation(&self) -> f32 {
        self.rotation
    }
    fn set_rotation(&mut self, value: f32) {
        self.rotation = value;
    }
    fn rotation_x(&self) -> f32 {
        self.rotation_x
    }
    fn set_rotation_x(&mut self, value: f32) {
        self.rotation_x = value;
    }
    fn rotation_y(&self) -> f32 {
        self.rotation_y
    }
    fn set_rotation_y(&mut self, value: f32) {
        self.rotation_y = value;
    }
    fn scale_x(&self) -> f32 {
        self.scale_x
    }
    fn set_scale_x(&mut self, value: f32) {
        self.scale_x = value;
    }
    fn scale_y(&self) -> f32 {
        self.scale_y
    }
    fn set_scale_y(&mut self, value: f32) {
        self.scale_y = value;
    }
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
    fn corner_radii(&self) -> CornerRadii {
        self.corner_radii
    }
    fn set_corner_radii(&mut self, radii: CornerRadii) {
        self.corner_radii = radii;
    }
    fn is_visible(&self) -> bool {
        self.visible
    }
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
    fn background_kind(&self) -> BackgroundKind {
        self.background
    }
    fn is_laid_out(&self) -> bool {
        self.laid_out
    }
}

// ============================================================================
// NodeRegistry
// ============================================================================

struct NodeEntry {
    node: Box<dyn Morphable>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 8]>,
}

/// Arena owning the nodes of one choreography
#[derive(Default)]
pub struct NodeRegistry {
    nodes: SlotMap<NodeId, NodeEntry>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root node
    pub fn register<M: Morphable + 'static>(&mut self, node: M) -> NodeId {
        self.nodes.insert(NodeEntry {
            node: Box::new(node),
            parent: None,
            children: SmallVec::new(),
        })
    }

    /// Register a node as the last child of `parent`. Returns `None` if the parent is unknown.
    pub fn register_child<M: Morphable + 'static>(
        &mut self,
        parent: NodeId,
        node: M,
    ) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }

        let id = self.nodes.insert(NodeEntry {
            node: Box::new(node),
            parent: Some(parent),
            children: SmallVec::new(),
        });
        if let Some(entry) = self.nodes.get_mut(parent) {
            entry.children.push(id);
        }
        Some(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&dyn Morphable> {
        self.nodes.get(id).map(|entry| entry.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut (dyn Morphable + 'static)> {
        self.nodes.get_mut(id).map(|entry| entry.node.as_mut())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|entry| entry.parent)
    }

    /// Children in registration order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_children_in_order() {
        let mut registry = NodeRegistry::new();
        let parent = registry.register(NodeState::new(Bounds::new(0.0, 0.0, 100.0, 100.0)));
        let a = registry.register_child(parent, NodeState::default()).unwrap();
        let b = registry.register_child(parent, NodeState::default()).unwrap();

        assert_eq!(registry.children(parent), &[a, b]);
        assert_eq!(registry.parent(a), Some(parent));
        assert_eq!(registry.parent(parent), None);
        assert!(registry.children(a).is_empty());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_child_of_unknown_parent() {
        let mut registry = NodeRegistry::new();
        assert!(registry
            .register_child(NodeId::default(), NodeState::default())
            .is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_node_access_through_trait() {
        let mut registry = NodeRegistry::new();
        let id = registry.register(NodeState::new(Bounds::new(1.0, 2.0, 3.0, 4.0)));

        let node = registry.get_mut(id).unwrap();
        node.set_translation_x(10.0);
        node.set_rotation(45.0);

        let node = registry.get(id).unwrap();
        assert_eq!(node.translation_x(), 10.0);
        assert_eq!(node.rotation(), 45.0);
        assert_eq!(node.bounds(), Bounds::new(1.0, 2.0, 3.0, 4.0));
        assert!(node.is_laid_out());
    }

    #[test]
    fn test_node_state_defaults() {
        let state = NodeState::default();
        assert_eq!(state.alpha, 1.0);
        assert_eq!((state.scale_x, state.scale_y), (1.0, 1.0));
        assert!(state.visible);
        assert!(!NodeState::unmeasured().is_laid_out());
    }
}
