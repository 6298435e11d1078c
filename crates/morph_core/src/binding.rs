//! One-way and two-way value bindings
//!
//! A [`BindingGraph`] owns a set of bindable endpoints. Writing a value through
//! [`BindingGraph::notify_change`] stores it on the source, hands a copy to every
//! endpoint the source is bound to, and then runs the source's own change
//! listener. Receivers store the value and run their binding listener, but never
//! forward it, so a two-way pair cannot ping-pong.
//!
//! Bindings are a caller-driven notification channel for mirroring derived
//! values (a child always taking its parent's corner radii, for example). They
//! are never triggered by choreography playback.
//!
//! # Example
//!
//! ```rust
//! use morph_core::binding::{Bind, BindingGraph};
//! use morph_core::CornerRadii;
//!
//! let mut graph = BindingGraph::new();
//! let parent = graph.create(CornerRadii::uniform(8.0));
//! let child = graph.create(CornerRadii::ZERO);
//!
//! graph.bind(Bind::Unidirectional, parent, child);
//! graph.notify_change(parent, CornerRadii::uniform(16.0));
//!
//! assert_eq!(graph.get(child), Some(&CornerRadii::uniform(16.0)));
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a bindable endpoint
    pub struct BindableId;
}

/// Binding direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Bind {
    /// Source writes reach the target; the target does not write back
    #[default]
    Unidirectional,
    /// Both endpoints propagate to each other
    Bidirectional,
}

/// Listener invoked with the new value
pub type BindingListener<T> = Box<dyn FnMut(&T)>;

struct BindableNode<T> {
    value: T,
    bindings: SmallVec<[BindableId; 4]>,
    change_listener: Option<BindingListener<T>>,
    binding_listener: Option<BindingListener<T>>,
}

/// Arena of bindable endpoints and the bindings between them
pub struct BindingGraph<T> {
    nodes: SlotMap<BindableId, BindableNode<T>>,
}

impl<T: Clone> BindingGraph<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Create an endpoint holding `value`
    pub fn create(&mut self, value: T) -> BindableId {
        self.nodes.insert(BindableNode {
            value,
            bindings: SmallVec::new(),
            change_listener: None,
            binding_listener: None,
        })
    }

    /// Remove an endpoint and every binding that points at it
    pub fn remove(&mut self, id: BindableId) -> Option<T> {
        let node = self.nodes.remove(id)?;
        for (_, other) in self.nodes.iter_mut() {
            other.bindings.retain(|target| *target != id);
        }
        Some(node.value)
    }

    pub fn get(&self, id: BindableId) -> Option<&T> {
        self.nodes.get(id).map(|node| &node.value)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bind `source` to `other`. Returns false if either endpoint is unknown.
    pub fn bind(&mut self, bind: Bind, source: BindableId, other: BindableId) -> bool {
        if !self.nodes.contains_key(source) || !self.nodes.contains_key(other) || source == other {
            return false;
        }

        Self::link(&mut self.nodes, source, other);
        if bind == Bind::Bidirectional {
            Self::link(&mut self.nodes, other, source);
        }

        tracing::trace!(?source, ?other, ?bind, "bindable endpoints linked");
        true
    }

    fn link(nodes: &mut SlotMap<BindableId, BindableNode<T>>, from: BindableId, to: BindableId) {
        if let Some(node) = nodes.get_mut(from) {
            if !node.bindings.contains(&to) {
                node.bindings.push(to);
            }
        }
    }

    /// Remove the binding from `source` to `other` (one direction only)
    pub fn unbind(&mut self, source: BindableId, other: BindableId) {
        if let Some(node) = self.nodes.get_mut(source) {
            node.bindings.retain(|target| *target != other);
        }
    }

    /// Endpoints that receive writes made on `id`
    pub fn bindings(&self, id: BindableId) -> &[BindableId] {
        self.nodes
            .get(id)
            .map(|node| node.bindings.as_slice())
            .unwrap_or(&[])
    }

    /// Listener run after `id` itself is written through [`BindingGraph::notify_change`]
    pub fn set_change_listener<F>(&mut self, id: BindableId, listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        if let Some(node) = self.nodes.get_mut(id) {
            node.change_listener = Some(Box::new(listener));
        }
    }

    /// Listener run when a bound endpoint pushes a value into `id`
    pub fn set_binding_listener<F>(&mut self, id: BindableId, listener: F)
    where
        F: FnMut(&T) + 'static,
    {
        if let Some(node) = self.nodes.get_mut(id) {
            node.binding_listener = Some(Box::new(listener));
        }
    }

    /// Write `value` to `id` and propagate it to its bindings.
    ///
    /// Returns the number of bound endpoints that received the value.
    pub fn notify_change(&mut self, id: BindableId, value: T) -> usize {
        let targets = match self.nodes.get_mut(id) {
            Some(node) => {
                node.value = value.clone();
                node.bindings.clone()
            }
            None => return 0,
        };

        let mut delivered = 0;
        for target in targets {
            if let Some(node) = self.nodes.get_mut(target) {
                node.value = value.clone();
                if let Some(listener) = node.binding_listener.as_mut() {
                    listener(&value);
                }
                delivered += 1;
            }
        }

        if let Some(listener) = self
            .nodes
            .get_mut(id)
            .and_then(|node| node.change_listener.as_mut())
        {
            listener(&value);
        }

        delivered
    }
}

impl<T: Clone> Default for BindingGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
