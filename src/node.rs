use crate::math::{F, M4, V3};

/// What the renderer draws for a node, in the node's local space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Disc { radius: F, color: V3 },
}

/// Minimal transform hierarchy. A node's world transform is its parent's
/// world transform times `translation * rotation_y * scale`.
#[derive(Debug, Clone)]
pub struct Node {
    translation: V3,
    rotation_y: F,
    scale: V3,
    shape: Option<Shape>,
    children: Vec<Node>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            translation: V3::zero(),
            rotation_y: 0.0,
            scale: V3::one(),
            shape: None,
            children: Vec::new(),
        }
    }
}

impl Node {
    pub fn with_shape(shape: Shape) -> Self {
        Self {
            shape: Some(shape),
            ..Self::default()
        }
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn set_translation(&mut self, translation: V3) {
        self.translation = translation;
    }

    pub fn set_rotation_y(&mut self, angle: F) {
        self.rotation_y = angle;
    }

    pub fn set_scale(&mut self, scale: V3) {
        self.scale = scale;
    }

    pub fn add_child(&mut self, child: Node) -> &mut Node {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn transform(&self) -> M4 {
        M4::translation(self.translation) * M4::rotate_y(self.rotation_y) * M4::scale(self.scale)
    }

    /// Depth-first walk handing every node its world transform.
    pub fn visit<Fv: FnMut(&Node, M4)>(&self, parent: M4, visitor: &mut Fv) {
        let world = parent * self.transform();
        visitor(self, world);
        for child in &self.children {
            child.visit(world, visitor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PI;

    fn disc() -> Shape {
        Shape::Disc {
            radius: 1.0,
            color: V3::one(),
        }
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Node::default().transform(), M4::identity());
    }

    #[test]
    fn child_inherits_parent_transform() {
        let mut parent = Node::with_shape(disc());
        parent.set_translation(V3::new(10.0, 0.0, 0.0));
        parent.set_rotation_y(PI / 2.0);
        parent.set_scale(V3::fill(2.0));

        let child = parent.add_child(Node::with_shape(disc()));
        child.set_translation(V3::new(0.0, 0.0, 1.0));

        let mut worlds = Vec::new();
        parent.visit(M4::identity(), &mut |_: &Node, world: M4| {
            worlds.push(world.transform_point(V3::zero()))
        });

        assert_eq!(worlds.len(), 2);
        assert!(worlds[0].near(V3::new(10.0, 0.0, 0.0), 1e-5));
        // Local +z rotated a quarter turn is +x, then scaled by two.
        assert!(worlds[1].near(V3::new(12.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn scale_applies_before_rotation_and_translation() {
        let mut node = Node::default();
        node.set_translation(V3::new(1.0, 0.0, -2.0));
        node.set_rotation_y(PI);
        node.set_scale(V3::new(3.0, 1.0, 1.0));

        let p = node.transform().transform_point(V3::new(1.0, 0.0, 0.0));
        assert!(p.near(V3::new(-2.0, 0.0, -2.0), 1e-5));
        assert_eq!(node.transform().translation_part(), V3::new(1.0, 0.0, -2.0));
    }
}
