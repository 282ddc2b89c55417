// Private module; its types are re-exported from `avl`.

/// The type that is used for height bookkeeping.
/// `u8` is definitely enough, since the height of the tree is logarithmic in the tree size.
pub(crate) type T = u8;
/// Used for balance factors.
pub(crate) type TD = i8;

/// A handle to a node in an [`AvlTree`](super::AvlTree)'s arena.
///
/// Handles stay valid across every mutation except erasing the node itself:
/// rotations only relink nodes, they never move them. Once a node is erased
/// its slot in the arena may be reused, and the generation check rejects
/// the old handle. Each handle also carries the tag of the tree that issued
/// it, so another tree (a clone included) refuses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tree: u32,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// The same slot, as issued by the tree tagged `tree`.
    pub(crate) fn retag(self, tree: u32) -> NodeId {
        NodeId { tree, ..self }
    }
}

/// Which child of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A place in the tree that holds a (possibly absent) subtree:
/// either the tree's root pointer, or one of a node's child links.
///
/// Rotation and deletion read and overwrite slots, so they never need to
/// know whether the subtree they work on hangs off the root or off a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Root,
    Child(NodeId, Side),
}

impl Slot {
    /// The node owning this slot, or `None` for the root slot.
    pub fn parent(self) -> Option<NodeId> {
        match self {
            Slot::Root => None,
            Slot::Child(parent, _) => Some(parent),
        }
    }
}

/// A node of the tree. Children are owned by the arena and reached by handle;
/// `parent` is a back link only.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub key: K,
    /// 0 for a leaf.
    pub height: T,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl<K> Node<K> {
    pub fn new(key: K, parent: Option<NodeId>) -> Node<K> {
        Node {
            key,
            height: 0,
            left: None,
            right: None,
            parent,
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Consumes the node, keeping only its key.
    pub fn into_key(self) -> K {
        self.key
    }
}

/// One cell of the arena. A vacant cell keeps its generation so that
/// the next node placed there gets a fresh one.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K> {
    pub generation: u32,
    pub node: Option<Node<K>>,
}
