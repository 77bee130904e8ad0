//! Thin typed wrapper around rowan's green tree builder

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};

use super::{PySyntaxKind, PySyntaxNode};

/// Builds green trees using [`PySyntaxKind`] instead of raw rowan kinds
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: PySyntaxKind) {
        self.inner.start_node(kind.into());
    }

    pub fn token(&mut self, kind: PySyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    /// Wrap everything added since `checkpoint` in a new node of `kind`
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: PySyntaxKind) {
        self.inner.start_node_at(checkpoint, kind.into());
    }

    pub fn finish(self) -> GreenNode {
        self.inner.finish()
    }

    /// Finish and hand back a mutable tree whose root is ready for editing
    pub fn finish_mutable(self) -> PySyntaxNode {
        PySyntaxNode::new_root(self.finish()).clone_for_update()
    }
}
