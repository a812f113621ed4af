use opdeck_core::MarkerFactory;

/// Allocator for node disambiguation ids, owned by each form tree.
///
/// Labels shown to the rendering surface must be unique even when two nodes
/// share a name; the suffix comes from here. One allocator per form, threaded
/// through declaration and cloning, so no process-wide state is involved.
#[derive(Clone, Debug, Default)]
pub struct IdAlloc {
    next: u64,
}

impl IdAlloc {
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Context threaded through declaration, update, cloning, and drawing of a
/// form tree: the tree's id allocator plus the embedder's marker factory for
/// spatial leaves.
pub struct FormCtx<'a> {
    pub ids: &'a mut IdAlloc,
    pub markers: &'a mut dyn MarkerFactory,
}
