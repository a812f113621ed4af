use crate::widget::{DrawCtx, Widget, WidgetKind};
use indexmap::map::Entry;
use indexmap::IndexMap;
use opdeck_core::{ElementId, Surface};

struct WidgetEntry {
    seen: bool,
    widget: Widget,
}

/// Node of the category tree: child categories and widgets, both unique by
/// name and kept in insertion order. Categories appear lazily, the first
/// time an identity references them.
pub struct Category {
    name: String,
    depth: usize,
    categories: IndexMap<String, Category>,
    widgets: IndexMap<String, WidgetEntry>,
}

impl Category {
    pub fn root() -> Self {
        Self::new(String::new(), 0)
    }

    fn new(name: String, depth: usize) -> Self {
        Self {
            name,
            depth,
            categories: IndexMap::new(),
            widgets: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.widgets.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn widget(&self, name: &str) -> Option<&Widget> {
        self.widgets.get(name).map(|entry| &entry.widget)
    }

    fn find_or_create(&mut self, path: &[String]) -> &mut Category {
        let mut current = self;
        for name in path {
            let depth = current.depth + 1;
            current = current
                .categories
                .entry(name.clone())
                .or_insert_with(|| Category::new(name.clone(), depth));
        }
        current
    }

    /// Resolves the widget at `id` with the declared kind: creates it when
    /// absent, reuses it when the kind matches, and silently replaces it
    /// when the kind changed. Callers never observe a wrong-kind widget,
    /// and no state crosses a kind change.
    pub fn resolve(&mut self, id: &ElementId, kind: WidgetKind) -> &mut Widget {
        let category = self.find_or_create(&id.category);
        match category.widgets.entry(id.name.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().widget.kind() != kind {
                    log::debug!(
                        "widget {} kind changed ({:?} -> {:?}), rebuilding",
                        id,
                        occupied.get().widget.kind(),
                        kind
                    );
                    occupied.insert(WidgetEntry {
                        seen: true,
                        widget: Widget::new(kind, id.clone()),
                    });
                } else {
                    occupied.get_mut().seen = true;
                }
                &mut occupied.into_mut().widget
            }
            Entry::Vacant(vacant) => {
                &mut vacant
                    .insert(WidgetEntry {
                        seen: true,
                        widget: Widget::new(kind, id.clone()),
                    })
                    .widget
            }
        }
    }

    /// Batch bracketing, first half: forget the previous batch's liveness.
    pub fn mark_unseen(&mut self) {
        for entry in self.widgets.values_mut() {
            entry.seen = false;
        }
        for child in self.categories.values_mut() {
            child.mark_unseen();
        }
    }

    /// Batch bracketing, second half: drop widgets no message referenced,
    /// and categories left empty by that.
    pub fn prune_unseen(&mut self) {
        self.widgets.retain(|_, entry| entry.seen);
        self.categories.retain(|_, child| {
            child.prune_unseen();
            !child.is_empty()
        });
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut DrawCtx<'_>) {
        for entry in self.widgets.values_mut() {
            entry.widget.draw(surface, ctx);
        }
        for child in self.categories.values_mut() {
            let key = format!("category/{}/{}", child.depth, child.name);
            if surface.collapsing_header(&key, &child.name) {
                surface.indent();
                child.draw(surface, ctx);
                surface.unindent();
            }
        }
    }

    pub fn draw_3d(&mut self) {
        for entry in self.widgets.values_mut() {
            entry.widget.draw_3d();
        }
        for child in self.categories.values_mut() {
            child.draw_3d();
        }
    }
}
