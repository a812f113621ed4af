use crate::ctx::FormCtx;
use crate::decl::FieldDecl;
use crate::error::FormError;
use crate::leaf::FormLeaf;
use indexmap::IndexMap;
use opdeck_core::{Surface, Value, ValueError};
use smallvec::SmallVec;

/// One node of a form tree: a named leaf or container with a lock flag.
///
/// The lock is a semantic guard, not a mutex: while a node is locked, the
/// authority's updates leave it alone (containers skip entirely, leaves only
/// record bookkeeping), so the operator's uncommitted work survives until the
/// form is submitted or the node is reset.
pub struct FormNode {
    name: String,
    required: bool,
    uid: u64,
    kind: NodeKind,
}

pub enum NodeKind {
    Object(ObjectNode),
    ObjectArray(ArrayNode),
    GenericArray(ArrayNode),
    OneOf(OneOfNode),
    Leaf(FormLeaf),
}

/// Container splitting children into required and optional partitions.
/// `required_only` containers (one-of candidate sets, array element
/// templates) fold every declaration into the required partition.
pub struct ObjectNode {
    required_only: bool,
    locked: bool,
    required: IndexMap<String, FormNode>,
    optional: IndexMap<String, FormNode>,
}

/// Homogeneous array: live entries are clones of one primary template.
pub struct ArrayNode {
    locked: bool,
    template: Box<FormNode>,
    entries: Vec<FormNode>,
}

/// Tagged variant selection: a fixed candidate set and at most one active
/// instance cloned from the selected candidate.
pub struct OneOfNode {
    locked: bool,
    candidates: Box<FormNode>,
    active: Option<Box<FormNode>>,
    active_index: Option<usize>,
}

impl FormNode {
    pub(crate) fn new(name: &str, required: bool, kind: NodeKind, ctx: &mut FormCtx<'_>) -> Self {
        Self {
            name: name.to_owned(),
            required,
            uid: ctx.ids.next_id(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operator-visible name; anything after `##` only disambiguates.
    pub fn display_name(&self) -> &str {
        match self.name.find("##") {
            Some(pos) => &self.name[..pos],
            None => &self.name,
        }
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}##{}{suffix}", self.display_name(), self.uid)
    }

    pub fn locked(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(leaf) => leaf.is_editing(),
            NodeKind::Object(object) => object.locked,
            NodeKind::ObjectArray(array) | NodeKind::GenericArray(array) => array.locked,
            NodeKind::OneOf(one_of) => one_of.locked,
        }
    }

    /// Releases the lock after the node was collected; committed state stays.
    fn release_lock(&mut self) {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf.end_edit(),
            NodeKind::Object(object) => object.locked = false,
            NodeKind::ObjectArray(array) | NodeKind::GenericArray(array) => array.locked = false,
            NodeKind::OneOf(one_of) => one_of.locked = false,
        }
    }

    /// Operator-initiated abandon: leaves surface the latest authority
    /// value, containers merely unlock (children keep their own locks).
    fn reset_lock(&mut self) {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf.reset(),
            NodeKind::Object(object) => object.locked = false,
            NodeKind::ObjectArray(array) | NodeKind::GenericArray(array) => array.locked = false,
            NodeKind::OneOf(one_of) => one_of.locked = false,
        }
    }

    pub fn ready(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(leaf) => leaf.ready(),
            NodeKind::Object(object) => object.ready(),
            NodeKind::ObjectArray(array) | NodeKind::GenericArray(array) => {
                let entries_ready = array.entries.iter().all(FormNode::ready);
                if self.required {
                    entries_ready
                } else {
                    !array.entries.is_empty() && entries_ready
                }
            }
            NodeKind::OneOf(one_of) => one_of.active.as_deref().is_some_and(FormNode::ready),
        }
    }

    fn as_object(&self) -> &ObjectNode {
        match &self.kind {
            NodeKind::Object(object) => object,
            _ => panic!("form node `{}` is not an object container", self.name),
        }
    }

    fn as_object_mut(&mut self) -> &mut ObjectNode {
        match &mut self.kind {
            NodeKind::Object(object) => object,
            _ => panic!("form node `{}` is not an object container", self.name),
        }
    }

    /// The container nested declarations descend into.
    pub(crate) fn container_mut(&mut self) -> &mut ObjectNode {
        match &mut self.kind {
            NodeKind::Object(object) => object,
            NodeKind::ObjectArray(array) | NodeKind::GenericArray(array) => {
                array.template.as_object_mut()
            }
            NodeKind::OneOf(one_of) => one_of.candidates.as_object_mut(),
            NodeKind::Leaf(_) => panic!("form field `{}` cannot contain declarations", self.name),
        }
    }

    /// Serializes this node under its display name, then clears any
    /// per-submission state (array entries, one-of selection). Submission is
    /// terminal for the edit cycle.
    pub fn collect(&mut self, out: &mut IndexMap<String, Value>) {
        let name = self.display_name().to_owned();
        match &mut self.kind {
            NodeKind::Leaf(leaf) => {
                out.insert(name, leaf.collect_value());
            }
            NodeKind::Object(object) => {
                let mut inner = IndexMap::new();
                object.collect_fields(&mut inner);
                out.insert(name, Value::Map(inner));
            }
            NodeKind::ObjectArray(array) => {
                let mut items = Vec::with_capacity(array.entries.len());
                for entry in &mut array.entries {
                    let mut fields = IndexMap::new();
                    entry.as_object_mut().collect_fields(&mut fields);
                    items.push(Value::Map(fields));
                }
                array.entries.clear();
                array.locked = false;
                out.insert(name, Value::Array(items));
            }
            NodeKind::GenericArray(array) => {
                let mut items = Vec::with_capacity(array.entries.len());
                for entry in &mut array.entries {
                    let mut fields = IndexMap::new();
                    entry.as_object_mut().collect_fields(&mut fields);
                    // Each entry wraps exactly one scalar; unwrap it.
                    if let Some((_, value)) = fields.into_iter().next() {
                        items.push(value);
                    }
                }
                array.entries.clear();
                array.locked = false;
                out.insert(name, Value::Array(items));
            }
            NodeKind::OneOf(one_of) => {
                let active = one_of
                    .active
                    .as_mut()
                    .expect("one-of collected with no active variant");
                let index = one_of
                    .active_index
                    .expect("one-of collected with no selected index");
                let mut fields = IndexMap::new();
                active.collect(&mut fields);
                let payload = fields
                    .shift_remove(active.display_name())
                    .unwrap_or_else(Value::empty_map);
                one_of.active = None;
                one_of.active_index = None;
                one_of.locked = false;
                out.insert(name, Value::Array(vec![Value::Int(index as i64), payload]));
            }
        }
    }

    /// Applies an authority update. Locked containers are a no-op; leaves
    /// always take the update so the bookkeeping invariant holds.
    pub fn update(&mut self, value: &Value, ctx: &mut FormCtx<'_>) -> Result<(), FormError> {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf.update_value(value).map_err(FormError::from),
            NodeKind::Object(object) => {
                if object.locked {
                    return Ok(());
                }
                object.update_fields(value.as_map()?, ctx)
            }
            NodeKind::ObjectArray(array) => {
                if array.locked {
                    return Ok(());
                }
                array.update_objects(value.as_array()?, ctx)
            }
            NodeKind::GenericArray(array) => {
                if array.locked {
                    return Ok(());
                }
                array.update_scalars(value.as_array()?, ctx)
            }
            NodeKind::OneOf(one_of) => {
                if one_of.locked {
                    return Ok(());
                }
                let pair = value.as_array()?;
                if pair.len() != 2 {
                    return Err(ValueError::Length {
                        expected: 2,
                        found: pair.len(),
                    }
                    .into());
                }
                let index = pair[0].as_int()? as usize;
                one_of.apply_selection(index, &pair[1], ctx)
            }
        }
    }

    /// Deep structural copy with fresh ids and no locks: value state plus
    /// descendant shape, never live array entries or an active variant.
    pub fn clone_node(&self, ctx: &mut FormCtx<'_>) -> FormNode {
        let kind = match &self.kind {
            NodeKind::Leaf(leaf) => NodeKind::Leaf(leaf.clone_fresh(ctx)),
            NodeKind::Object(object) => NodeKind::Object(object.clone_fields(ctx)),
            NodeKind::ObjectArray(array) => NodeKind::ObjectArray(array.clone_shape(ctx)),
            NodeKind::GenericArray(array) => NodeKind::GenericArray(array.clone_shape(ctx)),
            NodeKind::OneOf(one_of) => NodeKind::OneOf(OneOfNode {
                locked: false,
                candidates: Box::new(one_of.candidates.clone_node(ctx)),
                active: None,
                active_index: None,
            }),
        };
        FormNode {
            name: self.name.clone(),
            required: self.required,
            uid: ctx.ids.next_id(),
            kind,
        }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut FormCtx<'_>) {
        surface.bold_text(self.display_name());
        if self.locked() {
            surface.same_line();
            if surface.button(&self.key("/reset"), "Reset") {
                self.reset_lock();
            }
        }
        self.draw_body(surface, ctx);
    }

    /// Body without the name header; array entries and the one-of active
    /// instance are drawn this way since their context already names them.
    fn draw_body(&mut self, surface: &mut dyn Surface, ctx: &mut FormCtx<'_>) {
        let key = self.key("");
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf.draw(surface, &key),
            NodeKind::Object(object) => {
                surface.separator();
                surface.indent();
                object.draw_fields(surface, ctx, &key);
                surface.unindent();
            }
            NodeKind::ObjectArray(array) | NodeKind::GenericArray(array) => {
                array.draw(surface, ctx, &key);
            }
            NodeKind::OneOf(one_of) => one_of.draw(surface, ctx, &key),
        }
    }

    pub fn draw_3d(&mut self) {
        match &mut self.kind {
            NodeKind::Leaf(leaf) => leaf.draw_3d(),
            NodeKind::Object(object) => object.draw_3d(),
            NodeKind::ObjectArray(array) | NodeKind::GenericArray(array) => {
                for entry in &mut array.entries {
                    entry.draw_3d();
                }
            }
            NodeKind::OneOf(one_of) => {
                if let Some(active) = &mut one_of.active {
                    active.draw_3d();
                }
            }
        }
    }
}

impl ObjectNode {
    pub(crate) fn new(required_only: bool) -> Self {
        Self {
            required_only,
            locked: false,
            required: IndexMap::new(),
            optional: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FormNode> {
        self.required.get(name).or_else(|| self.optional.get(name))
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormNode> {
        if self.required.contains_key(name) {
            self.required.get_mut(name)
        } else {
            self.optional.get_mut(name)
        }
    }

    pub(crate) fn field_count(&self) -> usize {
        self.required.len()
    }

    pub(crate) fn field_at(&self, index: usize) -> Option<&FormNode> {
        self.required.get_index(index).map(|(_, node)| node)
    }

    pub(crate) fn first_field_mut(&mut self) -> Option<&mut FormNode> {
        self.required.get_index_mut(0).map(|(_, node)| node)
    }

    /// Creates or refreshes one field. A declaration whose kind no longer
    /// matches the existing field destroys and rebuilds it; no state is
    /// carried across the change.
    pub fn declare(
        &mut self,
        name: &str,
        required: bool,
        decl: FieldDecl,
        ctx: &mut FormCtx<'_>,
    ) {
        let partition = if required || self.required_only {
            &mut self.required
        } else {
            &mut self.optional
        };
        match partition.get_mut(name) {
            Some(node) if decl.matches(node) => decl.apply(node, ctx),
            Some(node) => {
                log::debug!("form field `{name}` changed kind, rebuilding");
                *node = decl.instantiate(name, required, ctx);
            }
            None => {
                let node = decl.instantiate(name, required, ctx);
                partition.insert(name.to_owned(), node);
            }
        }
    }

    /// Readiness never looks at optional children.
    pub fn ready(&self) -> bool {
        self.required.values().all(FormNode::ready)
    }

    /// Writes every required child (draft default when not ready) and every
    /// ready optional child, releasing each collected child's lock.
    pub fn collect_fields(&mut self, out: &mut IndexMap<String, Value>) {
        for child in self.required.values_mut() {
            child.collect(out);
            child.release_lock();
        }
        for child in self.optional.values_mut() {
            if child.ready() {
                child.collect(out);
                child.release_lock();
            }
        }
        self.locked = false;
    }

    pub(crate) fn update_fields(
        &mut self,
        config: &IndexMap<String, Value>,
        ctx: &mut FormCtx<'_>,
    ) -> Result<(), FormError> {
        for child in self.required.values_mut() {
            let value = config
                .get(child.display_name())
                .ok_or_else(|| FormError::MissingField(child.display_name().to_owned()))?;
            child.update(value, ctx)?;
        }
        for child in self.optional.values_mut() {
            if let Some(value) = config.get(child.display_name()) {
                child.update(value, ctx)?;
            }
        }
        Ok(())
    }

    pub(crate) fn clone_fields(&self, ctx: &mut FormCtx<'_>) -> ObjectNode {
        ObjectNode {
            required_only: self.required_only,
            locked: false,
            required: self
                .required
                .iter()
                .map(|(name, node)| (name.clone(), node.clone_node(ctx)))
                .collect(),
            optional: self
                .optional
                .iter()
                .map(|(name, node)| (name.clone(), node.clone_node(ctx)))
                .collect(),
        }
    }

    pub fn draw_fields(&mut self, surface: &mut dyn Surface, ctx: &mut FormCtx<'_>, key: &str) {
        let mut any_locked = false;
        let required_count = self.required.len();
        for (i, child) in self.required.values_mut().enumerate() {
            child.draw(surface, ctx);
            any_locked |= child.locked();
            if i + 1 != required_count {
                surface.separator();
            }
        }
        let show_optional = self.required.is_empty()
            || (!self.optional.is_empty()
                && surface.collapsing_header(&format!("{key}/optional"), "Optional"));
        if show_optional {
            if required_count != 0 {
                surface.indent();
            }
            let optional_count = self.optional.len();
            for (i, child) in self.optional.values_mut().enumerate() {
                child.draw(surface, ctx);
                any_locked |= child.locked();
                if i + 1 != optional_count {
                    surface.separator();
                }
            }
            if required_count != 0 {
                surface.unindent();
            }
        }
        self.locked = self.locked || any_locked;
    }

    pub fn draw_3d(&mut self) {
        for child in self.required.values_mut() {
            child.draw_3d();
        }
        for child in self.optional.values_mut() {
            child.draw_3d();
        }
    }
}

impl ArrayNode {
    pub(crate) fn new(template: FormNode) -> Self {
        Self {
            locked: false,
            template: Box::new(template),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[FormNode] {
        &self.entries
    }

    pub fn template(&self) -> &FormNode {
        &self.template
    }

    fn clone_shape(&self, ctx: &mut FormCtx<'_>) -> ArrayNode {
        ArrayNode {
            locked: false,
            template: Box::new(self.template.clone_node(ctx)),
            entries: Vec::new(),
        }
    }

    /// Resizes to the published list. Unlocked entries are rebuilt from the
    /// template and updated; locked entries keep their structure but still
    /// receive the content update.
    pub(crate) fn update_objects(
        &mut self,
        list: &[Value],
        ctx: &mut FormCtx<'_>,
    ) -> Result<(), FormError> {
        self.entries.truncate(list.len());
        for (i, item) in list.iter().enumerate() {
            if let Some(entry) = self.entries.get_mut(i) {
                if !entry.locked() {
                    *entry = self.template.clone_node(ctx);
                }
            } else {
                let entry = self.template.clone_node(ctx);
                self.entries.push(entry);
            }
            self.entries[i].update(item, ctx)?;
        }
        Ok(())
    }

    /// Same resize discipline, but each entry wraps exactly one scalar and
    /// only that field receives the element payload.
    pub(crate) fn update_scalars(
        &mut self,
        list: &[Value],
        ctx: &mut FormCtx<'_>,
    ) -> Result<(), FormError> {
        self.entries.truncate(list.len());
        for (i, item) in list.iter().enumerate() {
            if self.entries.get(i).is_none() {
                let entry = self.template.clone_node(ctx);
                self.entries.push(entry);
            }
            if self.entries[i].as_object().is_empty() && !self.template.as_object().is_empty() {
                self.entries[i] = self.template.clone_node(ctx);
            }
            if let Some(field) = self.entries[i].as_object_mut().first_field_mut() {
                field.update(item, ctx)?;
            }
        }
        Ok(())
    }

    fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut FormCtx<'_>, key: &str) {
        surface.separator();
        surface.indent();
        let mut to_delete: SmallVec<[usize; 4]> = SmallVec::new();
        let mut any_locked = false;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            surface.bold_text(&format!("[{i}]"));
            surface.same_line();
            if surface.button(&format!("{key}/remove/{i}"), "-") {
                to_delete.push(i);
            }
            entry.draw_body(surface, ctx);
            any_locked |= entry.locked();
        }
        for i in to_delete.iter().rev() {
            self.entries.remove(*i);
        }
        surface.separator();
        if surface.button(&format!("{key}/add"), "+") {
            let entry = self.template.clone_node(ctx);
            self.entries.push(entry);
            any_locked = true;
        }
        surface.unindent();
        // Adding or removing locks the array against authority resizing
        // until the next submission.
        self.locked = self.locked || any_locked || !to_delete.is_empty();
    }
}

impl OneOfNode {
    pub(crate) fn new(candidates: FormNode) -> Self {
        Self {
            locked: false,
            candidates: Box::new(candidates),
            active: None,
            active_index: None,
        }
    }

    pub fn active(&self) -> Option<&FormNode> {
        self.active.as_deref()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn candidates(&self) -> &FormNode {
        &self.candidates
    }

    /// Selecting a different candidate clones it fresh from the template;
    /// switching variants never carries state over. An out-of-range index is
    /// dropped silently.
    pub(crate) fn apply_selection(
        &mut self,
        index: usize,
        payload: &Value,
        ctx: &mut FormCtx<'_>,
    ) -> Result<(), FormError> {
        let candidates = self.candidates.as_object();
        if index >= candidates.field_count() {
            log::trace!("one-of index {index} outside candidate set, dropped");
            return Ok(());
        }
        if self.active_index != Some(index) {
            let clone = candidates
                .field_at(index)
                .expect("candidate index checked above")
                .clone_node(ctx);
            self.active = Some(Box::new(clone));
            self.active_index = Some(index);
        }
        self.active
            .as_mut()
            .expect("active variant just ensured")
            .update(payload, ctx)
    }

    fn draw(&mut self, surface: &mut dyn Surface, ctx: &mut FormCtx<'_>, key: &str) {
        surface.same_line();
        let mut items = Vec::with_capacity(self.candidates.as_object().field_count() + 1);
        items.push(String::new());
        for i in 0..self.candidates.as_object().field_count() {
            let candidate = self.candidates.as_object().field_at(i).unwrap();
            items.push(candidate.display_name().to_owned());
        }
        let current = self.active.as_deref().map(FormNode::display_name);
        if let Some(choice) = surface.combo(key, current, &items) {
            if choice == 0 {
                if self.active.is_some() {
                    self.locked = true;
                }
                self.active = None;
                self.active_index = None;
            } else {
                let index = choice - 1;
                if self.active_index != Some(index) {
                    let clone = self
                        .candidates
                        .as_object()
                        .field_at(index)
                        .expect("combo items mirror the candidate set")
                        .clone_node(ctx);
                    self.active = Some(Box::new(clone));
                    self.active_index = Some(index);
                    self.locked = true;
                }
            }
        }
        if let Some(active) = &mut self.active {
            surface.separator();
            surface.indent();
            active.draw_body(surface, ctx);
            let active_locked = active.locked();
            surface.unindent();
            self.locked = self.locked || active_locked;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::IdAlloc;
    use crate::decl::FieldDecl;
    use opdeck_core::NullMarkerFactory;

    fn item(x: f64) -> Value {
        let mut fields = IndexMap::new();
        fields.insert("x".to_owned(), Value::Number(x));
        Value::Map(fields)
    }

    fn entry_x(entry: &FormNode) -> f64 {
        let NodeKind::Object(object) = entry.kind() else {
            panic!("array entries are object containers");
        };
        let NodeKind::Leaf(FormLeaf::Number(state)) = object.field("x").unwrap().kind() else {
            panic!("entry field `x` is a number leaf");
        };
        *state.committed().expect("entry value set by update")
    }

    #[test]
    fn object_array_resizes_to_the_update_list() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = FormCtx {
            ids: &mut ids,
            markers: &mut markers,
        };
        let mut root = ObjectNode::new(false);
        root.declare("points", true, FieldDecl::ObjectArray, &mut ctx);
        root.field_mut("points").unwrap().container_mut().declare(
            "x",
            true,
            FieldDecl::Number { default: None },
            &mut ctx,
        );

        let node = root.field_mut("points").unwrap();
        node.update(&Value::Array(vec![item(1.0), item(2.0), item(3.0)]), &mut ctx)
            .unwrap();
        let NodeKind::ObjectArray(array) = node.kind() else {
            panic!("expected an object array");
        };
        assert_eq!(array.entries().len(), 3);

        node.update(&Value::Array(vec![item(9.0)]), &mut ctx).unwrap();
        let NodeKind::ObjectArray(array) = node.kind() else {
            panic!("expected an object array");
        };
        assert_eq!(array.entries().len(), 1);
        assert_eq!(entry_x(&array.entries()[0]), 9.0);

        let five: Vec<Value> = (0..5).map(|i| item(i as f64)).collect();
        node.update(&Value::Array(five), &mut ctx).unwrap();
        let NodeKind::ObjectArray(array) = node.kind() else {
            panic!("expected an object array");
        };
        assert_eq!(array.entries().len(), 5);
        for (i, entry) in array.entries().iter().enumerate() {
            assert_eq!(entry_x(entry), i as f64);
        }
    }

    #[test]
    fn locked_array_entry_survives_a_resize() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = FormCtx {
            ids: &mut ids,
            markers: &mut markers,
        };
        let mut root = ObjectNode::new(false);
        root.declare("points", true, FieldDecl::ObjectArray, &mut ctx);
        root.field_mut("points").unwrap().container_mut().declare(
            "x",
            true,
            FieldDecl::Number { default: None },
            &mut ctx,
        );
        let node = root.field_mut("points").unwrap();
        node.update(&Value::Array(vec![item(1.0), item(2.0)]), &mut ctx)
            .unwrap();

        // Operator edits entry 0: structure must survive the next update.
        let NodeKind::ObjectArray(array) = node.kind_mut() else {
            panic!("expected an object array");
        };
        let NodeKind::Object(object) = array.entries[0].kind_mut() else {
            panic!("array entries are object containers");
        };
        let NodeKind::Leaf(FormLeaf::Number(state)) =
            object.field_mut("x").unwrap().kind_mut()
        else {
            panic!("entry field `x` is a number leaf");
        };
        state.edit(42.0);

        node.update(&Value::Array(vec![item(7.0), item(8.0)]), &mut ctx)
            .unwrap();
        let NodeKind::ObjectArray(array) = node.kind() else {
            panic!("expected an object array");
        };
        // Locked entry keeps the operator's value; the unlocked one follows.
        assert_eq!(entry_x(&array.entries()[0]), 42.0);
        assert_eq!(entry_x(&array.entries()[1]), 8.0);
    }

    #[test]
    fn one_of_switch_resets_to_template_defaults() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = FormCtx {
            ids: &mut ids,
            markers: &mut markers,
        };
        let mut root = ObjectNode::new(false);
        root.declare("task", true, FieldDecl::OneOf { data: None }, &mut ctx);
        {
            let candidates = root.field_mut("task").unwrap().container_mut();
            candidates.declare("X", true, FieldDecl::Number { default: Some(1.0) }, &mut ctx);
            candidates.declare("Y", true, FieldDecl::Number { default: Some(2.0) }, &mut ctx);
        }

        let node = root.field_mut("task").unwrap();
        node.update(
            &Value::Array(vec![Value::Int(0), Value::Number(5.0)]),
            &mut ctx,
        )
        .unwrap();

        // Operator edits the active X instance.
        let NodeKind::OneOf(one_of) = node.kind_mut() else {
            panic!("expected a one-of");
        };
        let NodeKind::Leaf(FormLeaf::Number(state)) =
            one_of.active.as_mut().unwrap().kind_mut()
        else {
            panic!("active variant is a number leaf");
        };
        state.edit(42.0);
        state.end_edit();

        // Switching to Y starts from Y's template default, not X's value.
        one_of
            .apply_selection(1, &Value::Number(2.0), &mut ctx)
            .unwrap();
        assert_eq!(one_of.active_index(), Some(1));
        let NodeKind::Leaf(FormLeaf::Number(state)) = one_of.active().unwrap().kind() else {
            panic!("active variant is a number leaf");
        };
        assert_eq!(state.committed(), Some(&2.0));
    }

    #[test]
    fn one_of_out_of_range_index_is_dropped() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = FormCtx {
            ids: &mut ids,
            markers: &mut markers,
        };
        let mut root = ObjectNode::new(false);
        root.declare("task", true, FieldDecl::OneOf { data: None }, &mut ctx);
        root.field_mut("task").unwrap().container_mut().declare(
            "X",
            true,
            FieldDecl::Number { default: None },
            &mut ctx,
        );
        let node = root.field_mut("task").unwrap();
        node.update(
            &Value::Array(vec![Value::Int(7), Value::Number(1.0)]),
            &mut ctx,
        )
        .unwrap();
        let NodeKind::OneOf(one_of) = node.kind() else {
            panic!("expected a one-of");
        };
        assert!(one_of.active().is_none());
    }

    #[test]
    fn locked_container_ignores_updates() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = FormCtx {
            ids: &mut ids,
            markers: &mut markers,
        };
        let mut root = ObjectNode::new(false);
        root.declare("gains", true, FieldDecl::Object, &mut ctx);
        root.field_mut("gains").unwrap().container_mut().declare(
            "p",
            true,
            FieldDecl::Number { default: Some(1.0) },
            &mut ctx,
        );

        let node = root.field_mut("gains").unwrap();
        let NodeKind::Object(object) = node.kind_mut() else {
            panic!("expected an object container");
        };
        object.locked = true;

        let mut config = IndexMap::new();
        config.insert("p".to_owned(), Value::Number(9.0));
        node.update(&Value::Map(config), &mut ctx).unwrap();

        let NodeKind::Object(object) = node.kind() else {
            panic!("expected an object container");
        };
        let NodeKind::Leaf(FormLeaf::Number(state)) = object.field("p").unwrap().kind() else {
            panic!("field `p` is a number leaf");
        };
        assert_eq!(state.committed(), Some(&1.0));
    }

    #[test]
    fn update_missing_required_field_is_an_error() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = FormCtx {
            ids: &mut ids,
            markers: &mut markers,
        };
        let mut root = ObjectNode::new(false);
        root.declare("gains", true, FieldDecl::Object, &mut ctx);
        root.field_mut("gains").unwrap().container_mut().declare(
            "p",
            true,
            FieldDecl::Number { default: None },
            &mut ctx,
        );
        let node = root.field_mut("gains").unwrap();
        let err = node.update(&Value::empty_map(), &mut ctx).unwrap_err();
        assert!(matches!(err, FormError::MissingField(name) if name == "p"));
    }

    #[test]
    fn generic_array_collects_unwrapped_scalars() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = FormCtx {
            ids: &mut ids,
            markers: &mut markers,
        };
        let mut root = ObjectNode::new(false);
        // Initial data arrives with the declaration, before the element
        // field exists; entries materialize once the template is known.
        let data = vec![Value::Number(1.0), Value::Number(2.0)];
        root.declare(
            "weights",
            true,
            FieldDecl::GenericArray {
                data: Some(data.clone()),
            },
            &mut ctx,
        );
        root.field_mut("weights").unwrap().container_mut().declare(
            "value",
            true,
            FieldDecl::Number { default: None },
            &mut ctx,
        );
        root.declare(
            "weights",
            true,
            FieldDecl::GenericArray { data: Some(data) },
            &mut ctx,
        );

        let node = root.field_mut("weights").unwrap();
        assert!(node.ready());
        let mut out = IndexMap::new();
        node.collect(&mut out);
        assert_eq!(
            out.get("weights"),
            Some(&Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]))
        );
        // Array contents are transient per-submission state.
        let NodeKind::GenericArray(array) = node.kind() else {
            panic!("expected a generic array");
        };
        assert!(array.entries().is_empty());
    }
}
