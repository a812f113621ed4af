use crate::ctx::{FormCtx, IdAlloc};
use crate::decl::FieldDecl;
use crate::error::FormError;
use crate::node::ObjectNode;
use indexmap::IndexMap;
use opdeck_core::{ElementId, MarkerFactory, Outbox, Surface, Value};

/// Root of one declared form: an unnamed object container plus the id
/// allocator its nodes draw labels from.
///
/// Fields are declared (and re-declared every tick) through
/// [`Form::declare`]; nested containers are addressed by the name path the
/// client's begin/end cursor builds up. Submission collects the whole tree
/// into a single map and sends it to the form's identity.
pub struct Form {
    id: ElementId,
    root: ObjectNode,
    ids: IdAlloc,
}

impl Form {
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            root: ObjectNode::new(false),
            ids: IdAlloc::default(),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn root(&self) -> &ObjectNode {
        &self.root
    }

    /// Declares or refreshes one field inside the container at `path`.
    ///
    /// Panics when the path names a container that was never declared; the
    /// client's cursor discipline makes that a caller bug, not a data error.
    pub fn declare(
        &mut self,
        path: &[String],
        name: &str,
        required: bool,
        decl: FieldDecl,
        markers: &mut dyn MarkerFactory,
    ) {
        let Form { root, ids, .. } = self;
        let mut ctx = FormCtx { ids, markers };
        Self::container_mut(root, path).declare(name, required, decl, &mut ctx);
    }

    fn container_mut<'a>(root: &'a mut ObjectNode, path: &[String]) -> &'a mut ObjectNode {
        let mut container = root;
        for segment in path {
            let child = container
                .field_mut(segment)
                .unwrap_or_else(|| panic!("form has no container `{segment}` to descend into"));
            container = child.container_mut();
        }
        container
    }

    pub fn ready(&self) -> bool {
        self.root.ready()
    }

    /// Collects the tree and queues the submission. Refused, with the edit
    /// state left untouched, while any required field is unset.
    pub fn submit(&mut self, outbox: &mut Outbox) -> Result<(), FormError> {
        if !self.root.ready() {
            return Err(FormError::NotReady);
        }
        let mut out = IndexMap::new();
        self.root.collect_fields(&mut out);
        outbox.push(self.id.clone(), Value::Map(out));
        Ok(())
    }

    pub fn draw(
        &mut self,
        surface: &mut dyn Surface,
        outbox: &mut Outbox,
        markers: &mut dyn MarkerFactory,
    ) {
        let key = self.id.to_string();
        {
            let Form { root, ids, .. } = self;
            let mut ctx = FormCtx { ids, markers };
            root.draw_fields(surface, &mut ctx, &key);
        }
        if surface.button(&format!("{key}/submit"), &self.id.name) {
            if let Err(err) = self.submit(outbox) {
                log::error!("form {}: {err}", self.id);
            }
        }
    }

    pub fn draw_3d(&mut self) {
        self.root.draw_3d();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::FormLeaf;
    use crate::node::NodeKind;
    use opdeck_core::NullMarkerFactory;

    fn form() -> Form {
        Form::new(ElementId::new(["FSM"], "Interrupt"))
    }

    fn declare(form: &mut Form, path: &[&str], name: &str, required: bool, decl: FieldDecl) {
        let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        let mut markers = NullMarkerFactory;
        form.declare(&path, name, required, decl, &mut markers);
    }

    #[test]
    fn readiness_follows_required_fields_only() {
        let mut f = form();
        declare(&mut f, &[], "state", true, FieldDecl::Text { default: None });
        declare(
            &mut f,
            &[],
            "duration",
            false,
            FieldDecl::Number { default: None },
        );
        // Required `state` unset, optional emptiness irrelevant.
        assert!(!f.ready());

        declare(
            &mut f,
            &[],
            "state",
            true,
            FieldDecl::Text {
                default: Some("Standing".into()),
            },
        );
        assert!(f.ready());
    }

    #[test]
    fn submit_refused_until_ready_and_state_preserved() {
        let mut f = form();
        declare(&mut f, &[], "target", true, FieldDecl::Text { default: None });
        let mut outbox = Outbox::new();
        assert!(matches!(f.submit(&mut outbox), Err(FormError::NotReady)));
        assert!(outbox.is_empty());
        assert!(f.root().field("target").is_some());
    }

    #[test]
    fn submission_collects_required_and_ready_optional() {
        let mut f = form();
        declare(
            &mut f,
            &[],
            "speed",
            true,
            FieldDecl::Number {
                default: Some(0.25),
            },
        );
        declare(&mut f, &[], "comment", false, FieldDecl::Text { default: None });
        let mut outbox = Outbox::new();
        f.submit(&mut outbox).unwrap();

        let sent = outbox.drain();
        assert_eq!(sent.len(), 1);
        let map = sent[0].value.as_map().unwrap();
        assert_eq!(map.get("speed"), Some(&Value::Number(0.25)));
        // Unready optional fields are not collected.
        assert!(!map.contains_key("comment"));
    }

    #[test]
    fn nested_object_declarations_descend_by_path() {
        let mut f = form();
        declare(&mut f, &[], "gains", true, FieldDecl::Object);
        declare(
            &mut f,
            &["gains"],
            "stiffness",
            true,
            FieldDecl::Number { default: Some(5.0) },
        );
        let gains = f.root().field("gains").unwrap();
        match gains.kind() {
            NodeKind::Object(object) => assert!(object.field("stiffness").is_some()),
            _ => panic!("expected an object container"),
        }
        assert!(f.ready());
    }

    #[test]
    #[should_panic(expected = "no container")]
    fn descending_into_an_undeclared_container_is_fatal() {
        let mut f = form();
        declare(
            &mut f,
            &["missing"],
            "x",
            true,
            FieldDecl::Number { default: None },
        );
    }

    #[test]
    fn kind_change_rebuilds_the_field() {
        let mut f = form();
        declare(
            &mut f,
            &[],
            "value",
            true,
            FieldDecl::Integer { default: Some(3) },
        );
        declare(&mut f, &[], "value", true, FieldDecl::Text { default: None });
        match f.root().field("value").unwrap().kind() {
            NodeKind::Leaf(FormLeaf::Text(state)) => assert!(state.committed().is_none()),
            _ => panic!("field should have been rebuilt as text"),
        }
    }
}
