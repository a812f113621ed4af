/// Draft/committed state for one editable element.
///
/// Every stateful element keeps three values: `committed`, the value the
/// element would currently submit (absent until either the authority
/// publishes one or the operator sets one); `draft`, the buffer the operator
/// edits against; and `authority`, the latest value the remote authority is
/// known to have published.
///
/// While `editing` is set, authority updates land in `authority` only: the
/// draft is the sole source of truth for what the operator sees and for what
/// gets submitted, until the edit session ends. This is what keeps a remote
/// writer from clobbering an in-progress edit.
#[derive(Clone, Debug)]
pub struct EditState<T> {
    committed: Option<T>,
    draft: T,
    authority: Option<T>,
    editing: bool,
}

impl<T: Clone + PartialEq> EditState<T> {
    /// Fresh state with no published value; `default` seeds the draft.
    pub fn new(default: T) -> Self {
        Self {
            committed: None,
            draft: default,
            authority: None,
            editing: false,
        }
    }

    /// State seeded from an optional published value, falling back to
    /// `default` for the draft when none was published yet.
    pub fn seeded(value: Option<T>, default: T) -> Self {
        let draft = value.clone().unwrap_or(default);
        Self {
            committed: value.clone(),
            draft,
            authority: value,
            editing: false,
        }
    }

    pub fn committed(&self) -> Option<&T> {
        self.committed.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.committed.is_some()
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    /// Mutable access to the draft buffer. Callers must have entered an edit
    /// session first; mutating the draft does not itself start one.
    pub fn draft_mut(&mut self) -> &mut T {
        &mut self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Operator starts an edit session. The draft already mirrors the
    /// committed value while idle, so there is nothing to seed.
    pub fn begin_edit(&mut self) {
        self.editing = true;
    }

    /// Buffered edit: replaces the draft without touching `committed`.
    /// Used by elements with an explicit confirm step.
    pub fn set_draft(&mut self, value: T) {
        self.editing = true;
        self.draft = value;
    }

    /// Immediate edit: the new value becomes both draft and committed.
    /// Used by form fields, where each change is locally final and the
    /// surrounding lock keeps the authority from overwriting it until the
    /// form is submitted or reset.
    pub fn edit(&mut self, value: T) {
        self.editing = true;
        self.committed = Some(value.clone());
        self.draft = value;
    }

    /// Applies an authority update. Always recorded in the bookkeeping slot;
    /// surfaced to committed/draft only while not editing.
    pub fn apply_remote(&mut self, value: T) {
        if !self.editing {
            self.committed = Some(value.clone());
            self.draft = value.clone();
        }
        self.authority = Some(value);
    }

    /// Ends the edit session, committing the draft. Returns the value to
    /// send to the authority, or `None` when the draft matches the committed
    /// value and no message is owed.
    pub fn commit(&mut self) -> Option<T> {
        self.editing = false;
        if self.committed.as_ref() == Some(&self.draft) {
            return None;
        }
        self.committed = Some(self.draft.clone());
        // The operator's value now supersedes whatever the authority sent
        // mid-edit; the next apply_remote refreshes the bookkeeping.
        self.authority = self.committed.clone();
        Some(self.draft.clone())
    }

    /// Ends the edit session without touching committed or draft. Used when
    /// the edit was consumed by something other than a commit, e.g. form
    /// collection, where the submitted payload was already taken.
    pub fn end_edit(&mut self) {
        self.editing = false;
    }

    /// Abandons the edit session and surfaces the latest authority value.
    pub fn reset(&mut self) {
        self.editing = false;
        if let Some(value) = &self.authority {
            self.committed = Some(value.clone());
            self.draft = value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_updates_do_not_clobber_a_draft() {
        let mut state = EditState::new(0.0);
        state.apply_remote(1.0);
        assert_eq!(state.draft(), &1.0);

        state.begin_edit();
        *state.draft_mut() = 2.5;
        state.apply_remote(7.0);
        // Displayed and committable value still derives from the draft.
        assert_eq!(state.draft(), &2.5);

        let sent = state.commit();
        assert_eq!(sent, Some(2.5));
        assert_eq!(state.committed(), Some(&2.5));
    }

    #[test]
    fn unchanged_draft_commits_nothing() {
        let mut state = EditState::new(String::new());
        state.apply_remote("walk".to_owned());
        state.begin_edit();
        assert_eq!(state.commit(), None);
        assert_eq!(state.committed().map(String::as_str), Some("walk"));
    }

    #[test]
    fn commit_supersedes_mid_edit_remote_value() {
        let mut state = EditState::new(0);
        state.apply_remote(1);
        state.begin_edit();
        state.set_draft(3);
        state.apply_remote(2);
        assert_eq!(state.commit(), Some(3));
        // Subsequent state is the committed draft, not the raced update.
        assert_eq!(state.committed(), Some(&3));
        assert_eq!(state.draft(), &3);
    }

    #[test]
    fn reset_surfaces_the_latest_authority_value() {
        let mut state = EditState::new(0);
        state.apply_remote(1);
        state.begin_edit();
        state.set_draft(9);
        state.apply_remote(4);
        state.reset();
        assert!(!state.is_editing());
        assert_eq!(state.committed(), Some(&4));
        assert_eq!(state.draft(), &4);
    }

    #[test]
    fn immediate_edit_sets_committed() {
        let mut state: EditState<bool> = EditState::new(false);
        assert!(!state.has_value());
        state.edit(true);
        assert!(state.has_value());
        assert!(state.is_editing());
        state.apply_remote(false);
        assert_eq!(state.committed(), Some(&true));
    }
}
