/// Page-session selection: a single nullable slot, so at most one part is
/// ever selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_id: Option<String>,
}

impl SelectionState {
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected_id = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.selected_id = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_id.is_none()
    }
}
