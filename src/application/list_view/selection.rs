use crate::domain::shared::ids::ReportId;

/// Which report's comment panel is open. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelSelection {
    open: Option<ReportId>,
}

impl PanelSelection {
    /// Opens `id`, or closes it if it is the one already open.
    pub fn toggle(&mut self, id: &ReportId) {
        if self.open.as_ref() == Some(id) {
            self.open = None;
        } else {
            self.open = Some(id.clone());
        }
    }

    pub fn selected(&self) -> Option<&ReportId> {
        self.open.as_ref()
    }

    pub fn is_open(&self, id: &ReportId) -> bool {
        self.open.as_ref() == Some(id)
    }

    pub fn clear(&mut self) {
        self.open = None;
    }
}
