/// Checked rows of a list page, in the order they were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a row if unchecked, uncheck it otherwise
    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.ids.iter().position(|x| x == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id.to_string());
        }
    }

    /// Header checkbox: clear when every visible row is checked, otherwise check them all
    pub fn toggle_all(&mut self, visible_ids: &[&str]) {
        if self.all_selected(visible_ids) {
            self.ids.clear();
        } else {
            self.ids = visible_ids.iter().map(|id| id.to_string()).collect();
        }
    }

    /// Whether the header checkbox reads checked
    pub fn all_selected(&self, visible_ids: &[&str]) -> bool {
        !visible_ids.is_empty() && visible_ids.iter().all(|id| self.is_selected(id))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    pub fn select(&mut self, id: &str) {
        if !self.is_selected(id) {
            self.ids.push(id.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Export needs at least one checked row
    pub fn can_export(&self) -> bool {
        !self.is_empty()
    }

    /// Selected records in list order, not selection order
    pub fn pick<'a, T, F>(&self, records: &'a [T], id_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &str,
    {
        records.iter().filter(|r| self.is_selected(id_of(r))).collect()
    }
}
