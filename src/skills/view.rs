use std::collections::HashSet;

/// Session view over the library enumeration: a case-insensitive substring
/// filter, a cursor into the filtered list, and a deletion overlay. The
/// enumeration itself is immutable for the session; deletion masks indices
/// instead of re-reading the library.
#[derive(Clone, Debug, Default)]
pub struct SkillsView {
    names: Vec<String>,
    deleted: HashSet<usize>,
    query: String,
    filtered: Vec<usize>,
    cursor: usize,
}

impl SkillsView {
    pub fn new(names: Vec<String>) -> Self {
        let filtered = (0..names.len()).collect();
        Self {
            names,
            deleted: HashSet::new(),
            query: String::new(),
            filtered,
            cursor: 0,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Index of a non-deleted skill by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .filter(|index| !self.deleted.contains(index))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.apply_filter();
    }

    /// Skill indices matching the query, in enumeration order.
    pub fn filtered(&self) -> &[usize] {
        &self.filtered
    }

    pub fn visible_names(&self) -> Vec<String> {
        self.filtered
            .iter()
            .map(|&index| self.names[index].clone())
            .collect()
    }

    /// Cursor position within the filtered list, `None` when it is empty.
    pub fn cursor(&self) -> Option<usize> {
        if self.filtered.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position;
        self.clamp_cursor();
    }

    /// Skill index under the cursor.
    pub fn current(&self) -> Option<usize> {
        self.cursor().map(|position| self.filtered[position])
    }

    pub fn is_deleted(&self, index: usize) -> bool {
        self.deleted.contains(&index)
    }

    /// Masks an index out of every future view. Returns false when it was
    /// already deleted so retries stay no-ops.
    pub fn mark_deleted(&mut self, index: usize) -> bool {
        if index >= self.names.len() || !self.deleted.insert(index) {
            return false;
        }
        self.apply_filter();
        true
    }

    pub fn active_count(&self) -> usize {
        self.names.len() - self.deleted.len()
    }

    fn apply_filter(&mut self) {
        let term = self.query.to_lowercase();
        self.filtered = self
            .names
            .iter()
            .enumerate()
            .filter(|(index, name)| {
                !self.deleted.contains(index)
                    && (term.is_empty() || name.to_lowercase().contains(&term))
            })
            .map(|(index, _)| index)
            .collect();
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.filtered.len() {
            self.cursor = self.filtered.len() - 1;
        }
    }
}
