use crate::model::QuestionEntry;

/// The quiz being authored: a name plus its entries in authoring order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    name: String,
    entries: Vec<QuestionEntry>,
}

impl QuizDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Not checked locally; the backend decides whether a blank name is ok.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn entries(&self) -> &[QuestionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_entries(&self) -> bool {
        !self.is_empty()
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.entries.clear();
    }

    pub(crate) fn push(&mut self, entry: QuestionEntry) -> &QuestionEntry {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }
}
