//! Module `definition`

/// One definition of a word, as found in a single database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    word: String,
    database: String,
    text: String,
}

impl Definition {
    pub fn new(word: impl Into<String>, database: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            database: database.into(),
            text: text.into(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Identifier of the database the definition came from.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Definition body, trimmed, blank lines kept as paragraph breaks.
    pub fn text(&self) -> &str {
        &self.text
    }
}
