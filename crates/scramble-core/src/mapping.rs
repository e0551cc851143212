use std::collections::HashMap;

/// Insertion-ordered table from an original name to its replacement.
///
/// Entries are write-once: a name that is already mapped keeps its first
/// replacement for the rest of the run.
#[derive(Debug, Default, Clone)]
pub struct NameMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl NameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(original)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, original: &str) -> bool {
        self.index.contains_key(original)
    }

    /// Returns the replacement for `original`, creating it with `make` on first sight.
    pub fn get_or_insert_with<F>(&mut self, original: &str, make: F) -> &str
    where
        F: FnOnce() -> String,
    {
        let i = match self.index.get(original) {
            Some(&i) => i,
            None => {
                self.entries.push((original.to_string(), make()));
                let i = self.entries.len() - 1;
                self.index.insert(original.to_string(), i);
                i
            }
        };
        &self.entries[i].1
    }

    /// Fallible form of [`NameMapping::get_or_insert_with`]; nothing is inserted on error.
    pub fn try_get_or_insert_with<F, E>(&mut self, original: &str, make: F) -> Result<&str, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        if !self.index.contains_key(original) {
            let replacement = make()?;
            self.entries.push((original.to_string(), replacement));
            self.index.insert(original.to_string(), self.entries.len() - 1);
        }
        Ok(self.get(original).unwrap_or_default())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(original, replacement)| (original.as_str(), replacement.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
