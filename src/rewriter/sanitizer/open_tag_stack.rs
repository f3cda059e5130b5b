use crate::errors::UnmatchedEndTag;
use hashbrown::HashMap;

/// Names of the tags the sanitizer has let through and not closed yet.
///
/// Besides the ordered stack, a per-name count of open tags is kept so that
/// end tags with nothing to close are found without scanning the stack.
#[derive(Debug, Default)]
pub struct OpenTagStack {
    names: Vec<String>,
    counts: HashMap<String, usize>,
}

impl OpenTagStack {
    /// Pushes `name` and returns how many tags with this name are now open.
    pub fn push(&mut self, name: &str) -> usize {
        let name = name.to_ascii_lowercase();
        let count = self.counts.entry(name.clone()).or_insert(0);

        *count += 1;
        self.names.push(name);

        *count
    }

    /// Removes the innermost open tag called `name` and returns how many
    /// tags with this name are still open.
    pub fn pop(&mut self, name: &str) -> Result<usize, UnmatchedEndTag> {
        let name = name.to_ascii_lowercase();

        let count = match self.counts.get_mut(&name) {
            Some(count) if *count > 0 => count,
            _ => return Err(UnmatchedEndTag(name)),
        };

        *count -= 1;

        let remaining = *count;

        if let Some(idx) = self.names.iter().rposition(|open| *open == name) {
            self.names.remove(idx);
        }

        Ok(remaining)
    }

    /// Open names, innermost first.
    #[inline]
    pub fn innermost_first(&self) -> impl Iterator<Item = &str> {
        self.names.iter().rev().map(String::as_str)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
