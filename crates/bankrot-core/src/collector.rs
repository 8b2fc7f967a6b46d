use crate::records::LookupOutcome;

/// Append-only, insertion-ordered store of lookup outcomes
#[derive(Debug, Default)]
pub struct Collector {
    items: Vec<LookupOutcome>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome. No deduplication is done.
    pub fn add(&mut self, outcome: LookupOutcome) {
        self.items.push(outcome);
    }

    /// Outcome at `index`, if any
    pub fn get(&self, index: usize) -> Option<&LookupOutcome> {
        self.items.get(index)
    }

    /// All outcomes in the order they were added
    pub fn all(&self) -> &[LookupOutcome] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &LookupOutcome> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of outcomes with a positive verdict
    pub fn found_count(&self) -> usize {
        self.items.iter().filter(|o| o.found).count()
    }
}
