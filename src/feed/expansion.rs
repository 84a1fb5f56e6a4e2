use std::collections::HashSet;

/// Ids of the article cards currently showing their full body.
#[derive(Debug, Default, Clone)]
pub struct ExpansionSet {
    expanded: HashSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `id` in or out of the set. Returns true if it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_toggle_twice_cancels() {
        let mut set = ExpansionSet::new();
        assert!(set.toggle("a"));
        assert!(set.is_expanded("a"));
        assert!(!set.toggle("a"));
        assert!(!set.is_expanded("a"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_ids_are_independent() {
        let mut set = ExpansionSet::new();
        set.toggle("a");
        set.toggle("b");
        set.toggle("a");
        assert!(!set.is_expanded("a"));
        assert!(set.is_expanded("b"));
        assert_eq!(set.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_membership_is_toggle_parity(ops in prop::collection::vec(0u8..5, 0..64)) {
            let mut set = ExpansionSet::new();
            let mut counts: HashMap<String, usize> = HashMap::new();
            for op in &ops {
                let id = format!("article-{}", op);
                set.toggle(&id);
                *counts.entry(id).or_default() += 1;
            }
            for n in 0u8..5 {
                let id = format!("article-{}", n);
                let odd = counts.get(&id).copied().unwrap_or(0) % 2 == 1;
                prop_assert_eq!(set.is_expanded(&id), odd);
            }
        }
    }
}
