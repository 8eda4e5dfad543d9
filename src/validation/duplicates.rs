use std::collections::{BTreeSet, HashSet};

use crate::models::Api;

/// Every name that appears more than once in `apis` (exact, case-sensitive match)
pub fn find_duplicate_names(apis: &[Api]) -> BTreeSet<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates = BTreeSet::new();

    for api in apis {
        if !seen.insert(api.name.as_str()) {
            duplicates.insert(api.name.clone());
        }
    }

    duplicates
}
