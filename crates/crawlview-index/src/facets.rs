use serde::Serialize;
use std::collections::HashMap;

/// A distinct value of a filterable field with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub value: String,
    pub count: usize,
}

/// Count occurrences of each non-empty value.
///
/// Output is ordered by count descending; equal counts keep the order in
/// which each value was first seen. Filter menus rely on this ordering.
pub fn build_facets<'a, I>(values: I) -> Vec<Facet>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut facets: Vec<Facet> = Vec::new();

    for value in values {
        if value.is_empty() {
            continue;
        }
        match positions.get(value) {
            Some(&idx) => facets[idx].count += 1,
            None => {
                positions.insert(value, facets.len());
                facets.push(Facet {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable: ties stay in first-seen order
    facets.sort_by(|a, b| b.count.cmp(&a.count));
    facets
}
