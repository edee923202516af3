//! Deterministic chart color assignment.

use std::collections::BTreeMap;

/// Fixed comparison palette, one color per possible region slot.
pub const PALETTE: [&str; 8] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#9333ea", "#0891b2", "#db2777", "#65a30d",
];

/// Assigns a color to each region ID in request order.
///
/// Regions carried over from `prior_colors` keep their color; new regions
/// cycle through [`PALETTE`] skipping colors already in use, so adding or
/// removing one region never recolors the rest.
#[must_use]
pub fn assign_colors(
    region_ids: &[String],
    prior_colors: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut assigned: BTreeMap<String, String> = BTreeMap::new();
    let mut in_use: Vec<&str> = Vec::new();

    for region_id in region_ids {
        if let Some(color) = prior_colors.get(region_id) {
            assigned.insert(region_id.clone(), color.clone());
            in_use.push(color.as_str());
        }
    }

    let mut next = 0usize;
    for region_id in region_ids {
        if assigned.contains_key(region_id) {
            continue;
        }
        // Find the first palette color not already held by a reused region.
        let mut color = PALETTE[next % PALETTE.len()];
        let mut probes = 0;
        while in_use.contains(&color) && probes < PALETTE.len() {
            next += 1;
            probes += 1;
            color = PALETTE[next % PALETTE.len()];
        }
        next += 1;
        in_use.push(color);
        assigned.insert(region_id.clone(), color.to_string());
    }

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|&s| s.to_string()).collect()
    }

    #[test]
    fn assigns_palette_in_request_order() {
        let colors = assign_colors(&ids(&["a", "b", "c"]), &BTreeMap::new());
        assert_eq!(colors["a"], PALETTE[0]);
        assert_eq!(colors["b"], PALETTE[1]);
        assert_eq!(colors["c"], PALETTE[2]);
    }

    #[test]
    fn identical_requests_get_identical_colors() {
        let first = assign_colors(&ids(&["x", "y", "z"]), &BTreeMap::new());
        let second = assign_colors(&ids(&["x", "y", "z"]), &BTreeMap::new());
        assert_eq!(first, second);
    }

    #[test]
    fn reused_regions_keep_their_color() {
        let prior = assign_colors(&ids(&["a", "b"]), &BTreeMap::new());
        // "b" moves to the front of the next request but keeps its color.
        let next = assign_colors(&ids(&["b", "c"]), &prior);
        assert_eq!(next["b"], PALETTE[1]);
        // "c" skips the color "b" still holds.
        assert_eq!(next["c"], PALETTE[0]);
    }

    #[test]
    fn eight_regions_exhaust_the_palette_without_repeats() {
        let all = ids(&["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"]);
        let colors = assign_colors(&all, &BTreeMap::new());
        let mut seen: Vec<&String> = colors.values().collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 8);
    }
}
