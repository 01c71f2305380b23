//! Static type-effectiveness chart used by the detail overlay.

/// Types each attacking type is weak to. Mirrors the classic 18-type chart;
/// types with no entry (normal-resistant ones excluded here) have no listed
/// weaknesses.
pub const WEAKNESS_CHART: &[(&str, &[&str])] = &[
    ("normal", &["fighting"]),
    ("fire", &["water", "ground", "rock"]),
    ("water", &["electric", "grass"]),
    ("electric", &["ground"]),
    ("grass", &["fire", "ice", "poison", "flying", "bug"]),
    ("ice", &["fire", "fighting", "rock", "steel"]),
    ("fighting", &["flying", "psychic", "fairy"]),
    ("poison", &["ground", "psychic"]),
    ("ground", &["water", "grass", "ice"]),
    ("flying", &["electric", "ice", "rock"]),
    ("psychic", &["bug", "ghost", "dark"]),
    ("bug", &["fire", "flying", "rock"]),
    ("rock", &["water", "grass", "fighting", "ground", "steel"]),
    ("ghost", &["ghost", "dark"]),
    ("dragon", &["ice", "dragon", "fairy"]),
    ("dark", &["fighting", "bug", "fairy"]),
    ("steel", &["fire", "fighting", "ground"]),
    ("fairy", &["poison", "steel"]),
];

/// Union of the weaknesses of every given type, first-seen order, no
/// duplicates. Unknown type names contribute nothing.
pub fn weaknesses_for(types: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for type_name in types {
        let Some((_, weak)) = WEAKNESS_CHART
            .iter()
            .find(|(name, _)| *name == type_name.as_str())
        else {
            continue;
        };
        for entry in *weak {
            if !out.iter().any(|seen| seen == entry) {
                out.push((*entry).to_string());
            }
        }
    }
    out
}
