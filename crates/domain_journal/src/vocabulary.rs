//! Positional and technical vocabulary
//!
//! Canonical names are what reports display; aliases are what athletes
//! actually write in their notes. Matching is case-insensitive on word
//! boundaries, and a longer alias claims its text before a shorter one
//! ("back mount" is back control, not mount).

use once_cell::sync::Lazy;
use std::ops::Range;

use core_kernel::text::{collapse_whitespace, find_phrase, slugify};

/// A canonical term and the phrases that refer to it
#[derive(Debug, Clone)]
pub struct Term {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

pub static POSITIONS: Lazy<Vec<Term>> = Lazy::new(|| {
    vec![
        Term { canonical: "closed guard", aliases: &["closed guard", "full guard"] },
        Term {
            canonical: "half guard",
            aliases: &["half guard", "half-guard", "deep half", "knee shield", "z guard"],
        },
        Term { canonical: "butterfly guard", aliases: &["butterfly guard", "butterfly"] },
        Term {
            canonical: "de la riva",
            aliases: &["de la riva", "reverse de la riva", "dlr", "rdlr"],
        },
        Term { canonical: "spider guard", aliases: &["spider guard", "spider", "lasso"] },
        Term { canonical: "x guard", aliases: &["x guard", "x-guard", "single leg x", "slx"] },
        Term { canonical: "open guard", aliases: &["open guard", "seated guard", "collar sleeve"] },
        Term {
            canonical: "side control",
            aliases: &["side control", "side mount", "cross side", "100 kilos"],
        },
        Term { canonical: "mount", aliases: &["mount", "mounted", "full mount"] },
        Term {
            canonical: "back control",
            aliases: &[
                "back control", "back mount", "back take", "took the back", "took my back",
                "body triangle", "seatbelt",
            ],
        },
        Term { canonical: "knee on belly", aliases: &["knee on belly", "knee-on-belly", "kob"] },
        Term { canonical: "north south", aliases: &["north south", "north-south"] },
        Term { canonical: "turtle", aliases: &["turtle", "turtled"] },
        Term {
            canonical: "standing",
            aliases: &["standing", "takedown", "takedowns", "wrestling", "clinch"],
        },
        Term {
            canonical: "leg entanglement",
            aliases: &[
                "leg entanglement", "ashi garami", "saddle", "inside sankaku", "50/50",
                "fifty fifty",
            ],
        },
    ]
});

pub static TECHNIQUES: Lazy<Vec<Term>> = Lazy::new(|| {
    vec![
        Term { canonical: "armbar", aliases: &["armbar", "arm bar", "juji gatame"] },
        Term { canonical: "triangle", aliases: &["triangle choke", "triangle", "sankaku jime"] },
        Term { canonical: "arm triangle", aliases: &["arm triangle", "kata gatame"] },
        Term { canonical: "kimura", aliases: &["kimura"] },
        Term { canonical: "americana", aliases: &["americana"] },
        Term { canonical: "omoplata", aliases: &["omoplata"] },
        Term { canonical: "rear naked choke", aliases: &["rear naked choke", "rnc", "mata leao"] },
        Term { canonical: "guillotine", aliases: &["guillotine"] },
        Term { canonical: "bow and arrow", aliases: &["bow and arrow"] },
        Term { canonical: "cross collar choke", aliases: &["cross collar choke", "cross collar"] },
        Term { canonical: "ezekiel", aliases: &["ezekiel"] },
        Term { canonical: "darce", aliases: &["darce", "d'arce"] },
        Term { canonical: "anaconda", aliases: &["anaconda"] },
        Term { canonical: "heel hook", aliases: &["heel hook", "heelhook"] },
        Term { canonical: "kneebar", aliases: &["kneebar", "knee bar"] },
        Term {
            canonical: "straight ankle lock",
            aliases: &["straight ankle lock", "ankle lock", "straight foot lock"],
        },
        Term { canonical: "toe hold", aliases: &["toe hold", "toehold"] },
        Term { canonical: "knee slice", aliases: &["knee slice", "knee cut"] },
        Term { canonical: "torreando", aliases: &["torreando", "toreando", "bullfighter pass"] },
        Term { canonical: "leg drag", aliases: &["leg drag"] },
        Term { canonical: "over under pass", aliases: &["over under pass", "over under", "over-under"] },
        Term { canonical: "double under pass", aliases: &["double under pass", "double under", "stack pass"] },
        Term { canonical: "scissor sweep", aliases: &["scissor sweep"] },
        Term { canonical: "hip bump sweep", aliases: &["hip bump sweep", "hip bump"] },
        Term { canonical: "flower sweep", aliases: &["flower sweep", "pendulum sweep"] },
        Term { canonical: "berimbolo", aliases: &["berimbolo"] },
        Term { canonical: "double leg", aliases: &["double leg takedown", "double leg"] },
        Term { canonical: "single leg", aliases: &["single leg takedown", "single leg"] },
        Term { canonical: "arm drag", aliases: &["arm drag"] },
        Term { canonical: "hip escape", aliases: &["hip escape", "shrimp", "shrimping"] },
        Term { canonical: "bridge escape", aliases: &["bridge escape", "bridge and roll", "upa"] },
    ]
});

/// Drills suggested for a position that keeps leaking
pub fn drills_for(position: &str) -> Vec<String> {
    let drills: &[&str] = match position {
        "closed guard" => &["hip bump to kimura chain", "scissor sweep reps"],
        "half guard" => &["underhook recovery from bottom half", "knee shield frame drill"],
        "butterfly guard" => &["butterfly hook elevation reps"],
        "de la riva" => &["de la riva hook retention"],
        "spider guard" => &["spider guard lasso retention"],
        "x guard" => &["x guard entry from butterfly"],
        "open guard" => &["guard retention hip-out circuit", "grip fighting from seated guard"],
        "side control" => &["frame and shrimp side control escape", "underhook recovery from bottom side control"],
        "mount" => &["elbow-knee mount escape reps", "upa escape reps"],
        "back control" => &["clear the seatbelt back escape", "hand fighting from back control"],
        "knee on belly" => &["knee on belly turn-in escape"],
        "north south" => &["north south escape reps"],
        "turtle" => &["turtle recovery to guard", "sit-out from turtle"],
        "standing" => &["sprawl and snap-down reps", "single leg finish chain"],
        "leg entanglement" => &["heel exposure defence rolls", "leg entanglement exit drill"],
        _ => &[],
    };
    if drills.is_empty() {
        vec![format!("positional sparring from {}", position)]
    } else {
        drills.iter().map(|d| d.to_string()).collect()
    }
}

/// Canonical position for free text, if it names a known position
pub fn canonical_position(text: &str) -> Option<&'static str> {
    canonical_in(&POSITIONS, text)
}

/// Canonical technique for free text, if it names a known technique
pub fn canonical_technique(text: &str) -> Option<&'static str> {
    canonical_in(&TECHNIQUES, text)
}

/// Normalises a position label: canonical name when known, else the
/// lower-cased, whitespace-collapsed text
pub fn normalize_position(text: &str) -> String {
    canonical_position(text)
        .map(str::to_string)
        .unwrap_or_else(|| collapse_whitespace(&text.to_lowercase()))
}

fn canonical_in(terms: &[Term], text: &str) -> Option<&'static str> {
    let normalized = collapse_whitespace(&text.to_lowercase());
    let slug = slugify(&normalized);
    terms
        .iter()
        .find(|t| {
            t.aliases
                .iter()
                .any(|a| *a == normalized || slugify(a) == slug)
        })
        .map(|t| t.canonical)
}

/// Canonical terms mentioned in `text`, in order of first mention
///
/// Overlapping alias matches are resolved in favour of the longer alias.
pub fn mentions(terms: &[Term], text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut hits: Vec<(Range<usize>, &'static str)> = terms
        .iter()
        .flat_map(|t| {
            t.aliases
                .iter()
                .flat_map(|alias| find_phrase(&lower, alias))
                .map(move |r| (r, t.canonical))
                .collect::<Vec<_>>()
        })
        .collect();

    // Longest first, then earliest, so longer aliases claim their span.
    hits.sort_by(|a, b| {
        (b.0.end - b.0.start)
            .cmp(&(a.0.end - a.0.start))
            .then(a.0.start.cmp(&b.0.start))
    });

    let mut claimed: Vec<(Range<usize>, &'static str)> = Vec::new();
    for (range, canonical) in hits {
        let overlaps = claimed
            .iter()
            .any(|(r, _)| range.start < r.end && r.start < range.end);
        if !overlaps {
            claimed.push((range, canonical));
        }
    }
    claimed.sort_by_key(|(r, _)| r.start);

    let mut ordered = Vec::new();
    for (_, canonical) in claimed {
        if !ordered.contains(&canonical) {
            ordered.push(canonical);
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_alias_wins() {
        let found = mentions(&POSITIONS, "Got stuck under back mount, later got mount.");
        assert_eq!(found, vec!["back control", "mount"]);
    }

    #[test]
    fn test_canonical_lookup_by_alias_and_slug() {
        assert_eq!(canonical_position("DLR"), Some("de la riva"));
        assert_eq!(canonical_position("Half-Guard"), Some("half guard"));
        assert_eq!(canonical_technique("Rear Naked Choke"), Some("rear naked choke"));
        assert_eq!(canonical_position("crucifix"), None);
    }

    #[test]
    fn test_normalize_unknown_position() {
        assert_eq!(normalize_position("  Crucifix   Top "), "crucifix top");
        assert_eq!(normalize_position("side mount"), "side control");
    }

    #[test]
    fn test_drills_fallback() {
        assert_eq!(drills_for("mount").len(), 2);
        assert_eq!(drills_for("crucifix"), vec!["positional sparring from crucifix".to_string()]);
    }
}
