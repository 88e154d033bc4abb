//! End game outcome resolution: survival classification, moral brackets,
//! ending selection, and the personality summary.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    MORAL_HEROIC_MIN, MORAL_ORDINARY_MIN, SELFISH_SUMMARY_MIN, SURVIVAL_THRESHOLD, TAG_TALLY_TOP,
};

/// Moral tier derived from the final moral score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoralLabel {
    Heroic,
    Ordinary,
    Dark,
}

impl MoralLabel {
    /// Ordered brackets, first match wins. The ordering is inherited and
    /// must not be rearranged.
    #[must_use]
    pub const fn classify(moral_score: i32) -> Self {
        if moral_score >= MORAL_HEROIC_MIN {
            Self::Heroic
        } else if moral_score >= MORAL_ORDINARY_MIN {
            Self::Ordinary
        } else {
            Self::Dark
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heroic => "heroic",
            Self::Ordinary => "ordinary",
            Self::Dark => "dark",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Heroic => 0,
            Self::Ordinary => 1,
            Self::Dark => 2,
        }
    }
}

impl fmt::Display for MoralLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Six canned endings keyed by (survived, moral tier). A literal table
// rather than chained conditionals so the pairing stays auditable.
// Rows: perished, survived. Columns: heroic, ordinary, dark.
const ENDING_TABLE: [[&str; 3]; 2] = [
    [
        "You went down with the ship, but your courage and selflessness live on in the memories of the survivors and everyone who came after.",
        "Fate would not be rewritten. You sank with the ship, as perhaps history always intended.",
        "All your scheming could not outrun the final reckoning. The dark water became the end of your dark choices.",
    ],
    [
        "You made it onto a lifeboat, having done everything you could for the people around you. You lived, and you earned their lasting respect.",
        "You got off the ship alive. The night tested you, but you kept hold of your basic decency.",
        "You seized a place by any means necessary and survived. The weight on your conscience is yours to carry forever.",
    ],
];

// Personality sentences, checked strictly in this order. The selfish rule
// needs a repeat before it dominates; the rest fire on presence.
const PERSONALITY_PRIORITY: [(&str, usize, &str); 4] = [
    (
        "selfish",
        SELFISH_SUMMARY_MIN,
        "You made more than one contested call, choosing to save yourself at the decisive moment, even at others' expense.",
    ),
    (
        "brave",
        1,
        "You showed rare courage, willing to help others even in the middle of the chaos.",
    ),
    (
        "calm",
        1,
        "You stayed calm and made pragmatic choices, which made opportunities easier to seize in the confusion.",
    ),
    (
        "gentle",
        1,
        "You kept choosing to stand with people, offering care that put them at ease.",
    ),
];

const PERSONALITY_FALLBACK: &str =
    "Your choices defy easy judgment; perhaps you simply drifted with the tide.";

const TONE_SURVIVED: &str =
    "You came through the storm alive. The voyage did not kill you, but it changed you.";
const TONE_PERISHED: &str =
    "You went down into the deep, yet the mark you left on others runs deeper still.";

/// Complete summary of a finished voyage for the result screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageSummary {
    pub final_prob: f64,
    pub survived: bool,
    pub moral_score: i32,
    pub moral_label: MoralLabel,
    pub ending: String,
    pub tone: String,
    pub top_tags: Vec<(String, usize)>,
    pub tag_phrase: String,
    pub personality: String,
}

/// Pick the ending text from the literal table.
#[must_use]
pub fn ending_text(survived: bool, label: MoralLabel) -> &'static str {
    ENDING_TABLE[usize::from(survived)][label.index()]
}

/// Count the collected tags, preserving first-encounter order for ties.
#[must_use]
pub fn tally_tags(tags: &[String]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for tag in tags {
        match counts.iter_mut().find(|(name, _)| name == tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((tag.clone(), 1)),
        }
    }
    // Stable sort: equal counts keep first-encountered order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TAG_TALLY_TOP);
    counts
}

fn tag_count(tally: &[(String, usize)], tag: &str) -> usize {
    tally
        .iter()
        .find(|(name, _)| name == tag)
        .map_or(0, |(_, count)| *count)
}

/// One personality sentence from the fixed priority list.
#[must_use]
pub fn personality_text(tags: &[String]) -> &'static str {
    let mut full_tally: Vec<(String, usize)> = Vec::new();
    for tag in tags {
        match full_tally.iter_mut().find(|(name, _)| name == tag) {
            Some((_, count)) => *count += 1,
            None => full_tally.push((tag.clone(), 1)),
        }
    }
    for (tag, min_count, sentence) in PERSONALITY_PRIORITY {
        if tag_count(&full_tally, tag) >= min_count {
            return sentence;
        }
    }
    PERSONALITY_FALLBACK
}

fn render_phrase(tally: &[(String, usize)]) -> String {
    tally
        .iter()
        .map(|(tag, count)| format!("\"{tag}\" ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Combine the accumulated state into the final outcome.
///
/// `final_prob` is the base prior plus the fate modifier clamped into
/// [0, 1]; survival is a strict comparison against the threshold, so a
/// final probability of exactly 0.5 counts as not-survived.
#[must_use]
pub fn resolve(
    base_prob: f64,
    fate_mod: f64,
    moral_score: i32,
    tags: &[String],
) -> VoyageSummary {
    let final_prob = (base_prob + fate_mod).clamp(0.0, 1.0);
    let survived = final_prob > SURVIVAL_THRESHOLD;
    let moral_label = MoralLabel::classify(moral_score);
    let top_tags = tally_tags(tags);
    let tag_phrase = render_phrase(&top_tags);

    VoyageSummary {
        final_prob,
        survived,
        moral_score,
        moral_label,
        ending: ending_text(survived, moral_label).to_string(),
        tone: if survived { TONE_SURVIVED } else { TONE_PERISHED }.to_string(),
        top_tags,
        tag_phrase,
        personality: personality_text(tags).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOAT_EPSILON;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn final_prob_clamps_into_unit_interval() {
        assert!((resolve(0.3, 9.9, 0, &[]).final_prob - 1.0).abs() < f64::EPSILON);
        assert!(resolve(0.3, -9.9, 0, &[]).final_prob.abs() < f64::EPSILON);
        let mid = resolve(0.3, 0.15, 0, &[]);
        assert!((mid.final_prob - 0.45).abs() < FLOAT_EPSILON);
    }

    #[test]
    fn exactly_half_counts_as_not_survived() {
        let summary = resolve(0.3, 0.2, 0, &[]);
        assert!((summary.final_prob - 0.5).abs() < f64::EPSILON);
        assert!(!summary.survived);
        // Just above the threshold flips it.
        assert!(resolve(0.3, 0.201, 0, &[]).survived);
    }

    #[test]
    fn moral_bracket_boundaries() {
        assert_eq!(MoralLabel::classify(5), MoralLabel::Heroic);
        assert_eq!(MoralLabel::classify(4), MoralLabel::Ordinary);
        assert_eq!(MoralLabel::classify(0), MoralLabel::Ordinary);
        assert_eq!(MoralLabel::classify(-1), MoralLabel::Dark);
    }

    #[test]
    fn ending_table_is_six_distinct_strings() {
        let mut seen = std::collections::HashSet::new();
        for survived in [false, true] {
            for label in [MoralLabel::Heroic, MoralLabel::Ordinary, MoralLabel::Dark] {
                assert!(seen.insert(ending_text(survived, label)));
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn tally_orders_by_count_then_first_seen() {
        let tally = tally_tags(&tags(&["brave", "brave", "calm", "brave"]));
        assert_eq!(tally[0], ("brave".to_string(), 3));
        assert_eq!(tally[1], ("calm".to_string(), 1));

        // Tie between calm and gentle: calm appeared first.
        let tally = tally_tags(&tags(&["calm", "gentle", "gentle", "calm", "brave"]));
        assert_eq!(tally[0], ("calm".to_string(), 2));
        assert_eq!(tally[1], ("gentle".to_string(), 2));
        assert_eq!(tally[2], ("brave".to_string(), 1));
    }

    #[test]
    fn tally_keeps_at_most_three_entries() {
        let tally = tally_tags(&tags(&["a", "b", "c", "d"]));
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn personality_selects_brave_when_selfish_count_is_low() {
        let collected = tags(&["brave", "brave", "calm", "brave", "selfish"]);
        let sentence = personality_text(&collected);
        assert!(sentence.contains("courage"));
    }

    #[test]
    fn repeated_selfishness_outranks_every_other_tag() {
        let collected = tags(&["brave", "selfish", "calm", "selfish", "gentle"]);
        let sentence = personality_text(&collected);
        assert!(sentence.contains("save yourself"));
    }

    #[test]
    fn personality_priority_walks_down_the_list() {
        assert!(personality_text(&tags(&["calm", "gentle"])).contains("pragmatic"));
        assert!(personality_text(&tags(&["gentle"])).contains("stand with people"));
        assert_eq!(personality_text(&tags(&["unknown"])), PERSONALITY_FALLBACK);
        assert_eq!(personality_text(&[]), PERSONALITY_FALLBACK);
    }

    #[test]
    fn summary_binds_table_and_phrase_together() {
        let collected = tags(&["brave", "brave", "calm", "brave"]);
        let summary = resolve(0.7, 0.0, 6, &collected);
        assert!(summary.survived);
        assert_eq!(summary.moral_label, MoralLabel::Heroic);
        assert_eq!(summary.ending, ending_text(true, MoralLabel::Heroic));
        assert!(summary.tag_phrase.starts_with("\"brave\" (3)"));
        assert_eq!(summary.tone, TONE_SURVIVED);
    }
}
