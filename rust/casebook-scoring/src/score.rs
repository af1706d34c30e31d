use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// How suspicious a finding is, as determined by an analysis module.
///
/// [`Significance::Unknown`] means no analysis has been performed for the
/// object yet; [`Significance::None`] means analysis ran and found nothing
/// notable. The remaining levels express increasing badness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Significance {
    /// No analysis has been performed to ascertain significance
    Unknown,
    /// Analysis ran and the object is good
    None,
    /// Mildly suspicious
    Low,
    /// Suspicious
    Medium,
    /// Bad and notable
    High,
}

impl Significance {
    /// The stable integer code used when persisting this variant.
    pub fn id(&self) -> i64 {
        match self {
            Significance::Unknown => 0,
            Significance::None => 1,
            Significance::Low => 2,
            Significance::Medium => 3,
            Significance::High => 4,
        }
    }

    /// Decode a persisted integer code. Unrecognized codes decode to
    /// [`Significance::None`].
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => Significance::Unknown,
            1 => Significance::None,
            2 => Significance::Low,
            3 => Significance::Medium,
            4 => Significance::High,
            _ => Significance::None,
        }
    }

    /// The display name for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Significance::Unknown => "Unknown",
            Significance::None => "None",
            Significance::Low => "Low",
            Significance::Medium => "Medium",
            Significance::High => "High",
        }
    }

    /// Look a variant up by its display name. Unrecognized names resolve
    /// to [`Significance::None`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Unknown" => Significance::Unknown,
            "None" => Significance::None,
            "Low" => Significance::Low,
            "Medium" => Significance::Medium,
            "High" => Significance::High,
            _ => Significance::None,
        }
    }

    // Severity order, declared explicitly so that reordering the variant
    // declarations can never change aggregation results.
    fn rank(&self) -> u8 {
        match self {
            Significance::Unknown => 0,
            Significance::None => 1,
            Significance::Low => 2,
            Significance::Medium => 3,
            Significance::High => 4,
        }
    }
}

impl Ord for Significance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Significance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Significance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How trustworthy a [`Significance`] determination is.
///
/// Higher confidence implies fewer false positives. An independent axis
/// from [`Significance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    /// No confidence determination
    None,
    /// Lowest confidence
    Lowest,
    /// Low confidence
    Low,
    /// Medium confidence
    Medium,
    /// High confidence
    High,
    /// Highest confidence
    Highest,
}

impl Confidence {
    /// The stable integer code used when persisting this variant.
    pub fn id(&self) -> i64 {
        match self {
            Confidence::None => 0,
            Confidence::Lowest => 1,
            Confidence::Low => 2,
            Confidence::Medium => 3,
            Confidence::High => 4,
            Confidence::Highest => 5,
        }
    }

    /// Decode a persisted integer code. Unrecognized codes decode to
    /// [`Confidence::None`].
    pub fn from_id(id: i64) -> Self {
        match id {
            0 => Confidence::None,
            1 => Confidence::Lowest,
            2 => Confidence::Low,
            3 => Confidence::Medium,
            4 => Confidence::High,
            5 => Confidence::Highest,
            _ => Confidence::None,
        }
    }

    /// The display name for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Confidence::None => "None",
            Confidence::Lowest => "Lowest",
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
            Confidence::Highest => "Highest",
        }
    }

    /// Look a variant up by its display name. Unrecognized names resolve
    /// to [`Confidence::None`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "None" => Confidence::None,
            "Lowest" => Confidence::Lowest,
            "Low" => Confidence::Low,
            "Medium" => Confidence::Medium,
            "High" => Confidence::High,
            "Highest" => Confidence::Highest,
            _ => Confidence::None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Confidence::None => 0,
            Confidence::Lowest => 1,
            Confidence::Low => 2,
            Confidence::Medium => 3,
            Confidence::High => 4,
            Confidence::Highest => 5,
        }
    }
}

impl Ord for Confidence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Confidence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Confidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The aggregate score of an object: a ([`Significance`], [`Confidence`])
/// pair summarizing the most severe analysis result recorded against it.
///
/// Scores are totally ordered for aggregation purposes. Significance is
/// the primary key and confidence the secondary: a score with higher
/// significance is always worse than one with lower significance,
/// regardless of confidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    /// How suspicious the underlying finding is
    pub significance: Significance,
    /// How trustworthy the significance determination is
    pub confidence: Confidence,
}

impl Score {
    /// The score of an object no analysis result has been recorded for.
    pub const UNKNOWN: Score = Score {
        significance: Significance::Unknown,
        confidence: Confidence::None,
    };

    /// The score of an object analysis has cleared as good.
    pub const NONE: Score = Score {
        significance: Significance::None,
        confidence: Confidence::None,
    };

    /// Construct a score from its two components. Any combination is
    /// legal.
    pub fn new(significance: Significance, confidence: Confidence) -> Self {
        Score {
            significance,
            confidence,
        }
    }

    /// Whether this result score should replace `current` as an object's
    /// aggregate score.
    ///
    /// True when this score strictly exceeds `current`, and also when
    /// `current` is [`Score::UNKNOWN`] and this score is not: the first
    /// real determination always wins, even a "good" one. That exception
    /// is a deliberate business rule; an object that has been analyzed
    /// and cleared is in a different state than one never analyzed.
    pub fn supersedes(&self, current: &Score) -> bool {
        if *current == Score::UNKNOWN && *self != Score::UNKNOWN {
            return true;
        }
        self > current
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significance
            .cmp(&other.significance)
            .then(self.confidence.cmp(&other.confidence))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.significance, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_orders_by_significance_before_confidence() {
        let low_high = Score::new(Significance::Low, Confidence::Highest);
        let medium_lowest = Score::new(Significance::Medium, Confidence::Lowest);

        assert!(medium_lowest > low_high);

        let medium_low = Score::new(Significance::Medium, Confidence::Low);
        assert!(medium_lowest < medium_low);
    }

    #[test]
    fn it_compares_equal_scores_as_equal() {
        let score = Score::new(Significance::High, Confidence::Medium);
        assert_eq!(score.cmp(&score), Ordering::Equal);
        assert_eq!(score, Score::new(Significance::High, Confidence::Medium));
    }

    #[test]
    fn it_lets_any_determination_supersede_unknown() {
        assert!(Score::NONE.supersedes(&Score::UNKNOWN));
        assert!(
            Score::new(Significance::High, Confidence::Lowest).supersedes(&Score::UNKNOWN)
        );
        assert!(!Score::UNKNOWN.supersedes(&Score::UNKNOWN));
    }

    #[test]
    fn it_never_lets_a_lesser_score_supersede() {
        let current = Score::new(Significance::Low, Confidence::Low);
        let good_but_confident = Score::new(Significance::None, Confidence::Highest);

        assert!(!good_but_confident.supersedes(&current));
        assert!(!current.supersedes(&current));
    }

    #[test]
    fn it_decodes_unrecognized_ids_as_none() {
        assert_eq!(Significance::from_id(99), Significance::None);
        assert_eq!(Confidence::from_id(-1), Confidence::None);

        for significance in [
            Significance::Unknown,
            Significance::None,
            Significance::Low,
            Significance::Medium,
            Significance::High,
        ] {
            assert_eq!(Significance::from_id(significance.id()), significance);
        }
    }

    #[test]
    fn it_resolves_display_names() {
        assert_eq!(Significance::from_name("High"), Significance::High);
        assert_eq!(Significance::from_name("???"), Significance::None);
        assert_eq!(Confidence::from_name("Highest"), Confidence::Highest);
        assert_eq!(
            Score::new(Significance::Medium, Confidence::High).to_string(),
            "Medium/High"
        );
    }
}
