use crate::Probability;
use crate::cards::Hand;
use crate::cards::Hole;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("range combo must be 4 chars: {0}")]
    Combo(String),
    #[error("range weight must be in (0, 1]: {0}")]
    Weight(String),
    #[error("duplicate combo in range: {0}")]
    Duplicate(String),
}

/// a weighted distribution over concrete two-card combos,
/// parsed from the solver's `combo:weight,combo:weight,…` wire form.
/// insertion order is preserved; combos are unique; weights are in (0, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range(Vec<(Hole, Probability)>);

impl Range {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn combos(&self) -> impl Iterator<Item = (Hole, Probability)> + '_ {
        self.0.iter().copied()
    }
    /// sum of weights, i.e. the number of weighted combos in the range
    pub fn total_combos(&self) -> Probability {
        self.0.iter().map(|(_, w)| w).sum()
    }
    pub fn weight(&self, hole: Hole) -> Option<Probability> {
        self.0.iter().find(|(h, _)| *h == hole).map(|(_, w)| *w)
    }
    /// drop combos colliding with the given dead cards
    pub fn without(&self, dead: Hand) -> Range {
        Range(
            self.0
                .iter()
                .copied()
                .filter(|(h, _)| !Hand::from(*h).collides(dead))
                .collect(),
        )
    }
}

impl FromIterator<(Hole, Probability)> for Range {
    fn from_iter<I: IntoIterator<Item = (Hole, Probability)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::str::FromStr for Range {
    type Err = RangeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut combos = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (combo, weight) = entry.split_once(':').unwrap_or((entry, "1.0"));
            if combo.len() != 4 {
                return Err(RangeError::Combo(combo.to_string()));
            }
            let hole = combo
                .parse::<Hole>()
                .map_err(|_| RangeError::Combo(combo.to_string()))?;
            let weight = weight
                .parse::<Probability>()
                .map_err(|_| RangeError::Weight(weight.to_string()))?;
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(RangeError::Weight(weight.to_string()));
            }
            if combos.iter().any(|(h, _)| *h == hole) {
                return Err(RangeError::Duplicate(combo.to_string()));
            }
            combos.push((hole, weight));
        }
        Ok(Self(combos))
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, (hole, weight)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", hole, weight)?;
        }
        Ok(())
    }
}

impl crate::Arbitrary for Range {
    fn random() -> Self {
        use crate::Arbitrary;
        use rand::Rng;
        let n = rand::rng().random_range(1..20usize);
        let mut combos: Vec<(Hole, Probability)> = Vec::new();
        while combos.len() < n {
            let hole = Hole::random();
            if combos.iter().all(|(h, _)| *h != hole) {
                combos.push((hole, rand::rng().random_range(0.05..=1.0)));
            }
        }
        Self(combos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        let range = "AhKh:0.75,AsKs:1,QdQc:0.33".parse::<Range>().unwrap();
        assert_eq!(range.len(), 3);
        let text = range.to_string();
        assert_eq!(text.parse::<Range>().unwrap(), range);
    }

    #[test]
    fn bare_combo_defaults_to_full_weight() {
        let range = "AhKh".parse::<Range>().unwrap();
        assert_eq!(range.weight("AhKh".parse().unwrap()), Some(1.0));
    }

    #[test]
    fn rejects_bad_syntax() {
        assert!("AhK:0.5".parse::<Range>().is_err());
        assert!("AhKh:0".parse::<Range>().is_err());
        assert!("AhKh:1.5".parse::<Range>().is_err());
        assert!("AhKh:0.5,AhKh:0.4".parse::<Range>().is_err());
        assert!("AhKh:x".parse::<Range>().is_err());
    }

    #[test]
    fn total_combos_sums_weights() {
        let range = "AhKh:0.5,AsKs:0.25".parse::<Range>().unwrap();
        assert!((range.total_combos() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn card_removal() {
        use crate::cards::Card;
        let range = "AhKh:1,QdQc:1".parse::<Range>().unwrap();
        let dead = Hand::from("Ah".parse::<Card>().unwrap());
        let live = range.without(dead);
        assert_eq!(live.len(), 1);
        assert!(live.weight("QdQc".parse().unwrap()).is_some());
    }
}
