use crate::Chips;

/// bet-size taxonomy over pot fractions. boundary values round up:
/// a bet of exactly 0.25 pot is medium-small, not small.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeCategory {
    Small,
    MediumSmall,
    Medium,
    Large,
    Overbet,
    MassiveOverbet,
}

/// the upper (exclusive) pot-fraction bound of each category below
/// massive-overbet. empirical values; carried in configuration rather
/// than assumed structurally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingBounds(pub [f32; 5]);

impl Default for SizingBounds {
    fn default() -> Self {
        Self([0.25, 0.50, 0.80, 1.10, 2.0])
    }
}

impl SizeCategory {
    pub fn from_pot_fraction(fraction: f32, bounds: &SizingBounds) -> Self {
        const LADDER: [SizeCategory; 5] = [
            SizeCategory::Small,
            SizeCategory::MediumSmall,
            SizeCategory::Medium,
            SizeCategory::Large,
            SizeCategory::Overbet,
        ];
        bounds
            .0
            .iter()
            .zip(LADDER)
            .find(|(bound, _)| fraction < **bound)
            .map(|(_, category)| category)
            .unwrap_or(SizeCategory::MassiveOverbet)
    }
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumSmall => "medium-small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Overbet => "overbet",
            Self::MassiveOverbet => "massive-overbet",
        }
    }
    pub const fn index(&self) -> usize {
        *self as usize
    }
    pub fn is_large(&self) -> bool {
        *self >= Self::Large
    }
}

/// a classified bet size: the category plus the raw pot fraction.
/// the fraction is computed against the actual pot of the snapshot;
/// the raw amount comes from the solver action string.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sizing {
    pub category: SizeCategory,
    pub pot_fraction: f32,
}

impl Sizing {
    pub fn classify(amount: Chips, pot: Chips, bounds: &SizingBounds) -> Option<Self> {
        if pot <= 0.0 || amount <= 0.0 {
            return None;
        }
        let pot_fraction = amount / pot;
        Some(Self {
            category: SizeCategory::from_pot_fraction(pot_fraction, bounds),
            pot_fraction,
        })
    }
}

impl std::fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy() {
        let ref bounds = SizingBounds::default();
        assert_eq!(
            SizeCategory::from_pot_fraction(0.10, bounds),
            SizeCategory::Small
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(0.33, bounds),
            SizeCategory::MediumSmall
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(0.66, bounds),
            SizeCategory::Medium
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(1.0, bounds),
            SizeCategory::Large
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(1.5, bounds),
            SizeCategory::Overbet
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(3.0, bounds),
            SizeCategory::MassiveOverbet
        );
    }

    #[test]
    fn boundaries_round_up() {
        let ref bounds = SizingBounds::default();
        assert_eq!(
            SizeCategory::from_pot_fraction(0.25, bounds),
            SizeCategory::MediumSmall
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(0.50, bounds),
            SizeCategory::Medium
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(0.80, bounds),
            SizeCategory::Large
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(1.10, bounds),
            SizeCategory::Overbet
        );
        assert_eq!(
            SizeCategory::from_pot_fraction(2.0, bounds),
            SizeCategory::MassiveOverbet
        );
    }

    #[test]
    fn monotone_in_amount() {
        let ref bounds = SizingBounds::default();
        let pot = 10.0;
        let mut last = 0;
        for amount in [1.0, 3.0, 6.0, 9.5, 12.0, 25.0] {
            let sizing = Sizing::classify(amount, pot, bounds).unwrap();
            assert!(sizing.category.index() >= last);
            last = sizing.category.index();
        }
    }
}
