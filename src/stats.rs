use std::fmt;

/// The nine Dark Souls 2 attributes, in character-sheet order.
///
/// The declaration order is load-bearing: top-three selection and every
/// tie-break in class matching resolve by this order, first listed wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Vigor,
    Endurance,
    Vitality,
    Attunement,
    Strength,
    Dexterity,
    Adaptability,
    Intelligence,
    Faith,
}

impl Attribute {
    pub const ALL: [Attribute; 9] = [
        Attribute::Vigor,
        Attribute::Endurance,
        Attribute::Vitality,
        Attribute::Attunement,
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Adaptability,
        Attribute::Intelligence,
        Attribute::Faith,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Vigor => "Vigor",
            Attribute::Endurance => "Endurance",
            Attribute::Vitality => "Vitality",
            Attribute::Attunement => "Attunement",
            Attribute::Strength => "Strength",
            Attribute::Dexterity => "Dexterity",
            Attribute::Adaptability => "Adaptability",
            Attribute::Intelligence => "Intelligence",
            Attribute::Faith => "Faith",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per attribute. A judgment is only ever constructed with all
/// nine present; partial judgments are rejected at the parse boundary,
/// never repaired here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatVector([u32; 9]);

impl StatVector {
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn get(&self, attr: Attribute) -> u32 {
        self.0[attr as usize]
    }

    pub fn set(&mut self, attr: Attribute, value: u32) {
        self.0[attr as usize] = value;
    }

    /// The three highest attributes, ties broken by declaration order.
    pub fn top_three(&self) -> [Attribute; 3] {
        let mut attrs = Attribute::ALL;
        // Stable sort keeps declaration order among equal values.
        attrs.sort_by_key(|a| std::cmp::Reverse(self.get(*a)));
        [attrs[0], attrs[1], attrs[2]]
    }
}

impl FromIterator<(Attribute, u32)> for StatVector {
    fn from_iter<I: IntoIterator<Item = (Attribute, u32)>>(iter: I) -> Self {
        let mut v = StatVector::zeroed();
        for (attr, value) in iter {
            v.set(attr, value);
        }
        v
    }
}

/// Per-attribute arithmetic mean, rounded with `f64::round` (ties away
/// from zero, so an average of 10.5 becomes 11). Empty input yields a
/// zero-filled vector.
///
/// This is the per-question combiner: one question, one vote per provider.
pub fn combine_or_zero(judgments: &[StatVector]) -> StatVector {
    match combine_or_empty(judgments) {
        Some(v) => v,
        None => StatVector::zeroed(),
    }
}

/// Same averaging and rounding as [`combine_or_zero`], but empty input
/// yields `None` instead of a zero-filled vector.
///
/// This is the cross-question combiner: the caller must be able to tell
/// "no question produced any judgment" apart from a genuine all-zero
/// result. The two empty shapes are intentional and must not be unified.
pub fn combine_or_empty(judgments: &[StatVector]) -> Option<StatVector> {
    if judgments.is_empty() {
        return None;
    }

    let count = judgments.len() as f64;
    let combined = Attribute::ALL
        .iter()
        .map(|&attr| {
            let sum: u64 = judgments.iter().map(|j| u64::from(j.get(attr))).sum();
            (attr, (sum as f64 / count).round() as u32)
        })
        .collect();

    Some(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: u32) -> StatVector {
        Attribute::ALL.iter().map(|&a| (a, value)).collect()
    }

    #[test]
    fn test_attribute_order_is_sheet_order() {
        let names: Vec<&str> = Attribute::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "Vigor",
                "Endurance",
                "Vitality",
                "Attunement",
                "Strength",
                "Dexterity",
                "Adaptability",
                "Intelligence",
                "Faith"
            ]
        );
    }

    #[test]
    fn test_combine_single_judgment_is_identity() {
        let j = uniform(42);
        assert_eq!(combine_or_zero(&[j]), j);
    }

    #[test]
    fn test_combine_averages_each_attribute() {
        let mut a = uniform(10);
        let mut b = uniform(20);
        a.set(Attribute::Faith, 1);
        b.set(Attribute::Faith, 99);

        let combined = combine_or_zero(&[a, b]);
        assert_eq!(combined.get(Attribute::Vigor), 15);
        assert_eq!(combined.get(Attribute::Faith), 50);
    }

    #[test]
    fn test_combine_rounds_half_away_from_zero() {
        let a = uniform(10);
        let b = uniform(11);
        let combined = combine_or_zero(&[a, b]);
        // 10.5 rounds up, not to even
        assert_eq!(combined.get(Attribute::Vigor), 11);
    }

    #[test]
    fn test_combine_or_zero_empty_is_zero_filled() {
        let combined = combine_or_zero(&[]);
        for attr in Attribute::ALL {
            assert_eq!(combined.get(attr), 0);
        }
    }

    #[test]
    fn test_combine_or_empty_empty_is_none() {
        assert_eq!(combine_or_empty(&[]), None);
    }

    #[test]
    fn test_combine_entry_points_agree_on_nonempty_input() {
        let judgments = vec![uniform(7), uniform(8), uniform(12)];
        assert_eq!(
            combine_or_empty(&judgments),
            Some(combine_or_zero(&judgments))
        );
    }

    #[test]
    fn test_top_three_picks_highest() {
        let mut v = uniform(10);
        v.set(Attribute::Intelligence, 60);
        v.set(Attribute::Attunement, 50);
        v.set(Attribute::Faith, 40);
        assert_eq!(
            v.top_three(),
            [
                Attribute::Intelligence,
                Attribute::Attunement,
                Attribute::Faith
            ]
        );
    }

    #[test]
    fn test_top_three_ties_break_by_declaration_order() {
        let v = uniform(6);
        assert_eq!(
            v.top_three(),
            [Attribute::Vigor, Attribute::Endurance, Attribute::Vitality]
        );
    }

    #[test]
    fn test_top_three_partial_tie() {
        let mut v = uniform(5);
        v.set(Attribute::Strength, 30);
        // Everything else ties at 5; the earliest-declared two fill the rest.
        assert_eq!(
            v.top_three(),
            [Attribute::Strength, Attribute::Vigor, Attribute::Endurance]
        );
    }
}
