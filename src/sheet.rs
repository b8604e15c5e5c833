use crate::classes::ClassTable;
use crate::pipeline::FinalResult;
use crate::stats::Attribute;

/// Renders the final character sheet. Stats above the matched class
/// baseline get a `(+N)` annotation; an unknown class (empty table) just
/// skips the bonuses.
pub fn render(result: &FinalResult, table: &ClassTable) -> String {
    let baseline = table.profile(&result.class_name).map(|p| p.stats);

    let mut sheet = String::new();
    sheet.push_str("╔══════════════════════════════════════╗\n");
    sheet.push_str("║        BEARER OF THE CURSE           ║\n");
    sheet.push_str("╠══════════════════════════════════════╣\n");
    sheet.push_str(&format!("║ Starting Class: {:<19} ║\n", result.class_name));
    sheet.push_str(&format!("║ Level: {:<29} ║\n", result.level));
    sheet.push_str("╠══════════════════════════════════════╣\n");
    sheet.push_str("║              STATS                   ║\n");
    sheet.push_str("╠══════════════════════════════════════╣\n");

    for attr in Attribute::ALL {
        let value = result.stats.get(attr);
        let bonus = baseline
            .map(|base| value.saturating_sub(base.get(attr)))
            .unwrap_or(0);
        let bonus_str = if bonus > 0 {
            format!(" (+{bonus})")
        } else {
            String::new()
        };
        sheet.push_str(&format!(
            "║ {:<12}: {:>2}{:<10} ║\n",
            attr.name(),
            value,
            bonus_str
        ));
    }

    sheet.push_str("╚══════════════════════════════════════╝");
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatVector;

    fn table() -> ClassTable {
        ClassTable::parse(include_str!("../data/class_stats.csv")).unwrap()
    }

    fn result(class_name: &str, level: u32, stat_value: u32) -> FinalResult {
        FinalResult {
            stats: Attribute::ALL.iter().map(|&a| (a, stat_value)).collect(),
            class_name: class_name.to_string(),
            level,
            judged_questions: 5,
        }
    }

    #[test]
    fn test_render_contains_class_level_and_all_stats() {
        let sheet = render(&result("Sorcerer", 42, 30), &table());
        assert!(sheet.contains("Starting Class: Sorcerer"));
        assert!(sheet.contains("Level: 42"));
        for attr in Attribute::ALL {
            assert!(sheet.contains(attr.name()), "missing {attr}");
        }
    }

    #[test]
    fn test_render_marks_bonus_over_baseline() {
        // Warrior baseline Strength is 15; a 30 shows a +15.
        let sheet = render(&result("Warrior", 12, 30), &table());
        assert!(sheet.contains("(+15)"));
    }

    #[test]
    fn test_render_no_bonus_at_or_below_baseline() {
        let r = result("Deprived", 1, 6);
        let sheet = render(&r, &table());
        assert!(!sheet.contains("(+"));
    }

    #[test]
    fn test_render_unknown_class_skips_bonuses() {
        let sheet = render(&result("Wanderer", 10, 50), &ClassTable::default());
        assert!(sheet.contains("Starting Class: Wanderer"));
        assert!(!sheet.contains("(+"));
    }

    #[test]
    fn test_render_zeroed_sheet() {
        let r = FinalResult {
            stats: StatVector::zeroed(),
            class_name: "Deprived".to_string(),
            level: 15,
            judged_questions: 0,
        };
        let sheet = render(&r, &table());
        assert!(sheet.contains("Vigor       :  0"));
    }
}
