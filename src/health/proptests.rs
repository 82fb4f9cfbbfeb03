//! Property-based tests for the calculators and heuristics
//!
//! - BMI category is monotone in the BMI value
//! - Parsers never panic, whatever text the model produces
//! - Mood never influences activity suggestions

use super::calculators::{ActivityLevel, BmiCategory, Sex};
use super::*;
use proptest::prelude::*;

fn rank(category: BmiCategory) -> u8 {
    match category {
        BmiCategory::Underweight => 0,
        BmiCategory::Normal => 1,
        BmiCategory::Overweight => 2,
        BmiCategory::Obese => 3,
    }
}

proptest! {
    #[test]
    fn bmi_category_is_monotone(a in 5.0f64..80.0, b in 5.0f64..80.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(BmiCategory::from_value(lo)) <= rank(BmiCategory::from_value(hi)));
    }

    #[test]
    fn heavier_is_never_a_lower_band(w in 20.0f64..250.0, extra in 0.0f64..50.0, h in 120.0f64..220.0) {
        prop_assert!(rank(bmi(w, h).category) <= rank(bmi(w + extra, h).category));
    }

    #[test]
    fn parsed_bmi_input_is_positive(raw in ".{0,40}") {
        if let Ok((w, h)) = parse_bmi_input(&raw) {
            prop_assert!(w > 0.0 && h > 0.0);
        }
    }

    #[test]
    fn calorie_parser_is_total(raw in "[0-9a-z,. -]{0,60}") {
        let _ = parse_calorie_input(&raw);
    }

    #[test]
    fn calories_scale_with_activity(age in 1u32..100, w in 30.0f64..200.0, h in 130.0f64..210.0) {
        let sedentary = daily_calories(age, w, h, Sex::Male, ActivityLevel::Sedentary);
        let very_active = daily_calories(age, w, h, Sex::Male, ActivityLevel::VeryActive);
        if sedentary > 0.0 {
            prop_assert!(very_active > sedentary);
        }
    }

    #[test]
    fn mood_is_ignored(mood in ".{0,20}", energy in "[a-z]{0,10}") {
        prop_assert_eq!(suggest_activities(&mood, &energy), suggest_activities("", &energy));
    }

    #[test]
    fn stress_level_never_panics(text in ".{0,200}") {
        let _ = assess_stress(&text).advice();
    }
}
