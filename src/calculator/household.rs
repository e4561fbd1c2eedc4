use crate::factors::EmissionFactors;
use crate::types::HouseholdProfile;

/// Fixed per-capita baseline. Purely local.
pub fn calculate(profile: &HouseholdProfile, factors: &EmissionFactors) -> f64 {
    f64::from(profile.household_size) * factors.household_kg_per_person
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DietType, ShoppingFrequency};

    #[test]
    fn baseline_is_500_per_person() {
        let factors = EmissionFactors::default();
        for size in 1..=20u32 {
            let profile = HouseholdProfile {
                household_size: size,
                diet_type: DietType::Vegan,
                shopping_frequency: ShoppingFrequency::Minimal,
            };
            assert_eq!(calculate(&profile, &factors), 500.0 * f64::from(size));
        }
    }
}
