use super::dto::Macros;

pub const PROTEIN_RATIO: f64 = 0.25;
pub const CARBS_RATIO: f64 = 0.45;
pub const FAT_RATIO: f64 = 0.30;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Fixed 25/45/30 split. Grams are truncated so the split never exceeds the target.
pub fn allocate_macros(daily_calories: i64) -> Macros {
    let kcal = daily_calories.max(0) as f64;
    Macros {
        protein_g: (kcal * PROTEIN_RATIO / KCAL_PER_G_PROTEIN) as u32,
        carbs_g: (kcal * CARBS_RATIO / KCAL_PER_G_CARBS) as u32,
        fat_g: (kcal * FAT_RATIO / KCAL_PER_G_FAT) as u32,
    }
}
