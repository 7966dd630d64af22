use std::collections::BTreeSet;

use crate::error::{PaletteError, Result};
use crate::ranker::PaletteEntry;

/// Palette numbers the user asked to hide.
pub type ExcludeSet = BTreeSet<u32>;

/// Parse `"1,3,7"` style input. Tokens are trimmed; anything that is not a
/// plain run of digits is dropped.
pub fn parse_exclude(raw: &str) -> ExcludeSet {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| token.parse::<u32>().ok())
        .collect()
}

/// Hide excluded entries and renormalize the rest.
///
/// Percentages are always recomputed from `count`, even with nothing
/// excluded, so the kept entries sum to 100. Numbers and names are carried
/// over untouched. Excluding every entry is an [`PaletteError::EmptyPalette`].
pub fn filter_palette(palette: &[PaletteEntry], exclude: &ExcludeSet) -> Result<Vec<PaletteEntry>> {
    let mut kept: Vec<PaletteEntry> = palette
        .iter()
        .filter(|entry| !exclude.contains(&entry.number))
        .cloned()
        .collect();

    let total: usize = kept.iter().map(|entry| entry.count).sum();
    if total == 0 {
        return Err(PaletteError::EmptyPalette);
    }

    for entry in &mut kept {
        entry.percentage = entry.count as f64 / total as f64 * 100.0;
    }
    Ok(kept)
}
