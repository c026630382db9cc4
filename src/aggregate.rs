//! Per-year tally of search results.

use crate::models::{LegislativeItem, YearCounts};
use tracing::debug;

/// Count items per year over the fixed 2020–2025 window.
///
/// Items without a year, or with a year outside the window, are skipped.
pub fn count_by_year(items: &[LegislativeItem]) -> YearCounts {
    let mut counts = YearCounts::empty();
    let mut skipped = 0usize;
    for item in items {
        let counted = item.year.is_some_and(|y| counts.record(y));
        if !counted {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!(skipped, "Items outside the year window were not counted");
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Origin;
    use crate::sources::fakes::item;

    #[test]
    fn test_counts_educacao_scenario() {
        let items = vec![
            item(Origin::Senado, Some(2021), "1"),
            item(Origin::Senado, Some(2022), "2"),
            item(Origin::Senado, Some(2022), "3"),
        ];
        let counts = count_by_year(&items);
        let got: Vec<(i32, usize)> = counts.iter().collect();
        assert_eq!(
            got,
            vec![(2020, 0), (2021, 1), (2022, 2), (2023, 0), (2024, 0), (2025, 0)]
        );
    }

    #[test]
    fn test_out_of_range_and_missing_years_excluded() {
        let items = vec![
            item(Origin::Camara, Some(2019), "1"),
            item(Origin::Camara, None, "2"),
            item(Origin::Camara, Some(2026), "3"),
            item(Origin::Camara, Some(0), "4"),
            item(Origin::Camara, Some(2025), "5"),
        ];
        let counts = count_by_year(&items);
        assert_eq!(counts.total(), 1);
        assert_eq!(counts.get(2025), Some(1));
        assert_eq!(counts.years().count(), 6);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(count_by_year(&[]), YearCounts::empty());
    }
}
