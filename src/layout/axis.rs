use crate::chart::Quarter;

/// Enumerates every quarter from `(start_year, start_quarter)` through
/// `(end_year, end_quarter)` inclusive. An inverted year range yields no columns.
pub fn build_axis(start_year: i32, start_quarter: u8, end_year: i32, end_quarter: u8) -> Vec<Quarter> {
    let mut quarters = Vec::new();
    if end_year < start_year {
        return quarters;
    }
    for year in start_year..=end_year {
        let first = if year == start_year { start_quarter } else { 1 };
        let last = if year == end_year { end_quarter } else { 4 };
        for quarter in first..=last {
            quarters.push(Quarter::new(year, quarter));
        }
    }
    quarters
}

/// Column index of `(year, quarter)` on the axis, if the axis covers it.
pub fn find_quarter_index(axis: &[Quarter], year: i32, quarter: u8) -> Option<usize> {
    axis.iter()
        .position(|q| q.year == year && q.quarter == quarter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_len(start_year: i32, start_q: u8, end_year: i32, end_q: u8) -> usize {
        ((end_year - start_year) * 4 - start_q as i32 + end_q as i32 + 1) as usize
    }

    #[test]
    fn single_year_covers_requested_quarters() {
        let axis = build_axis(2024, 1, 2024, 4);
        let labels: Vec<String> = axis.iter().map(|q| q.to_string()).collect();
        assert_eq!(labels, vec!["Q1 2024", "Q2 2024", "Q3 2024", "Q4 2024"]);
    }

    #[test]
    fn spans_years_contiguously() {
        for (sy, sq, ey, eq) in [(2023, 3, 2025, 2), (2024, 4, 2025, 1), (2020, 1, 2024, 4), (2024, 2, 2024, 2)] {
            let axis = build_axis(sy, sq, ey, eq);
            assert_eq!(axis.len(), expected_len(sy, sq, ey, eq), "{sy}Q{sq}-{ey}Q{eq}");
            assert_eq!(axis.first(), Some(&Quarter::new(sy, sq)));
            assert_eq!(axis.last(), Some(&Quarter::new(ey, eq)));
            for pair in axis.windows(2) {
                assert_eq!(pair[0].next(), pair[1]);
            }
        }
    }

    #[test]
    fn inverted_year_range_is_empty() {
        assert!(build_axis(2025, 1, 2024, 4).is_empty());
    }

    #[test]
    fn inverted_quarters_in_one_year_are_empty() {
        assert!(build_axis(2024, 3, 2024, 2).is_empty());
    }

    #[test]
    fn finds_columns_on_axis() {
        let axis = build_axis(2024, 3, 2025, 2);
        assert_eq!(find_quarter_index(&axis, 2024, 3), Some(0));
        assert_eq!(find_quarter_index(&axis, 2025, 1), Some(2));
        assert_eq!(find_quarter_index(&axis, 2024, 1), None);
        assert_eq!(find_quarter_index(&[], 2024, 1), None);
    }
}
