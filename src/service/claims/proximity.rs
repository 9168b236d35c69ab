//! Positional association of references with case identifiers

use super::patterns::CaseMention;

/// Pick the case whose nearest occurrence is closest to `offset`
///
/// Distance is measured between start offsets. On a tie the case listed first
/// wins. Returns `None` when no case is mentioned at all.
pub fn nearest_case(offset: usize, mentions: &[CaseMention]) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;

    for mention in mentions {
        let Some(distance) = mention.offsets.iter().map(|o| o.abs_diff(offset)).min() else {
            continue;
        };

        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((mention.id.as_str(), distance)),
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(id: &str, offsets: &[usize]) -> CaseMention {
        CaseMention {
            id: id.to_string(),
            offsets: offsets.to_vec(),
        }
    }

    #[test]
    fn test_closest_case_wins() {
        let mentions = vec![mention("HC 161.450", &[0]), mention("RE 1.513.210", &[60])];

        // reference 5 characters after the first case, 40 before the second
        assert_eq!(nearest_case(15, &mentions), Some("HC 161.450"));
        assert_eq!(nearest_case(55, &mentions), Some("RE 1.513.210"));
    }

    #[test]
    fn test_every_occurrence_counts() {
        let mentions = vec![mention("HC 161.450", &[0, 100]), mention("RE 1.513.210", &[60])];
        assert_eq!(nearest_case(95, &mentions), Some("HC 161.450"));
    }

    #[test]
    fn test_tie_goes_to_first_listed_case() {
        let mentions = vec![mention("HC 1", &[0, 50]), mention("RE 2", &[10])];
        assert_eq!(nearest_case(30, &mentions), Some("HC 1"));
    }

    #[test]
    fn test_no_cases() {
        assert_eq!(nearest_case(10, &[]), None);
    }
}
