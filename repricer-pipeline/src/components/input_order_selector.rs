use crate::selector::Selector;
use crate::types::{ProductCandidate, RepricingRun};

/// Orders survivors by their position in the combined feed. Nothing is
/// truncated.
pub struct InputOrderSelector;

impl Selector<RepricingRun, ProductCandidate> for InputOrderSelector {
    fn rank(&self, candidate: &ProductCandidate) -> Option<usize> {
        Some(candidate.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_feed_order() {
        let candidates: Vec<ProductCandidate> = [4, 0, 2]
            .iter()
            .map(|&position| ProductCandidate {
                position,
                ..ProductCandidate::default()
            })
            .collect();
        let selected = InputOrderSelector.select(&RepricingRun::new("t"), candidates);
        let positions: Vec<usize> = selected.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 2, 4]);
    }
}
