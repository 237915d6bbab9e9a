// src/smoother.rs

use crate::stance::Stance;
use std::collections::VecDeque;

/// Temporal smoother for per-frame stance labels using a sliding window.
///
/// Reports the majority label over the last `window_size` raw labels. Ties
/// go to whichever label reached the maximal count first in an
/// insertion-order scan of the window, so the result is deterministic.
pub struct StanceSmoother {
    window: VecDeque<Stance>,
    window_size: usize,
}

impl StanceSmoother {
    pub fn new(window_size: usize) -> Self {
        debug_assert!(window_size > 0);
        Self {
            window: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Append a raw label and return the current majority.
    pub fn update(&mut self, raw: Stance) -> Stance {
        self.window.push_back(raw);
        if self.window.len() > self.window_size {
            self.window.pop_front();
        }
        self.majority()
    }

    /// Majority label with first-encountered-max tie-break. Counts are kept
    /// in first-seen order; a later label only wins with a strictly greater
    /// count.
    fn majority(&self) -> Stance {
        let mut tallies: Vec<(Stance, usize)> = Vec::with_capacity(2);
        for &label in &self.window {
            match tallies.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => tallies.push((label, 1)),
            }
        }

        let mut best = tallies[0];
        for &(label, count) in &tallies[1..] {
            if count > best.1 {
                best = (label, count);
            }
        }
        best.0
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Stance::{LeftHanded as L, RightHanded as R};

    #[test]
    fn test_majority_simple() {
        let mut smoother = StanceSmoother::new(3);
        smoother.update(L);
        smoother.update(L);
        assert_eq!(smoother.update(R), L);
    }

    #[test]
    fn test_window_eviction() {
        let mut smoother = StanceSmoother::new(3);
        smoother.update(L);
        smoother.update(R);
        smoother.update(R);
        // Window keeps the last 3 = [R, R, L]
        assert_eq!(smoother.update(L), R);
    }

    #[test]
    fn test_tie_breaks_to_first_in_window() {
        let mut smoother = StanceSmoother::new(4);
        smoother.update(L);
        smoother.update(L);
        smoother.update(R);
        // Window = [L, L, R, R]: L reached the max count first
        assert_eq!(smoother.update(R), L);

        let mut smoother = StanceSmoother::new(2);
        smoother.update(R);
        // Window = [R, L]
        assert_eq!(smoother.update(L), R);
    }

    #[test]
    fn test_window_never_exceeds_size() {
        let mut smoother = StanceSmoother::new(15);
        for i in 0..100 {
            smoother.update(if i % 2 == 0 { L } else { R });
            assert!(smoother.window_len() <= 15);
        }
        assert_eq!(smoother.window_len(), 15);
    }
}
