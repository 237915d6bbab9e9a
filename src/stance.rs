// src/stance.rs

use crate::landmarks::{self, Landmark};

/// Batsman handedness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    LeftHanded,
    RightHanded,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::LeftHanded => "Left-Handed",
            Stance::RightHanded => "Right-Handed",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify handedness from full-frame-normalized landmarks.
///
/// Two equally weighted signals, 2 points each:
/// - shoulder horizontal offset (right shoulder further right => right)
/// - wrist vertical position (left wrist lower on screen => right; the
///   lower wrist is the top hand on the bat)
///
/// Ties resolve to Right-Handed. A landmark set too short to index the
/// hips falls back to Right-Handed rather than erroring; the directional
/// bias of this fallback is intentional and must stay.
pub fn classify(lms: &[Landmark]) -> Stance {
    if lms.len() <= landmarks::RIGHT_HIP {
        return Stance::RightHanded; // safe fallback
    }

    let ls = lms[landmarks::LEFT_SHOULDER];
    let rs = lms[landmarks::RIGHT_SHOULDER];
    let lw = lms[landmarks::LEFT_WRIST];
    let rw = lms[landmarks::RIGHT_WRIST];

    let mut right_score = 0;
    let mut left_score = 0;

    if rs.x - ls.x > 0.0 {
        right_score += 2;
    } else {
        left_score += 2;
    }

    if lw.y > rw.y {
        right_score += 2;
    } else {
        left_score += 2;
    }

    if right_score >= left_score {
        Stance::RightHanded
    } else {
        Stance::LeftHanded
    }
}
