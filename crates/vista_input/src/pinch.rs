//! Hand pinch detection

use glam::Vec3;

/// Index-tip to thumb-tip distance below which a hand is pinching.
pub const PINCH_THRESHOLD: f32 = 0.02;

/// Edge reported by [`PinchDetector::update`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinchTransition {
    Started,
    Ended,
}

/// Pinch state for one hand
#[derive(Clone, Copy, Debug)]
pub struct PinchDetector {
    /// Distance threshold in meters
    pub threshold: f32,
    pinching: bool,
}

impl Default for PinchDetector {
    fn default() -> Self {
        Self::new(PINCH_THRESHOLD)
    }
}

impl PinchDetector {
    /// Create with a distance threshold
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            pinching: false,
        }
    }

    /// Whether the hand is currently pinching
    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    /// Feed fingertip positions. Returns the transition, if any.
    pub fn update(&mut self, index_tip: Vec3, thumb_tip: Vec3) -> Option<PinchTransition> {
        let now = index_tip.distance(thumb_tip) < self.threshold;
        match (self.pinching, now) {
            (false, true) => {
                self.pinching = true;
                Some(PinchTransition::Started)
            }
            (true, false) => {
                self.pinching = false;
                Some(PinchTransition::Ended)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinch_edges() {
        let mut pinch = PinchDetector::default();
        let thumb = Vec3::new(0.1, 1.0, -0.3);

        assert_eq!(pinch.update(thumb + Vec3::new(0.05, 0.0, 0.0), thumb), None);
        assert_eq!(
            pinch.update(thumb + Vec3::new(0.01, 0.0, 0.0), thumb),
            Some(PinchTransition::Started)
        );
        assert!(pinch.is_pinching());
        assert_eq!(pinch.update(thumb + Vec3::new(0.015, 0.0, 0.0), thumb), None);
        assert_eq!(
            pinch.update(thumb + Vec3::new(0.03, 0.0, 0.0), thumb),
            Some(PinchTransition::Ended)
        );
        assert!(!pinch.is_pinching());
    }
}
