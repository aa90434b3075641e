//! Playback state shared between the coordinator and the view

/// Observable playback state published by the coordinator
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackState {
    /// Seconds into the current item
    pub current_time: f64,
    /// Seconds, 0 until the item's duration is known
    pub duration: f64,
    pub is_playing: bool,
    /// Id of the clip at the head of the queue
    pub current_clip_id: Option<String>,
}

impl PlaybackState {
    /// Fraction of the item already played, for progress gauges
    pub fn progress_ratio(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.duration - self.current_time).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio_without_duration() {
        let state = PlaybackState {
            current_time: 12.0,
            ..Default::default()
        };
        assert_eq!(state.progress_ratio(), 0.0);
        assert_eq!(state.remaining(), 0.0);
    }

    #[test]
    fn test_progress_ratio_clamps() {
        let state = PlaybackState {
            current_time: 50.0,
            duration: 40.0,
            ..Default::default()
        };
        assert_eq!(state.progress_ratio(), 1.0);

        let half = PlaybackState {
            current_time: 20.0,
            duration: 40.0,
            ..Default::default()
        };
        assert_eq!(half.progress_ratio(), 0.5);
        assert_eq!(half.remaining(), 20.0);
    }
}
