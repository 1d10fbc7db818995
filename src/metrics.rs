use crate::session::SessionState;

/// Live or final statistics for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
    pub time_left: u32,
}

/// Derive metrics from the counters. Rounds half away from zero.
pub fn compute_metrics(state: &SessionState) -> MetricsSnapshot {
    let elapsed = state.elapsed_secs() as f64;
    let net_chars = state.net_chars() as f64;

    let (wpm, cpm) = if elapsed > 0.0 {
        (
            (net_chars * 60.0 / (5.0 * elapsed)).round(),
            (net_chars * 60.0 / elapsed).round(),
        )
    } else {
        (0.0, 0.0)
    };

    let accuracy = if state.typed_chars > 0 {
        (net_chars * 100.0 / state.typed_chars as f64).round()
    } else {
        100.0
    };

    MetricsSnapshot {
        wpm: wpm as u32,
        cpm: cpm as u32,
        accuracy: accuracy as u32,
        time_left: state.time_left_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(cursor: usize, mistakes: usize, typed: usize, max: u32, left: u32) -> SessionState {
        SessionState {
            cursor,
            mistakes,
            typed_chars: typed,
            time_left_secs: left,
            max_duration_secs: max,
            ..SessionState::new(max)
        }
    }

    #[test]
    fn test_fresh_state() {
        let m = compute_metrics(&SessionState::new(60));
        assert_eq!(
            m,
            MetricsSnapshot {
                wpm: 0,
                cpm: 0,
                accuracy: 100,
                time_left: 60
            }
        );
    }

    #[test]
    fn test_fifty_clean_chars_in_thirty_secs() {
        let m = compute_metrics(&state(50, 0, 50, 60, 30));
        assert_eq!((m.wpm, m.cpm, m.accuracy), (20, 100, 100));
    }

    #[test]
    fn test_ten_chars_two_mistakes_in_ten_secs() {
        let m = compute_metrics(&state(10, 2, 10, 60, 50));
        assert_eq!((m.wpm, m.cpm, m.accuracy), (10, 48, 80));
        assert_eq!(m.time_left, 50);
    }

    #[test]
    fn test_accuracy_defaults_to_hundred_without_keystrokes() {
        // cursor/mistakes are irrelevant when nothing was typed
        let m = compute_metrics(&state(0, 0, 0, 60, 10));
        assert_eq!(m.accuracy, 100);
        assert_eq!(m.wpm, 0);
    }

    #[test]
    fn test_zero_elapsed_gives_zero_rates() {
        let m = compute_metrics(&state(12, 1, 12, 30, 30));
        assert_eq!((m.wpm, m.cpm), (0, 0));
        assert_eq!(m.accuracy, 92);
    }

    #[test]
    fn test_half_rounds_up() {
        // 1 net char over 8 typed = 12.5% -> 13
        let m = compute_metrics(&state(1, 0, 8, 60, 60));
        assert_eq!(m.accuracy, 13);

        // 3 net chars in 8 secs -> 22.5 cpm -> 23
        let m = compute_metrics(&state(3, 0, 3, 60, 52));
        assert_eq!(m.cpm, 23);
    }

    #[test]
    fn test_backspaced_keystrokes_drag_accuracy() {
        // 20 keystrokes, 5 of which were erased again
        let m = compute_metrics(&state(15, 0, 20, 60, 45));
        assert_eq!(m.accuracy, 75);
        assert_eq!(m.cpm, 60);
        assert_eq!(m.wpm, 12);
    }
}
