//! Context-window policy.
//!
//! Before each provider call the orchestrator decides which turns to send:
//! always the leading system turn, plus the most recent `window` user and
//! assistant turns, oldest middle turns dropped first. Deterministic, so
//! answers are reproducible for a given history.

use personachat_types::turn::{Turn, TurnRole};

/// Select the user/assistant turns to include in a provider request.
///
/// The leading system turn is excluded here (it travels as the request's
/// `system_prompt`); of the remaining turns the most recent `window` are
/// kept in order. A window of zero would drop the turn the user just sent
/// and produce an empty provider request, so at least one turn is kept.
pub fn window_turns(turns: &[Turn], window: usize) -> Vec<Turn> {
    let window = window.max(1);
    let dialogue: Vec<&Turn> = turns
        .iter()
        .filter(|t| t.role != TurnRole::System)
        .collect();

    let start = dialogue.len().saturating_sub(window);
    dialogue[start..].iter().map(|t| (*t).clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(pairs: usize) -> Vec<Turn> {
        let mut turns = vec![Turn::now(TurnRole::System, "prompt")];
        for i in 0..pairs {
            turns.push(Turn::now(TurnRole::User, format!("q{i}")));
            turns.push(Turn::now(TurnRole::Assistant, format!("a{i}")));
        }
        turns
    }

    #[test]
    fn test_short_history_kept_whole() {
        let turns = history(2);
        let windowed = window_turns(&turns, 20);
        assert_eq!(windowed.len(), 4);
        assert_eq!(windowed[0].content, "q0");
        assert_eq!(windowed[3].content, "a1");
    }

    #[test]
    fn test_system_turn_never_counted() {
        let turns = history(1);
        let windowed = window_turns(&turns, 20);
        assert!(windowed.iter().all(|t| t.role != TurnRole::System));
    }

    #[test]
    fn test_oldest_middle_turns_dropped_first() {
        let turns = history(10); // 20 dialogue turns
        let windowed = window_turns(&turns, 6);
        assert_eq!(windowed.len(), 6);
        // The newest six turns survive, in order.
        assert_eq!(windowed[0].content, "q7");
        assert_eq!(windowed[5].content, "a9");
    }

    #[test]
    fn test_zero_window_keeps_newest_turn() {
        let turns = history(2);
        let windowed = window_turns(&turns, 0);
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].content, "a1");
    }

    #[test]
    fn test_deterministic() {
        let turns = history(5);
        assert_eq!(window_turns(&turns, 4), window_turns(&turns, 4));
    }
}
