//! Scoring: par results, the per-mode score sink, achievements
//!
//! Single-player keeps a per-hole history; local multiplayer keeps a ledger
//! per player. Both sit behind [`ScoreSink`] so the tick only ever records a
//! hole once, into whichever track the session is playing.

use serde::{Deserialize, Serialize};

/// One finished hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleScore {
    pub level: usize,
    pub strokes: u32,
    pub par: u32,
    /// strokes - par
    pub par_diff: i32,
}

impl HoleScore {
    pub fn new(level: usize, strokes: u32, par: u32) -> Self {
        Self {
            level,
            strokes,
            par,
            par_diff: strokes as i32 - par as i32,
        }
    }

    pub fn is_hole_in_one(&self) -> bool {
        self.strokes == 1
    }
}

/// Human-readable par result
pub fn par_result_text(par_diff: i32) -> String {
    match par_diff {
        d if d < 0 => format!("{} under par", -d),
        0 => "Par".to_string(),
        d => format!("{} over par", d),
    }
}

/// A local multiplayer participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub color: String,
    pub level_scores: Vec<HoleScore>,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            level_scores: Vec::new(),
        }
    }

    pub fn total_strokes(&self) -> u32 {
        self.level_scores.iter().map(|s| s.strokes).sum()
    }

    /// Running total relative to par
    pub fn par_total(&self) -> i32 {
        self.level_scores.iter().map(|s| s.par_diff).sum()
    }
}

/// Row of the final multiplayer table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    pub name: String,
    pub color: String,
    pub total_strokes: u32,
    pub par_total: i32,
    pub level_scores: Vec<i32>,
}

/// Where finished holes are recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScoreSink {
    /// Single player: par differential per level
    Solo { history: Vec<HoleScore> },
    /// Local multiplayer: one record per player, `current` is whose turn it is
    Ledger {
        players: Vec<PlayerRecord>,
        current: usize,
    },
}

impl ScoreSink {
    pub fn solo() -> Self {
        ScoreSink::Solo {
            history: Vec::new(),
        }
    }

    pub fn ledger(players: Vec<PlayerRecord>) -> Self {
        ScoreSink::Ledger {
            players,
            current: 0,
        }
    }

    pub fn is_multiplayer(&self) -> bool {
        matches!(self, ScoreSink::Ledger { .. })
    }

    /// Record a sunk ball on exactly one track
    pub fn record_hole(&mut self, score: HoleScore) {
        match self {
            ScoreSink::Solo { history } => {
                // Replaying a level overwrites its earlier result
                history.retain(|s| s.level != score.level);
                history.push(score);
                history.sort_by_key(|s| s.level);
            }
            ScoreSink::Ledger { players, current } => {
                if let Some(player) = players.get_mut(*current) {
                    player.level_scores.push(score);
                }
            }
        }
    }

    /// Solo per-level history (empty in multiplayer)
    pub fn history(&self) -> &[HoleScore] {
        match self {
            ScoreSink::Solo { history } => history,
            ScoreSink::Ledger { .. } => &[],
        }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        match self {
            ScoreSink::Solo { .. } => &[],
            ScoreSink::Ledger { players, .. } => players,
        }
    }

    pub fn current_index(&self) -> usize {
        match self {
            ScoreSink::Solo { .. } => 0,
            ScoreSink::Ledger { current, .. } => *current,
        }
    }

    pub fn current_player(&self) -> Option<&PlayerRecord> {
        match self {
            ScoreSink::Solo { .. } => None,
            ScoreSink::Ledger { players, current } => players.get(*current),
        }
    }

    /// Pass play to the next player
    ///
    /// Returns true when the index wrapped back to the first player, meaning
    /// everyone has finished the hole. Solo play always wraps.
    pub fn advance_turn(&mut self) -> bool {
        match self {
            ScoreSink::Solo { .. } => true,
            ScoreSink::Ledger { players, current } => {
                *current = (*current + 1) % players.len().max(1);
                *current == 0
            }
        }
    }

    /// Clear every score, keeping the players
    pub fn reset(&mut self) {
        match self {
            ScoreSink::Solo { history } => history.clear(),
            ScoreSink::Ledger { players, current } => {
                for player in players.iter_mut() {
                    player.level_scores.clear();
                }
                *current = 0;
            }
        }
    }

    /// Players ordered best first (lowest total relative to par)
    pub fn scoreboard(&self) -> Vec<ScoreboardEntry> {
        let mut entries: Vec<ScoreboardEntry> = self
            .players()
            .iter()
            .map(|p| ScoreboardEntry {
                name: p.name.clone(),
                color: p.color.clone(),
                total_strokes: p.total_strokes(),
                par_total: p.par_total(),
                level_scores: p.level_scores.iter().map(|s| s.par_diff).collect(),
            })
            .collect();
        entries.sort_by_key(|e| e.par_total);
        entries
    }
}

/// Unlockable achievements, handed to the presentation layer as notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    WaterHazard,
    HoleInOne,
    UnderPar,
    PerfectRound,
}

impl Achievement {
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::WaterHazard => "water_hazard",
            Achievement::HoleInOne => "hole_in_one",
            Achievement::UnderPar => "under_par",
            Achievement::PerfectRound => "perfect_round",
        }
    }
}

/// Final single-player round totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoloSummary {
    pub total_score: u32,
    pub total_par: u32,
    /// total_score - total_par
    pub par_diff: i32,
    pub hole_in_ones: usize,
    /// Every hole at or under par
    pub perfect_round: bool,
    pub water_hazard_hits: u32,
    pub par_scores: Vec<i32>,
}

impl SoloSummary {
    pub fn new(total_score: u32, total_par: u32, history: &[HoleScore], water_hazard_hits: u32) -> Self {
        Self {
            total_score,
            total_par,
            par_diff: total_score as i32 - total_par as i32,
            hole_in_ones: history.iter().filter(|s| s.is_hole_in_one()).count(),
            perfect_round: !history.is_empty() && history.iter().all(|s| s.par_diff <= 0),
            water_hazard_hits,
            par_scores: history.iter().map(|s| s.par_diff).collect(),
        }
    }

    /// Achievements this round qualifies for
    pub fn achievements(&self) -> Vec<Achievement> {
        let mut earned = Vec::new();
        if self.hole_in_ones > 0 {
            earned.push(Achievement::HoleInOne);
        }
        if self.par_diff < 0 {
            earned.push(Achievement::UnderPar);
        }
        if self.perfect_round {
            earned.push(Achievement::PerfectRound);
        }
        earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_par_result_text() {
        assert_eq!(par_result_text(HoleScore::new(0, 4, 3).par_diff), "1 over par");
        assert_eq!(par_result_text(HoleScore::new(0, 1, 3).par_diff), "2 under par");
        assert_eq!(par_result_text(HoleScore::new(0, 3, 3).par_diff), "Par");
    }

    #[test]
    fn test_solo_records_only_history() {
        let mut sink = ScoreSink::solo();
        sink.record_hole(HoleScore::new(0, 4, 3));
        sink.record_hole(HoleScore::new(1, 2, 3));

        assert_eq!(sink.history().len(), 2);
        assert_eq!(sink.history()[0].par_diff, 1);
        assert_eq!(sink.history()[1].par_diff, -1);
        assert!(sink.players().is_empty());
    }

    #[test]
    fn test_solo_replay_overwrites_level() {
        let mut sink = ScoreSink::solo();
        sink.record_hole(HoleScore::new(0, 5, 3));
        sink.record_hole(HoleScore::new(0, 3, 3));
        assert_eq!(sink.history(), &[HoleScore::new(0, 3, 3)]);
    }

    #[test]
    fn test_ledger_attributes_to_current_player() {
        let mut sink = ScoreSink::ledger(vec![
            PlayerRecord::new("Ann", "#ff0000"),
            PlayerRecord::new("Bob", "#0000ff"),
        ]);
        sink.record_hole(HoleScore::new(0, 5, 3));
        assert!(!sink.advance_turn());
        sink.record_hole(HoleScore::new(0, 2, 3));
        assert!(sink.advance_turn());

        assert!(sink.history().is_empty());
        let players = sink.players();
        assert_eq!(players[0].par_total(), 2);
        assert_eq!(players[1].par_total(), -1);
        assert_eq!(players[1].total_strokes(), 2);
    }

    #[test]
    fn test_turn_rotation_wraps_after_every_player() {
        let mut sink = ScoreSink::ledger(vec![
            PlayerRecord::new("A", "#ff0000"),
            PlayerRecord::new("B", "#0000ff"),
            PlayerRecord::new("C", "#00cc00"),
        ]);
        let wraps: Vec<bool> = (0..6).map(|_| sink.advance_turn()).collect();
        assert_eq!(wraps, vec![false, false, true, false, false, true]);
        assert_eq!(sink.current_index(), 0);
    }

    #[test]
    fn test_scoreboard_sorted_best_first() {
        let mut sink = ScoreSink::ledger(vec![
            PlayerRecord::new("Ann", "#ff0000"),
            PlayerRecord::new("Bob", "#0000ff"),
        ]);
        sink.record_hole(HoleScore::new(0, 6, 3));
        sink.advance_turn();
        sink.record_hole(HoleScore::new(0, 3, 3));

        let board = sink.scoreboard();
        assert_eq!(board[0].name, "Bob");
        assert_eq!(board[0].par_total, 0);
        assert_eq!(board[1].level_scores, vec![3]);
    }

    #[test]
    fn test_reset_keeps_players() {
        let mut sink = ScoreSink::ledger(vec![PlayerRecord::new("Ann", "#ff0000")]);
        sink.record_hole(HoleScore::new(0, 6, 3));
        sink.reset();
        assert_eq!(sink.players().len(), 1);
        assert!(sink.players()[0].level_scores.is_empty());
    }

    #[test]
    fn test_summary_totals_and_achievements() {
        let history = vec![
            HoleScore::new(0, 1, 2),
            HoleScore::new(1, 3, 3),
            HoleScore::new(2, 3, 4),
        ];
        let summary = SoloSummary::new(7, 9, &history, 0);
        assert_eq!(summary.par_diff, -2);
        assert_eq!(summary.hole_in_ones, 1);
        assert!(summary.perfect_round);
        assert_eq!(
            summary.achievements(),
            vec![Achievement::HoleInOne, Achievement::UnderPar, Achievement::PerfectRound]
        );
    }

    #[test]
    fn test_summary_over_par_round() {
        let history = vec![HoleScore::new(0, 4, 2), HoleScore::new(1, 2, 3)];
        let summary = SoloSummary::new(7, 5, &history, 1);
        assert_eq!(summary.par_diff, 2);
        assert!(!summary.perfect_round);
        assert!(summary.achievements().is_empty());
    }
}
