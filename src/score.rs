use std::collections::BTreeMap;
use std::io;
use serde::Serialize;

/// One bot's results over many games.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Tally {
    pub games: u64,
    pub wins: u64,
    pub score: f64,
}

impl Tally {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Zero-sum scores across a tournament.
///
/// Every loser gives up `1 / (players - 1)` and the winners split what the
/// losers gave up, so a game always adds up to nothing. A game called off at
/// the round cap is shared among everyone still alive.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard {
    tallies: BTreeMap<String, Tally>,
}

#[derive(Serialize)]
struct Row<'a> {
    name: &'a str,
    games: u64,
    wins: u64,
    win_rate: f64,
    score: f64,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, participants: &[String], winners: &[String]) {
        let num_players = participants.len();
        let num_winners = participants.iter().filter(|name| winners.contains(name)).count();
        if num_players < 2 || num_winners == 0 {
            return;
        }

        let loser_score = -1.0 / (num_players - 1) as f64;
        let winner_score = (num_players - num_winners) as f64 / (num_players - 1) as f64 / num_winners as f64;

        for name in participants {
            let tally = self.tallies.entry(name.clone()).or_default();
            tally.games += 1;

            if winners.contains(name) {
                tally.wins += 1;
                tally.score += winner_score;
            } else {
                tally.score += loser_score;
            }
        }
    }

    pub fn merge(mut self, other: Scoreboard) -> Scoreboard {
        for (name, theirs) in other.tallies {
            let ours = self.tallies.entry(name).or_default();
            ours.games += theirs.games;
            ours.wins += theirs.wins;
            ours.score += theirs.score;
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tally> {
        self.tallies.get(name)
    }

    pub fn games_played(&self) -> u64 {
        self.tallies.values().map(|tally| tally.games).sum()
    }

    /// Best score first.
    pub fn leaderboard(&self) -> Vec<(&str, &Tally)> {
        let mut board: Vec<(&str, &Tally)> = self.tallies.iter().map(|(name, tally)| (name.as_str(), tally)).collect();
        board.sort_by(|a, b| b.1.score.total_cmp(&a.1.score).then_with(|| a.0.cmp(b.0)));
        board
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);

        for (name, tally) in self.leaderboard() {
            writer.serialize(Row {
                name,
                games: tally.games,
                wins: tally.wins,
                win_rate: tally.win_rate(),
                score: tally.score,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}
