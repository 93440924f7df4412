use serde::{Deserialize, Serialize};
use crate::action::ActionKind;
use crate::Character;

/// One entry of the public game log. Bots get to read all of it, so nothing
/// in here may reveal a hidden card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    Action {
        action: ActionKind,
        from: String,
        to: Option<String>,
    },
    Penalty {
        player: String,
        reason: String,
    },
    LostCard {
        player: String,
        lost: Character,
    },
    ChallengeRound {
        challenger: String,
        challengee: String,
        action: ActionKind,
        lying: bool,
    },
    CounterRound {
        challenger: String,
        challengee: String,
        action: ActionKind,
        lying: bool,
    },
    CounterAction {
        action: ActionKind,
        from: String,
        to: Option<String>,
        counter: Character,
        counterer: String,
    },
    // the challengee proved the card, put it back and drew another
    UnsuccessfulChallenge {
        from: String,
        card: Character,
    },
    Swap {
        player: String,
    },
}

impl Event {
    pub fn player(&self) -> &str {
        match self {
            Event::Action { from, .. } => from,
            Event::Penalty { player, .. } => player,
            Event::LostCard { player, .. } => player,
            Event::ChallengeRound { challenger, .. } => challenger,
            Event::CounterRound { challenger, .. } => challenger,
            Event::CounterAction { counterer, .. } => counterer,
            Event::UnsuccessfulChallenge { from, .. } => from,
            Event::Swap { player } => player,
        }
    }
}
