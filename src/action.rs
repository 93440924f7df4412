use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::Character::{self, Ambassador, Assassin, Captain, Contessa, Duke};
use crate::CoupError;

pub const COUP_COST: u8 = 7;
pub const ASSASSINATION_COST: u8 = 3;
pub const MAX_STEAL: u8 = 2;

// above this a player has to coup
pub const MAX_COINS: u8 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    #[serde(rename = "taking-1")]
    TakingOne,
    ForeignAid,
    Couping,
    #[serde(rename = "taking-3")]
    TakingThree,
    Assassination,
    Stealing,
    Swapping,
}

pub static ACTION_VARIANTS: [ActionKind; 7] = [
    ActionKind::TakingOne,
    ActionKind::ForeignAid,
    ActionKind::Couping,
    ActionKind::TakingThree,
    ActionKind::Assassination,
    ActionKind::Stealing,
    ActionKind::Swapping,
];

/// Who gets asked for a counter action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CounterScope {
    // only the player the action is aimed at
    Target,
    // every other living player, in seat order
    Everyone,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::TakingOne => "taking-1",
            ActionKind::ForeignAid => "foreign-aid",
            ActionKind::Couping => "couping",
            ActionKind::TakingThree => "taking-3",
            ActionKind::Assassination => "assassination",
            ActionKind::Stealing => "stealing",
            ActionKind::Swapping => "swapping",
        }
    }

    pub fn cost(self) -> u8 {
        match self {
            ActionKind::Couping => COUP_COST,
            ActionKind::Assassination => ASSASSINATION_COST,
            _ => 0,
        }
    }

    /// The assassin is paid for up front and never refunded.
    pub fn paid_on_declaration(self) -> bool {
        self == ActionKind::Assassination
    }

    /// The character a player claims to hold by declaring this action.
    pub fn claim(self) -> Option<Character> {
        match self {
            ActionKind::TakingThree => Some(Duke),
            ActionKind::Assassination => Some(Assassin),
            ActionKind::Stealing => Some(Captain),
            ActionKind::Swapping => Some(Ambassador),
            _ => None,
        }
    }

    pub fn counters(self) -> &'static [Character] {
        match self {
            ActionKind::ForeignAid => &[Duke],
            ActionKind::Assassination => &[Contessa],
            ActionKind::Stealing => &[Captain, Ambassador],
            _ => &[],
        }
    }

    pub fn counter_scope(self) -> Option<CounterScope> {
        match self {
            ActionKind::ForeignAid => Some(CounterScope::Everyone),
            ActionKind::Assassination | ActionKind::Stealing => Some(CounterScope::Target),
            _ => None,
        }
    }

    pub fn needs_target(self) -> bool {
        matches!(self, ActionKind::Couping | ActionKind::Assassination | ActionKind::Stealing)
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = CoupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTION_VARIANTS
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CoupError::InvalidAction(s.to_string()))
    }
}

/// What a bot answers when it is its turn.
///
/// The action is kept as the raw name the bot gave so that nonsense can be
/// caught and penalised by the engine rather than by the type system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub action: String,
    pub against: Option<String>,
}

impl Proposal {
    pub fn new(action: ActionKind) -> Self {
        Self {
            action: action.name().to_string(),
            against: None,
        }
    }

    pub fn against(action: ActionKind, target: impl Into<String>) -> Self {
        Self {
            action: action.name().to_string(),
            against: Some(target.into()),
        }
    }

    pub fn raw(action: impl Into<String>, against: Option<String>) -> Self {
        Self {
            action: action.into(),
            against,
        }
    }
}

/// An action that passed validation and is now on the table.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declared {
    pub action: ActionKind,
    pub by_whom: String,
    pub to_whom: Option<String>,
}

impl Debug for Declared {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let by = &self.by_whom;
        let to = self.to_whom.as_deref().unwrap_or("nobody");

        match self.action {
            ActionKind::TakingOne => {
                f.write_fmt(format_args!("{by} takes a coin"))
            }
            ActionKind::ForeignAid => {
                f.write_fmt(format_args!("{by} takes 2 coins foreign aid"))
            }
            ActionKind::Couping => {
                f.write_fmt(format_args!("{by} coups {to}"))
            }
            ActionKind::TakingThree => {
                f.write_fmt(format_args!("{by} takes 3 coins with the duke"))
            }
            ActionKind::Assassination => {
                f.write_fmt(format_args!("{by} assassinates {to}"))
            }
            ActionKind::Stealing => {
                f.write_fmt(format_args!("{by} steals from {to}"))
            }
            ActionKind::Swapping => {
                f.write_fmt(format_args!("{by} swaps two cards with the ambassador"))
            }
        }
    }
}
