use thiserror::Error;
use crate::action::ActionKind;
use crate::Character;

/// Everything that can go wrong at the table.
///
/// Rule violations are recovered by the engine as a penalty; only the setup
/// and configuration variants ever reach the caller of [crate::Coup::new].
#[derive(Error, Debug)]
pub enum CoupError {
    #[error("of issuing an invalid action \"{0}\"")]
    InvalidAction(String),

    #[error("the bot gave an invalid target {target:?} for {action}")]
    InvalidTarget { action: ActionKind, target: Option<String> },

    #[error("{action} costs {needed} coins but only {held} are held")]
    InsufficientResources { action: ActionKind, needed: u8, held: u8 },

    #[error("it held {0} coins and needed to coup")]
    MustCoup(u8),

    #[error("{card} is not a valid counter action for {action}")]
    InvalidClaim { action: ActionKind, card: Character },

    #[error("it gave up a {0} it does not hold")]
    InvalidSurrender(Character),

    #[error("the bot failed: {0}")]
    BotFault(String),

    #[error("at least two players are needed, found {0}")]
    NotEnoughPlayers(usize),

    #[error("at most {max} players fit at one table, found {found}")]
    TooManyPlayers { max: usize, found: usize },

    #[error("could not read the configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoupError>;
