pub mod action;
pub mod bot;
pub mod bots;
pub mod config;
pub mod deck;
pub mod error;
pub mod history;
pub mod score;
pub mod state;

mod challenge;
mod penalty;

#[cfg(test)]
mod testing;

pub use action::{ActionKind, Declared, Proposal};
pub use bot::{Bot, BotResult, Context, OtherPlayer, Registry};
pub use config::Config;
pub use error::CoupError;
pub use history::Event;
pub use score::Scoreboard;
pub use state::{GameState, Player};

use std::fmt::{Debug, Display, Formatter};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use crate::action::{COUP_COST, MAX_COINS, MAX_STEAL};
use crate::bot::consult;
use crate::challenge::{Challenge, Counter, Round};
use crate::error::Result;
use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

// six hands of two plus an ambassador's draw of two is all the deck can serve
pub const MAX_PLAYERS: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static CHARACTER_VARIANTS: [Character; 5] = [
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
];

impl Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Duke => "duke",
            Assassin => "assassin",
            Captain => "captain",
            Ambassador => "ambassador",
            Contessa => "contessa",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    Declaration,
    Execution,
}

/// What a declared action does if it survives every challenge and counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    Gain(u8),
    Coup(usize),
    Assassinate(usize),
    Steal(usize),
    Swap,
}

impl Effect {
    pub(crate) fn target(self) -> Option<usize> {
        match self {
            Effect::Coup(target_idx) | Effect::Assassinate(target_idx) | Effect::Steal(target_idx) => Some(target_idx),
            Effect::Gain(_) | Effect::Swap => None,
        }
    }
}

/// A declared action together with the seats it involves.
pub(crate) struct Turn {
    actor: usize,
    effect: Effect,
    declared: Declared,
}

/// One game of Coup between a fixed set of bots.
///
/// A game owns its state outright and is consumed by [Coup::play], so games
/// never share anything and can be run side by side on different threads.
pub struct Coup<R = Pcg64> {
    state: GameState,
    bots: Vec<Box<dyn Bot>>,
    config: Config,
    rounds: usize,
    rng: R,
}

impl<R> Debug for Coup<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | deck {}\n", self.rounds, self.state.current_player_idx, self.state.deck.len()).as_str())?;
        for player in self.state.players.iter() {
            f.write_str(format!("\t{}: ${} | {:?}, {:?}\n", player.name, player.coins, player.influence_cards[0], player.influence_cards[1]).as_str())?;
        }
        Ok(())
    }
}

impl Coup<Pcg64> {
    /// Seats the registered bots. Seeded from the config, or from the OS when it has no seed.
    pub fn new(registry: Registry, config: Config) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };

        Self::with_rng(registry, config, rng)
    }
}

impl<R: Rng> Coup<R> {
    pub fn with_rng(registry: Registry, config: Config, mut rng: R) -> Result<Self> {
        let num_players = registry.len();
        if num_players < 2 {
            return Err(CoupError::NotEnoughPlayers(num_players));
        }
        if num_players > MAX_PLAYERS {
            return Err(CoupError::TooManyPlayers { max: MAX_PLAYERS, found: num_players });
        }

        let mut entries = registry.into_entries();
        if config.shuffle_seats {
            entries.shuffle(&mut rng);
        }

        let (names, bots): (Vec<String>, Vec<Box<dyn Bot>>) = entries.into_iter().unzip();
        let mut state = GameState::deal(names, config.starting_coins, &mut rng);

        // the pointer names whoever acted last, so the starter is the seat after it
        state.current_player_idx = if config.random_starter {
            rng.gen_range(0..num_players)
        } else {
            num_players - 1
        };

        Ok(Self {
            state,
            bots,
            config,
            rounds: 0,
            rng,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Plays the game to the end and returns the winners in seat order.
    ///
    /// That is a single name, unless the round cap was hit, in which case
    /// everyone still holding a card is returned.
    pub fn play(mut self) -> Vec<String> {
        self.run()
    }

    pub(crate) fn run(&mut self) -> Vec<String> {
        log::info!("this round's players: {}", self.state.survivors().join(", "));

        while self.state.alive_count() > 1 {
            if self.rounds >= self.config.round_cap {
                log::warn!("the game was stopped after {} rounds", self.rounds);
                break;
            }

            let Some(player_idx) = self.state.advance_turn() else {
                break;
            };

            self.take_turn(player_idx);
            self.rounds += 1;
        }

        let winners = self.state.survivors();
        log::info!("the winner{} {} in {} rounds", if winners.len() > 1 { "s are" } else { " is" }, winners.join(" and "), self.rounds);
        winners
    }

    /// One full turn for `player_idx`: ask, validate, challenge, counter, apply.
    pub(crate) fn take_turn(&mut self, player_idx: usize) {
        let context = self.state.context(player_idx);
        let answer = consult(&mut self.bots[player_idx], |bot| bot.on_turn(&context));

        let proposal = match answer {
            Ok(proposal) => proposal,
            Err(fault) => {
                self.penalize(player_idx, &fault);
                return;
            }
        };

        match self.declare(player_idx, &proposal) {
            Ok(turn) => self.resolve(&turn),
            Err(err) => self.penalize(player_idx, &err),
        }
    }

    fn declare(&mut self, actor: usize, proposal: &Proposal) -> Result<Turn> {
        let action = proposal.action.parse::<ActionKind>()?;
        let against = proposal.against.as_deref();

        // untargeted actions ignore whatever target came with them
        let effect = match action {
            ActionKind::TakingOne => Effect::Gain(1),
            ActionKind::ForeignAid => Effect::Gain(2),
            ActionKind::TakingThree => Effect::Gain(3),
            ActionKind::Couping => Effect::Coup(self.validate_target(actor, action, against)?),
            ActionKind::Assassination => Effect::Assassinate(self.validate_target(actor, action, against)?),
            ActionKind::Stealing => Effect::Steal(self.validate_target(actor, action, against)?),
            ActionKind::Swapping => Effect::Swap,
        };

        let declared = Declared {
            action,
            by_whom: self.state.players[actor].name.clone(),
            to_whom: effect.target().map(|target_idx| self.state.players[target_idx].name.clone()),
        };

        log::info!("{:?}", declared);
        self.state.history.push(Event::Action {
            action,
            from: declared.by_whom.clone(),
            to: declared.to_whom.clone(),
        });

        self.check_preconditions(actor, action, Stage::Declaration)?;

        if action.paid_on_declaration() {
            self.state.players[actor].coins -= action.cost();
        }

        Ok(Turn { actor, effect, declared })
    }

    fn validate_target(&self, actor: usize, action: ActionKind, against: Option<&str>) -> Result<usize> {
        let invalid = || CoupError::InvalidTarget {
            action,
            target: against.map(str::to_string),
        };

        let target_idx = against
            .and_then(|name| self.state.player_idx(name))
            .ok_or_else(invalid)?;

        if target_idx == actor || !self.state.is_alive(target_idx) {
            return Err(invalid());
        }

        Ok(target_idx)
    }

    // runs once when the action is declared and again right before it takes effect
    fn check_preconditions(&self, actor: usize, action: ActionKind, stage: Stage) -> Result<()> {
        let coins = self.state.players[actor].coins;

        if coins > MAX_COINS && action != ActionKind::Couping {
            return Err(CoupError::MustCoup(coins));
        }

        let owed = if stage == Stage::Execution && action.paid_on_declaration() {
            0
        } else {
            action.cost()
        };

        if coins < owed {
            return Err(CoupError::InsufficientResources { action, needed: owed, held: coins });
        }

        Ok(())
    }

    fn resolve(&mut self, turn: &Turn) {
        let action = turn.declared.action;

        if let Some(card) = action.claim() {
            if self.challenge_round(turn.actor, card, &turn.declared, Round::Action) == Challenge::Disproven {
                return;
            }
        }

        if action.counter_scope().is_some() && self.counter_round(turn) == Counter::Blocked {
            log::debug!("{:?} was blocked", turn.declared);
            return;
        }

        self.execute(turn);
    }

    fn execute(&mut self, turn: &Turn) {
        let actor = turn.actor;
        let action = turn.declared.action;

        if !self.state.is_alive(actor) {
            log::debug!("{} is out, {:?} has no effect", turn.declared.by_whom, turn.declared);
            return;
        }

        if let Some(target_idx) = turn.effect.target() {
            // the target could already be dead from losing a challenge
            if !self.state.is_alive(target_idx) {
                log::debug!("{} is already out, {:?} has no effect", self.state.players[target_idx].name, turn.declared);
                return;
            }
        }

        if let Err(err) = self.check_preconditions(actor, action, Stage::Execution) {
            self.penalize(actor, &err);
            return;
        }

        match turn.effect {
            Effect::Gain(amount) => self.gain(actor, amount),
            Effect::Coup(target_idx) => {
                self.state.players[actor].coins -= COUP_COST;
                self.forfeit(target_idx);
            }
            Effect::Assassinate(target_idx) => {
                // paid for on declaration
                self.forfeit(target_idx);
            }
            Effect::Steal(target_idx) => {
                let amount = self.state.players[target_idx].coins.min(MAX_STEAL);
                self.state.players[target_idx].coins -= amount;
                self.gain(actor, amount);
            }
            Effect::Swap => self.swap(actor),
        }
    }

    fn gain(&mut self, player_idx: usize, amount: u8) {
        let player = &mut self.state.players[player_idx];
        player.coins = player.coins.saturating_add(amount);
    }

    fn swap(&mut self, player_idx: usize) {
        let new_cards: Vec<Character> = (0..2).filter_map(|_| self.state.deck.draw()).collect();

        let context = self.state.context(player_idx);
        let answer = consult(&mut self.bots[player_idx], |bot| bot.on_swapping_cards(&context, &new_cards));

        let hand = self.state.players[player_idx].cards();
        let mut pool = hand.clone();
        pool.extend(new_cards.iter().copied());

        let picked = answer.and_then(|chosen| {
            pick(&pool, &chosen, hand.len())
                .ok_or_else(|| CoupError::BotFault(format!("kept {:?} out of {:?}", chosen, pool)))
        });

        match picked {
            Ok((kept, returned)) => {
                let mut kept = kept.into_iter();
                for slot in self.state.players[player_idx].influence_cards.iter_mut().filter(|slot| slot.is_some()) {
                    *slot = kept.next();
                }

                for card in returned {
                    self.state.deck.push(card);
                }
                self.state.deck.shuffle(&mut self.rng);

                let name = self.state.players[player_idx].name.clone();
                log::debug!("{} swapped its cards", name);
                self.state.history.push(Event::Swap { player: name });
            }
            Err(err) => {
                for card in new_cards {
                    self.state.deck.push(card);
                }
                self.state.deck.shuffle(&mut self.rng);

                self.penalize(player_idx, &err);
            }
        }
    }
}

/// Matches the first `hand_size` usable choices against `pool`.
/// Returns the kept cards and the rest of the pool, or `None` if the hand would come up short.
fn pick(pool: &[Character], chosen: &[Character], hand_size: usize) -> Option<(Vec<Character>, Vec<Character>)> {
    let mut available = pool.to_vec();
    let mut kept = Vec::with_capacity(hand_size);

    for card in chosen {
        if kept.len() == hand_size {
            break;
        }
        if let Some(idx) = available.iter().position(|c| c == card) {
            kept.push(available.swap_remove(idx));
        }
    }

    (kept.len() == hand_size).then_some((kept, available))
}
