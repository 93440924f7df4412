//! Reference players.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use crate::action::{ActionKind, Declared, Proposal, ACTION_VARIANTS, ASSASSINATION_COST, COUP_COST, MAX_COINS};
use crate::bot::{Bot, BotResult, Context, OtherPlayer};
use crate::deck::COPIES_PER_CHARACTER;
use crate::Character::{self, Ambassador, Assassin, Captain, Contessa, Duke};

/// Takes a coin every turn and only coups when it has to.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticBot;

impl Bot for StaticBot {
    fn on_turn(&mut self, context: &Context) -> BotResult<Proposal> {
        match context.other_players.first() {
            Some(other) if context.my_coins > MAX_COINS => Ok(Proposal::against(ActionKind::Couping, other.name.clone())),
            _ => Ok(Proposal::new(ActionKind::TakingOne)),
        }
    }
}

/// Never bluffs. Acts on the cards it holds, blocks when it can and only
/// challenges a claim when every copy of the card is already accounted for.
#[derive(Clone, Copy, Debug, Default)]
pub struct HonestBot;

// most valuable first
const PREFERENCE: [Character; 5] = [Duke, Assassin, Captain, Contessa, Ambassador];

fn rank(card: Character) -> usize {
    PREFERENCE.iter().position(|&c| c == card).unwrap_or(PREFERENCE.len())
}

// the opponent closest to going out, richest on a tie
fn weakest(others: &[OtherPlayer]) -> Option<&OtherPlayer> {
    others.iter().min_by_key(|other| (other.cards, u8::MAX - other.coins))
}

/// True when `card` cannot be in anyone else's hand.
fn impossible_claim(context: &Context, card: Character) -> bool {
    let mine = context.my_cards.iter().filter(|&&c| c == card).count();
    let discarded = context.discarded_cards.iter().filter(|&&c| c == card).count();
    mine + discarded >= COPIES_PER_CHARACTER
}

impl Bot for HonestBot {
    fn on_turn(&mut self, context: &Context) -> BotResult<Proposal> {
        let holds = |card| context.my_cards.contains(&card);

        if let Some(target) = weakest(&context.other_players) {
            if context.my_coins >= COUP_COST {
                return Ok(Proposal::against(ActionKind::Couping, target.name.clone()));
            }
            if holds(Assassin) && context.my_coins >= ASSASSINATION_COST {
                return Ok(Proposal::against(ActionKind::Assassination, target.name.clone()));
            }
        }

        if holds(Duke) {
            return Ok(Proposal::new(ActionKind::TakingThree));
        }

        if holds(Captain) {
            let richest = context.other_players.iter().filter(|other| other.coins > 0).max_by_key(|other| other.coins);
            if let Some(richest) = richest {
                return Ok(Proposal::against(ActionKind::Stealing, richest.name.clone()));
            }
        }

        Ok(Proposal::new(ActionKind::ForeignAid))
    }

    fn on_challenge_action_round(&mut self, context: &Context, declared: &Declared) -> BotResult<bool> {
        Ok(declared.action.claim().is_some_and(|card| impossible_claim(context, card)))
    }

    fn on_counter_action(&mut self, context: &Context, declared: &Declared) -> BotResult<Option<Character>> {
        Ok(declared.action.counters().iter().copied().find(|card| context.my_cards.contains(card)))
    }

    fn on_counter_action_round(&mut self, context: &Context, _declared: &Declared, _counterer: &str, card: Character) -> BotResult<bool> {
        Ok(impossible_claim(context, card))
    }

    fn on_swapping_cards(&mut self, context: &Context, new_cards: &[Character]) -> BotResult<Vec<Character>> {
        let mut pool = context.my_cards.clone();
        pool.extend_from_slice(new_cards);
        pool.sort_by_key(|&card| rank(card));
        pool.truncate(context.my_cards.len());
        Ok(pool)
    }

    fn on_card_loss(&mut self, context: &Context) -> BotResult<Character> {
        context.my_cards
            .iter()
            .copied()
            .max_by_key(|&card| rank(card))
            .ok_or_else(|| anyhow::anyhow!("no card left to lose"))
    }
}

/// Picks uniformly from everything it could say, bluffs included.
#[derive(Clone, Debug)]
pub struct RandomBot {
    rng: Pcg64,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self { rng: Pcg64::seed_from_u64(seed) }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self { rng: Pcg64::from_entropy() }
    }
}

impl Bot for RandomBot {
    fn on_turn(&mut self, context: &Context) -> BotResult<Proposal> {
        let target = context.other_players.choose(&mut self.rng).map(|other| other.name.clone());

        let action = if context.my_coins > MAX_COINS {
            ActionKind::Couping
        } else {
            ACTION_VARIANTS[self.rng.gen_range(0..ACTION_VARIANTS.len())]
        };

        Ok(match target {
            Some(target) if action.needs_target() => Proposal::against(action, target),
            _ => Proposal::new(action),
        })
    }

    fn on_challenge_action_round(&mut self, _context: &Context, _declared: &Declared) -> BotResult<bool> {
        Ok(self.rng.gen_bool(0.5))
    }

    fn on_counter_action(&mut self, _context: &Context, declared: &Declared) -> BotResult<Option<Character>> {
        let counters = declared.action.counters();
        let pick = self.rng.gen_range(0..=counters.len());
        Ok(counters.get(pick).copied())
    }

    fn on_counter_action_round(&mut self, _context: &Context, _declared: &Declared, _counterer: &str, _card: Character) -> BotResult<bool> {
        Ok(self.rng.gen_bool(0.5))
    }

    fn on_swapping_cards(&mut self, context: &Context, new_cards: &[Character]) -> BotResult<Vec<Character>> {
        let mut pool = context.my_cards.clone();
        pool.extend_from_slice(new_cards);
        pool.shuffle(&mut self.rng);
        pool.truncate(context.my_cards.len());
        Ok(pool)
    }

    fn on_card_loss(&mut self, context: &Context) -> BotResult<Character> {
        context.my_cards
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no card left to lose"))
    }
}
