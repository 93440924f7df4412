//! Scripted players and table setup shared by the engine tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use anyhow::bail;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use crate::action::{ActionKind, Declared, Proposal, ACTION_VARIANTS};
use crate::bot::{Bot, BotResult, Context, Registry};
use crate::history::Event;
use crate::state::GameState;
use crate::{Character, Config, Coup, CHARACTER_VARIANTS};

// every callback as (player, callback name), in call order
pub(crate) type Calls = Rc<RefCell<Vec<(String, &'static str)>>>;

#[derive(Clone, Debug, Default)]
pub(crate) enum Keep {
    #[default]
    Current,
    Drawn,
    These(Vec<Character>),
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Script {
    pub turn: Option<Proposal>,
    pub challenge: bool,
    pub counter: Option<Character>,
    pub challenge_counter: bool,
    pub keep: Keep,
    pub lose: Option<Character>,
    // callbacks answered with an error
    pub fail: Vec<&'static str>,
    // callbacks that panic
    pub crash: Vec<&'static str>,
}

pub(crate) struct ScriptedBot {
    name: String,
    script: Script,
    calls: Calls,
}

impl ScriptedBot {
    fn enter(&self, callback: &'static str) -> BotResult<()> {
        self.calls.borrow_mut().push((self.name.clone(), callback));

        if self.script.crash.contains(&callback) {
            panic!("{} crashed in {}", self.name, callback);
        }
        if self.script.fail.contains(&callback) {
            bail!("{} refuses to answer {}", self.name, callback);
        }

        Ok(())
    }
}

impl Bot for ScriptedBot {
    fn on_turn(&mut self, _context: &Context) -> BotResult<Proposal> {
        self.enter("on_turn")?;
        Ok(self.script.turn.clone().unwrap_or_else(|| Proposal::new(ActionKind::TakingOne)))
    }

    fn on_challenge_action_round(&mut self, _context: &Context, _declared: &Declared) -> BotResult<bool> {
        self.enter("on_challenge_action_round")?;
        Ok(self.script.challenge)
    }

    fn on_counter_action(&mut self, _context: &Context, _declared: &Declared) -> BotResult<Option<Character>> {
        self.enter("on_counter_action")?;
        Ok(self.script.counter)
    }

    fn on_counter_action_round(&mut self, _context: &Context, _declared: &Declared, _counterer: &str, _card: Character) -> BotResult<bool> {
        self.enter("on_counter_action_round")?;
        Ok(self.script.challenge_counter)
    }

    fn on_swapping_cards(&mut self, context: &Context, new_cards: &[Character]) -> BotResult<Vec<Character>> {
        self.enter("on_swapping_cards")?;
        Ok(match &self.script.keep {
            Keep::Current => context.my_cards.clone(),
            Keep::Drawn => new_cards.to_vec(),
            Keep::These(cards) => cards.clone(),
        })
    }

    fn on_card_loss(&mut self, context: &Context) -> BotResult<Character> {
        self.enter("on_card_loss")?;
        match self.script.lose {
            Some(card) => Ok(card),
            None => match context.my_cards.first() {
                Some(card) => Ok(*card),
                None => bail!("{} has nothing to lose", self.name),
            },
        }
    }
}

/// Answers at random, including with garbage, errors and panics.
struct ChaosBot {
    rng: Pcg64,
}

impl ChaosBot {
    fn misbehave(&mut self) -> BotResult<()> {
        match self.rng.gen_range(0..20) {
            0 => bail!("chaos"),
            1 => panic!("chaos"),
            _ => Ok(()),
        }
    }

    fn any_card(&mut self) -> Character {
        CHARACTER_VARIANTS[self.rng.gen_range(0..CHARACTER_VARIANTS.len())]
    }
}

impl Bot for ChaosBot {
    fn on_turn(&mut self, context: &Context) -> BotResult<Proposal> {
        self.misbehave()?;
        let action = if self.rng.gen_bool(0.1) {
            "nonsense".to_string()
        } else {
            ACTION_VARIANTS[self.rng.gen_range(0..ACTION_VARIANTS.len())].name().to_string()
        };
        let against = match self.rng.gen_range(0..4) {
            0 => None,
            1 => Some(context.name.to_string()),
            _ => context.other_players.first().map(|other| other.name.clone()),
        };
        Ok(Proposal::raw(action, against))
    }

    fn on_challenge_action_round(&mut self, _context: &Context, _declared: &Declared) -> BotResult<bool> {
        self.misbehave()?;
        Ok(self.rng.gen_bool(0.3))
    }

    fn on_counter_action(&mut self, _context: &Context, _declared: &Declared) -> BotResult<Option<Character>> {
        self.misbehave()?;
        Ok(self.rng.gen_bool(0.3).then(|| self.any_card()))
    }

    fn on_counter_action_round(&mut self, _context: &Context, _declared: &Declared, _counterer: &str, _card: Character) -> BotResult<bool> {
        self.misbehave()?;
        Ok(self.rng.gen_bool(0.3))
    }

    fn on_swapping_cards(&mut self, _context: &Context, _new_cards: &[Character]) -> BotResult<Vec<Character>> {
        self.misbehave()?;
        Ok(vec![self.any_card(), self.any_card()])
    }

    fn on_card_loss(&mut self, _context: &Context) -> BotResult<Character> {
        self.misbehave()?;
        Ok(self.any_card())
    }
}

pub(crate) fn chaos_bot(seed: u64) -> Box<dyn Bot> {
    Box::new(ChaosBot { rng: Pcg64::seed_from_u64(seed) })
}

pub(crate) struct Table {
    pub coup: Coup<Pcg64>,
    pub calls: Calls,
}

/// Seats scripted players in the given order; the first seat moves first.
pub(crate) fn table(seats: Vec<(&str, Script)>) -> Table {
    table_with(Config::deterministic(7), seats)
}

pub(crate) fn table_with(config: Config, seats: Vec<(&str, Script)>) -> Table {
    let calls = Calls::default();
    let mut registry = Registry::new();

    for (name, script) in seats {
        registry.register(name, Box::new(ScriptedBot {
            name: name.to_string(),
            script,
            calls: calls.clone(),
        }));
    }

    let coup = Coup::new(registry, config).unwrap();
    Table { coup, calls }
}

impl Table {
    /// Deals exactly these hands. An empty slot is a card already lost, so a
    /// card from the deck goes to the discard pile in its place.
    pub fn rig(&mut self, hands: &[[Option<Character>; 2]]) {
        let GameState { players, deck, discard_pile, .. } = &mut self.coup.state;
        assert_eq!(players.len(), hands.len(), "one hand per player");

        for player in players.iter_mut() {
            for slot in player.influence_cards.iter_mut() {
                if let Some(card) = slot.take() {
                    deck.push(card);
                }
            }
        }
        for card in discard_pile.drain(..) {
            deck.push(card);
        }

        for (player, hand) in players.iter_mut().zip(hands) {
            for (slot, card) in player.influence_cards.iter_mut().zip(hand) {
                if let Some(card) = card {
                    *slot = Some(deck.take(*card).expect("more copies rigged than the deck holds"));
                }
            }
        }

        let lost = hands.iter().flatten().filter(|card| card.is_none()).count();
        for _ in 0..lost {
            discard_pile.push(deck.draw().expect("the deck ran out while rigging"));
        }
    }

    pub fn coins(&self, player_idx: usize) -> u8 {
        self.coup.state.players[player_idx].coins
    }

    pub fn set_coins(&mut self, player_idx: usize, coins: u8) {
        self.coup.state.players[player_idx].coins = coins;
    }

    pub fn hand(&self, player_idx: usize) -> Vec<Character> {
        self.coup.state.players[player_idx].cards()
    }

    pub fn count(&self, name: &str, callback: &str) -> usize {
        self.calls.borrow().iter().filter(|(who, what)| who == name && *what == callback).count()
    }

    pub fn called(&self, name: &str, callback: &str) -> bool {
        self.count(name, callback) > 0
    }

    pub fn penalties(&self, name: &str) -> usize {
        self.coup.state.history
            .iter()
            .filter(|event| matches!(event, Event::Penalty { .. }) && event.player() == name)
            .count()
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

// records into the calling thread only, so tests running side by side do not mix
struct Capture;

impl log::Log for Capture {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|captured| captured.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture;
static INSTALL: Once = Once::new();

/// Everything logged on this thread while `f` runs.
pub(crate) fn capture_logs(f: impl FnOnce()) -> Vec<(log::Level, String)> {
    INSTALL.call_once(|| {
        if log::set_logger(&CAPTURE).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });

    CAPTURED.with(|captured| captured.borrow_mut().clear());
    f();
    CAPTURED.with(|captured| captured.borrow_mut().drain(..).collect())
}
