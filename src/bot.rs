use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use anyhow::anyhow;
use serde::Serialize;
use crate::action::{ActionKind, Declared, Proposal};
use crate::history::Event;
use crate::{Character, CoupError};

/// Bots may fail however they like; the engine turns every failure into a penalty.
pub type BotResult<T> = anyhow::Result<T>;

/// An opponent as seen from across the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OtherPlayer {
    pub name: String,
    pub coins: u8,
    pub cards: usize,
}

/// What a bot is allowed to know when it is asked anything.
#[derive(Clone, Debug, Serialize)]
pub struct Context<'a> {
    pub name: &'a str,
    pub history: &'a [Event],
    pub my_cards: Vec<Character>,
    pub my_coins: u8,
    // living opponents only
    pub other_players: Vec<OtherPlayer>,
    pub discarded_cards: &'a [Character],
}

/// The callbacks the engine drives a player through.
///
/// Every method has a passive default so a bot only needs to implement what
/// it cares about. A bot left completely at the defaults takes a coin every
/// turn, never challenges or counters and keeps its cards when swapping.
pub trait Bot {
    fn on_turn(&mut self, _context: &Context) -> BotResult<Proposal> {
        Ok(Proposal::new(ActionKind::TakingOne))
    }

    /// Someone declared an action backed by a character; `true` calls the bluff.
    fn on_challenge_action_round(&mut self, _context: &Context, _declared: &Declared) -> BotResult<bool> {
        Ok(false)
    }

    /// A counterable action was declared; name the card to block it with, if any.
    fn on_counter_action(&mut self, _context: &Context, _declared: &Declared) -> BotResult<Option<Character>> {
        Ok(None)
    }

    /// `counterer` blocked the declared action claiming `card`; `true` calls the bluff.
    fn on_counter_action_round(
        &mut self,
        _context: &Context,
        _declared: &Declared,
        _counterer: &str,
        _card: Character,
    ) -> BotResult<bool> {
        Ok(false)
    }

    /// Pick which cards to keep out of your hand plus `new_cards`, as many as you hold now.
    fn on_swapping_cards(&mut self, context: &Context, _new_cards: &[Character]) -> BotResult<Vec<Character>> {
        Ok(context.my_cards.clone())
    }

    fn on_card_loss(&mut self, context: &Context) -> BotResult<Character> {
        context.my_cards.first().copied().ok_or_else(|| anyhow!("no card left to lose"))
    }
}

/// The players of one game, in seat order, as handed to the engine.
#[derive(Default)]
pub struct Registry {
    entries: Vec<(String, Box<dyn Bot>)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seats `bot` under `name`, suffixed with a number if the name is taken.
    /// Returns the name the bot ended up with.
    pub fn register(&mut self, name: impl Into<String>, bot: Box<dyn Bot>) -> String {
        let base_name = name.into();

        let mut unique_name = base_name.clone();
        let mut suffix = 2;
        while self.entries.iter().any(|(existing, _)| *existing == unique_name) {
            unique_name = format!("{base_name} {suffix}");
            suffix += 1;
        }

        self.entries.push((unique_name.clone(), bot));
        unique_name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item=&str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Box<dyn Bot>)> {
        self.entries
    }
}

/// Calls into a bot, turning both errors and panics into a [CoupError::BotFault].
pub(crate) fn consult<T, F>(bot: &mut Box<dyn Bot>, call: F) -> Result<T, CoupError>
where
    F: FnOnce(&mut dyn Bot) -> BotResult<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| call(bot.as_mut()))) {
        Ok(Ok(answer)) => Ok(answer),
        Ok(Err(fault)) => Err(CoupError::BotFault(fault.to_string())),
        Err(payload) => Err(CoupError::BotFault(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("the bot crashed: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("the bot crashed: {message}")
    } else {
        "the bot crashed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;
    use crate::bot::{consult, Bot, BotResult, Context, Registry};
    use crate::action::{ActionKind, Proposal};
    use crate::Character::{Captain, Duke};
    use crate::CoupError;

    struct Passive;
    impl Bot for Passive {}

    struct Broken;
    impl Bot for Broken {
        fn on_turn(&mut self, _context: &Context) -> BotResult<Proposal> {
            bail!("out of ideas")
        }

        fn on_card_loss(&mut self, _context: &Context) -> BotResult<crate::Character> {
            panic!("boom")
        }
    }

    fn context(cards: Vec<crate::Character>) -> Context<'static> {
        Context {
            name: "me",
            history: &[],
            my_cards: cards,
            my_coins: 0,
            other_players: vec![],
            discarded_cards: &[],
        }
    }

    #[test]
    fn unique_names() {
        let mut registry = Registry::new();
        assert_eq!(registry.register("bot", Box::new(Passive)), "bot");
        assert_eq!(registry.register("bot", Box::new(Passive)), "bot 2");
        assert_eq!(registry.register("bot", Box::new(Passive)), "bot 3");
        assert_eq!(registry.register("other", Box::new(Passive)), "other");
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["bot", "bot 2", "bot 3", "other"]);
    }

    #[test]
    fn passive_defaults() {
        let mut bot: Box<dyn Bot> = Box::new(Passive);
        let ctx = context(vec![Captain, Duke]);

        let proposal = consult(&mut bot, |bot| bot.on_turn(&ctx)).unwrap();
        assert_eq!(proposal, Proposal::new(ActionKind::TakingOne));
        assert_eq!(consult(&mut bot, |bot| bot.on_card_loss(&ctx)).unwrap(), Captain);
        assert_eq!(consult(&mut bot, |bot| bot.on_swapping_cards(&ctx, &[Duke, Duke])).unwrap(), vec![Captain, Duke]);
    }

    #[test]
    fn errors_become_faults() {
        let mut bot: Box<dyn Bot> = Box::new(Broken);
        let ctx = context(vec![Captain]);

        match consult(&mut bot, |bot| bot.on_turn(&ctx)) {
            Err(CoupError::BotFault(reason)) => assert_eq!(reason, "out of ideas"),
            other => panic!("expected a fault, got {:?}", other),
        }
    }

    #[test]
    fn panics_become_faults() {
        let mut bot: Box<dyn Bot> = Box::new(Broken);
        let ctx = context(vec![Captain]);

        match consult(&mut bot, |bot| bot.on_card_loss(&ctx)) {
            Err(CoupError::BotFault(reason)) => assert_eq!(reason, "the bot crashed: boom"),
            other => panic!("expected a fault, got {:?}", other),
        }
    }
}
