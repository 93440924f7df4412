use rand::Rng;
use crate::action::{CounterScope, Declared};
use crate::bot::consult;
use crate::history::Event;
use crate::{Character, Coup, CoupError, Turn};

/// Which claim is being doubted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Round {
    Action,
    Counter,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Challenge {
    Unchallenged,
    // the claim was a bluff, the asserter paid for it
    Disproven,
    // the claim held up, the challenger paid for it
    Upheld,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Counter {
    Unopposed,
    Blocked,
    // the counter was a bluff and got called
    Overruled,
}

impl<R: Rng> Coup<R> {
    /// Offers every other living player, in seat order, the chance to doubt that
    /// `asserter` holds `card`. The first one to say yes settles it.
    pub(crate) fn challenge_round(&mut self, asserter: usize, card: Character, declared: &Declared, round: Round) -> Challenge {
        for challenger in self.state.other_living_indexes(asserter) {
            // an earlier fault in this round may have cost the last card
            if !self.state.is_alive(challenger) {
                continue;
            }

            let context = self.state.context(challenger);
            let counterer = &self.state.players[asserter].name;
            let answer = consult(&mut self.bots[challenger], |bot| match round {
                Round::Action => bot.on_challenge_action_round(&context, declared),
                Round::Counter => bot.on_counter_action_round(&context, declared, counterer, card),
            });

            match answer {
                Ok(true) => return self.settle_challenge(challenger, asserter, card, declared, round),
                Ok(false) => {}
                Err(fault) => self.penalize(challenger, &fault),
            }
        }

        Challenge::Unchallenged
    }

    fn settle_challenge(&mut self, challenger: usize, asserter: usize, card: Character, declared: &Declared, round: Round) -> Challenge {
        let challenger_name = self.state.players[challenger].name.clone();
        let asserter_name = self.state.players[asserter].name.clone();
        let slot = self.state.players[asserter].slot_of(card);
        let lying = slot.is_none();

        log::debug!("{} doubts that {} holds the {}", challenger_name, asserter_name, card);
        self.state.history.push(match round {
            Round::Action => Event::ChallengeRound {
                challenger: challenger_name,
                challengee: asserter_name.clone(),
                action: declared.action,
                lying,
            },
            Round::Counter => Event::CounterRound {
                challenger: challenger_name,
                challengee: asserter_name.clone(),
                action: declared.action,
                lying,
            },
        });

        let Some(slot) = slot else {
            self.penalize(asserter, format!("it was caught bluffing the {card}"));
            return Challenge::Disproven;
        };

        self.penalize(challenger, format!("it challenged {asserter_name} unsuccessfully"));

        // the revealed card goes back and a fresh one takes its slot
        if let Some(revealed) = self.state.players[asserter].influence_cards[slot].take() {
            let replacement = self.state.deck.exchange(revealed, &mut self.rng);
            self.state.players[asserter].influence_cards[slot] = Some(replacement);
        }

        log::debug!("{} showed the {} and drew a new card", asserter_name, card);
        self.state.history.push(Event::UnsuccessfulChallenge { from: asserter_name, card });

        Challenge::Upheld
    }

    /// Asks the players entitled to block the action whether they do.
    ///
    /// The first claim wins. A claim with a card that cannot block this action
    /// is penalised but still stops it.
    pub(crate) fn counter_round(&mut self, turn: &Turn) -> Counter {
        let declared = &turn.declared;
        let action = declared.action;

        let candidates: Vec<usize> = match action.counter_scope() {
            Some(CounterScope::Target) => turn.effect.target().into_iter().collect(),
            Some(CounterScope::Everyone) => self.state.other_living_indexes(turn.actor),
            None => return Counter::Unopposed,
        };

        let mut claim = None;
        for counterer in candidates {
            if !self.state.is_alive(counterer) {
                continue;
            }

            let context = self.state.context(counterer);
            match consult(&mut self.bots[counterer], |bot| bot.on_counter_action(&context, declared)) {
                Ok(Some(card)) => {
                    claim = Some((counterer, card));
                    break;
                }
                Ok(None) => {}
                Err(fault) => self.penalize(counterer, &fault),
            }
        }

        let Some((counterer, card)) = claim else {
            return Counter::Unopposed;
        };

        if !action.counters().contains(&card) {
            self.penalize(counterer, CoupError::InvalidClaim { action, card });
            return Counter::Blocked;
        }

        let counterer_name = self.state.players[counterer].name.clone();
        log::info!("{} blocks {:?} with the {}", counterer_name, declared, card);
        self.state.history.push(Event::CounterAction {
            action,
            from: declared.by_whom.clone(),
            to: declared.to_whom.clone(),
            counter: card,
            counterer: counterer_name,
        });

        match self.challenge_round(counterer, card, declared, Round::Counter) {
            Challenge::Disproven => Counter::Overruled,
            Challenge::Unchallenged | Challenge::Upheld => Counter::Blocked,
        }
    }
}
