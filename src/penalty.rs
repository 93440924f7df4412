use std::fmt::Display;
use rand::Rng;
use crate::bot::consult;
use crate::history::Event;
use crate::{Coup, CoupError};

impl<R: Rng> Coup<R> {
    /// Punishes a rule violation with the loss of one card.
    pub(crate) fn penalize(&mut self, player_idx: usize, reason: impl Display) {
        let player = &self.state.players[player_idx];
        if !player.is_alive() {
            log::debug!("{} is already out, nothing to take for {}", player.name, reason);
            return;
        }

        log::info!("{} was penalised because {}", player.name, reason);
        self.state.history.push(Event::Penalty {
            player: player.name.clone(),
            reason: reason.to_string(),
        });

        self.forfeit(player_idx);
    }

    /// Asks the player which card to give up and moves it to the discard pile.
    ///
    /// A bot that names a card it does not hold, or fails to answer at all,
    /// loses its first card instead. Only ever one card goes.
    pub(crate) fn forfeit(&mut self, player_idx: usize) {
        if !self.state.is_alive(player_idx) {
            return;
        }

        let context = self.state.context(player_idx);
        let answer = consult(&mut self.bots[player_idx], |bot| bot.on_card_loss(&context));

        let player = &self.state.players[player_idx];
        let name = player.name.clone();

        let slot = match answer.and_then(|card| player.slot_of(card).ok_or(CoupError::InvalidSurrender(card))) {
            Ok(slot) => Some(slot),
            Err(err) => {
                log::info!("{} was penalised because {}, losing its first card instead", name, err);
                let fallback = player.first_occupied_slot();
                self.state.history.push(Event::Penalty {
                    player: name.clone(),
                    reason: err.to_string(),
                });
                fallback
            }
        };

        let Some(lost) = slot.and_then(|slot| self.state.players[player_idx].influence_cards[slot].take()) else {
            return;
        };

        self.state.discard_pile.push(lost);
        self.state.history.push(Event::LostCard { player: name.clone(), lost });

        if self.state.is_alive(player_idx) {
            log::info!("{} has lost the {}", name, lost);
        } else {
            log::info!("{} has lost the {} and is out", name, lost);
        }
    }
}
