use rand::Rng;
use crate::bot::{Context, OtherPlayer};
use crate::deck::Deck;
use crate::history::Event;
use crate::Character;

pub const HAND_SIZE: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub coins: u8,
    // an empty slot is a lost influence
    pub influence_cards: [Option<Character>; HAND_SIZE],
}

impl Player {
    pub fn is_alive(&self) -> bool {
        self.influence_cards.iter().any(Option::is_some)
    }

    pub fn cards(&self) -> Vec<Character> {
        self.influence_cards.iter().flatten().copied().collect()
    }

    pub fn card_count(&self) -> usize {
        self.influence_cards.iter().flatten().count()
    }

    /// Slot holding `card`, first slot first.
    pub fn slot_of(&self, card: Character) -> Option<usize> {
        self.influence_cards.iter().position(|slot| *slot == Some(card))
    }

    pub fn first_occupied_slot(&self) -> Option<usize> {
        self.influence_cards.iter().position(Option::is_some)
    }
}

/// Everything mutable about one game. Seat order is the order of `players`
/// and decides both whose turn is next and who gets asked first.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) discard_pile: Vec<Character>,
    pub(crate) history: Vec<Event>,
    // the last player to act
    pub(crate) current_player_idx: usize,
}

impl GameState {
    /// Shuffles a fresh deck and deals two cards to every name.
    pub fn deal<R: Rng + ?Sized>(names: Vec<String>, starting_coins: u8, rng: &mut R) -> Self {
        let mut deck = Deck::new();
        deck.shuffle(rng);

        let players = names.into_iter().map(|name| Player {
            name,
            coins: starting_coins,
            influence_cards: [deck.draw(), deck.draw()],
        }).collect();

        Self {
            players,
            deck,
            discard_pile: Vec::new(),
            history: Vec::new(),
            current_player_idx: 0,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_idx: usize) -> &Player {
        &self.players[player_idx]
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn discard_pile(&self) -> &[Character] {
        &self.discard_pile
    }

    pub fn history(&self) -> &[Event] {
        &self.history
    }

    pub fn player_idx(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|player| player.name == name)
    }

    pub fn is_alive(&self, player_idx: usize) -> bool {
        self.players[player_idx].is_alive()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|player| player.is_alive()).count()
    }

    /// Names of everyone still holding a card, in seat order.
    pub fn survivors(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|player| player.is_alive())
            .map(|player| player.name.clone())
            .collect()
    }

    /// Living players in seat order, leaving out `exclude_idx`.
    pub fn other_living_indexes(&self, exclude_idx: usize) -> Vec<usize> {
        (0..self.players.len())
            .filter(|&player_idx| player_idx != exclude_idx && self.is_alive(player_idx))
            .collect()
    }

    /// Moves the turn pointer to the next living seat. `None` once nobody is left.
    pub fn advance_turn(&mut self) -> Option<usize> {
        let num_players = self.players.len();
        let mut idx = self.current_player_idx;

        for _ in 0..num_players {
            idx = (idx + 1) % num_players;
            if self.is_alive(idx) {
                self.current_player_idx = idx;
                return Some(idx);
            }
        }

        None
    }

    /// Cards in the deck, in hands and on the discard pile. Always the full deck size.
    pub fn cards_in_play(&self) -> usize {
        let in_hands: usize = self.players.iter().map(Player::card_count).sum();
        self.deck.len() + in_hands + self.discard_pile.len()
    }

    pub fn context(&self, player_idx: usize) -> Context<'_> {
        let player = &self.players[player_idx];

        Context {
            name: &player.name,
            history: &self.history,
            my_cards: player.cards(),
            my_coins: player.coins,
            other_players: self.other_living_indexes(player_idx)
                .into_iter()
                .map(|idx| {
                    let other = &self.players[idx];
                    OtherPlayer {
                        name: other.name.clone(),
                        coins: other.coins,
                        cards: other.card_count(),
                    }
                })
                .collect(),
            discarded_cards: &self.discard_pile,
        }
    }
}
