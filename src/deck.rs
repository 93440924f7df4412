use rand::seq::SliceRandom;
use rand::Rng;
use crate::{Character, CHARACTER_VARIANTS};

pub const COPIES_PER_CHARACTER: usize = 3;
pub const DECK_SIZE: usize = 15;

/// The court deck. Cards are drawn from the top (the end of the vec).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Character>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// A full, unshuffled deck of three copies of every character.
    pub fn new() -> Self {
        let cards = CHARACTER_VARIANTS.iter()
            .flat_map(|&card| std::iter::repeat(card).take(COPIES_PER_CHARACTER))
            .collect();

        Self { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Character> {
        self.cards.pop()
    }

    /// Puts a card back without reshuffling; callers shuffle once they are done returning cards.
    pub fn push(&mut self, card: Character) {
        self.cards.push(card);
    }

    /// Returns `card`, reshuffles and draws a replacement, which may be the very same card.
    pub fn exchange<R: Rng + ?Sized>(&mut self, card: Character, rng: &mut R) -> Character {
        self.cards.push(card);
        self.shuffle(rng);

        // the deck holds at least the card we just pushed
        self.cards.pop().unwrap_or(card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Character] {
        &self.cards
    }

    // pulls a specific card out of the deck, used to set up hands
    #[cfg(test)]
    pub(crate) fn take(&mut self, card: Character) -> Option<Character> {
        let idx = self.cards.iter().position(|&c| c == card)?;
        Some(self.cards.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::deck::{Deck, DECK_SIZE};
    use crate::Character::{Ambassador, Duke};
    use crate::CHARACTER_VARIANTS;

    #[test]
    fn full_deck() {
        let deck = Deck::new();
        assert_eq!(deck.len(), DECK_SIZE);

        for character in CHARACTER_VARIANTS {
            assert_eq!(deck.cards().iter().filter(|&&c| c == character).count(), 3);
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut deck = Deck::new();
        deck.shuffle(&mut rng);

        let mut sorted = deck.cards().to_vec();
        sorted.sort();
        let mut expected = Deck::new().cards().to_vec();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn shuffle_is_reproducible() {
        let mut a = Deck::new();
        let mut b = Deck::new();
        a.shuffle(&mut Pcg64::seed_from_u64(11));
        b.shuffle(&mut Pcg64::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn draw_until_empty() {
        let mut deck = Deck::new();
        for _ in 0..DECK_SIZE {
            assert!(deck.draw().is_some());
        }
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), None);
    }

    #[test]
    fn exchange_conserves_cards() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut deck = Deck::new();
        let card = deck.take(Duke).unwrap();
        assert_eq!(deck.len(), DECK_SIZE - 1);

        let drawn = deck.exchange(card, &mut rng);
        assert_eq!(deck.len(), DECK_SIZE - 1);

        let mut all = deck.cards().to_vec();
        all.push(drawn);
        all.sort();
        let mut expected = Deck::new().cards().to_vec();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn exchange_with_a_single_card_returns_it() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut deck = Deck::new();
        while deck.draw().is_some() {}

        assert_eq!(deck.exchange(Ambassador, &mut rng), Ambassador);
        assert!(deck.is_empty());
    }
}
