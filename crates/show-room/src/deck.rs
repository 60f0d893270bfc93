//! The Show deck: four copies of each of the four fruits.

use rand::Rng;
use rand::seq::SliceRandom;
use show_protocol::{CardId, CardView, Fruit};

/// Copies of each fruit in a deck.
pub const COPIES_PER_FRUIT: usize = 4;

/// Cards in a full deck.
pub const DECK_SIZE: usize = Fruit::ALL.len() * COPIES_PER_FRUIT;

/// One physical card.
///
/// The fruit is fixed at creation. `revealed` flips to `true` once, when
/// a player claims the card from the shared deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    fruit: Fruit,
    revealed: bool,
}

impl Card {
    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub fn fruit(&self) -> Fruit {
        self.fruit
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Renders the card for a recipient; `visible` decides whether the
    /// fruit goes on the wire.
    pub fn view(&self, visible: bool) -> CardView {
        CardView {
            id: self.id.clone(),
            fruit: visible.then_some(self.fruit),
            is_selected: self.revealed,
        }
    }
}

/// Builds a fresh 16-card deck in uniformly random order.
///
/// Every call mints new card ids. The shuffle is Fisher–Yates
/// (`SliceRandom::shuffle`), so each ordering is equally likely.
pub fn deal<R: Rng>(rng: &mut R) -> Vec<Card> {
    let mut cards: Vec<Card> = Fruit::ALL
        .iter()
        .flat_map(|&fruit| std::iter::repeat_n(fruit, COPIES_PER_FRUIT))
        .map(|fruit| Card {
            id: CardId::random(&mut *rng),
            fruit,
            revealed: false,
        })
        .collect();
    cards.shuffle(rng);
    cards
}
