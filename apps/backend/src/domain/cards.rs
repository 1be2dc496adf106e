use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::errors::DomainError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

// Note: Ord/Eq on Card is only for stable hand sorting: suit order C<D<H<S
// then rank order. Trick resolution goes through card_beats, which also
// accounts for lead and trump.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Trump for a round. `NoTrump` happens when the deal consumes the whole
/// deck and no upcard remains to be turned.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trump {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    NoTrump,
}

impl Trump {
    pub fn suit(self) -> Option<Suit> {
        match self {
            Trump::Clubs => Some(Suit::Clubs),
            Trump::Diamonds => Some(Suit::Diamonds),
            Trump::Hearts => Some(Suit::Hearts),
            Trump::Spades => Some(Suit::Spades),
            Trump::NoTrump => None,
        }
    }
}

impl From<Suit> for Trump {
    fn from(suit: Suit) -> Self {
        match suit {
            Suit::Clubs => Trump::Clubs,
            Suit::Diamonds => Trump::Diamonds,
            Suit::Hearts => Trump::Hearts,
            Suit::Spades => Trump::Spades,
        }
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rank_char = match self.rank {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };
        let suit_char = match self.suit {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };
        let s = format!("{rank_char}{suit_char}");
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_card_str(&s).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

fn parse_card_str(s: &str) -> Result<Card, DomainError> {
    let mut chars = s.chars();
    let (Some(rank_ch), Some(suit_ch), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(DomainError::ParseCard(s.to_string()));
    };
    let rank = match rank_ch {
        '2' => Rank::Two,
        '3' => Rank::Three,
        '4' => Rank::Four,
        '5' => Rank::Five,
        '6' => Rank::Six,
        '7' => Rank::Seven,
        '8' => Rank::Eight,
        '9' => Rank::Nine,
        'T' => Rank::Ten,
        'J' => Rank::Jack,
        'Q' => Rank::Queen,
        'K' => Rank::King,
        'A' => Rank::Ace,
        _ => return Err(DomainError::ParseCard(s.to_string())),
    };
    let suit = match suit_ch {
        'C' => Suit::Clubs,
        'D' => Suit::Diamonds,
        'H' => Suit::Hearts,
        'S' => Suit::Spades,
        _ => return Err(DomainError::ParseCard(s.to_string())),
    };
    Ok(Card { suit, rank })
}

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Does `a` beat `b` given the lead suit and trump?
///
/// Trump beats non-trump; within trump (or within lead suit with no trump
/// involved) rank decides. Off-suit non-trump cards never beat anything.
pub fn card_beats(a: Card, b: Card, lead: Suit, trump: Trump) -> bool {
    let trump_suit = trump.suit();
    let a_trump = Some(a.suit) == trump_suit;
    let b_trump = Some(b.suit) == trump_suit;
    if a_trump && !b_trump {
        return true;
    }
    if b_trump && !a_trump {
        return false;
    }
    if a_trump && b_trump {
        return a.rank > b.rank;
    }
    // Neither is trump: compare only if following lead
    let a_follows = a.suit == lead;
    let b_follows = b.suit == lead;
    if a_follows && !b_follows {
        return true;
    }
    if b_follows && !a_follows {
        return false;
    }
    if a_follows && b_follows {
        return a.rank > b.rank;
    }
    false
}

#[cfg(test)]
pub fn parse_cards(tokens: &[&str]) -> Vec<Card> {
    tokens
        .iter()
        .map(|s| serde_json::from_str::<Card>(&format!("\"{s}\"")).expect("valid card token"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let cases = [
            (Rank::Ace, Suit::Spades, "AS"),
            (Rank::Ten, Suit::Diamonds, "TD"),
            (Rank::Three, Suit::Hearts, "3H"),
            (Rank::Nine, Suit::Clubs, "9C"),
        ];
        for (rank, suit, token) in cases {
            let c = Card { suit, rank };
            let s = serde_json::to_string(&c).unwrap();
            assert_eq!(s, format!("\"{token}\""));
            let decoded: Card = serde_json::from_str(&s).unwrap();
            assert_eq!(decoded, c);
        }
    }

    #[test]
    fn rejects_invalid_tokens() {
        for tok in ["1H", "11S", "Ah", "ZZ", "", "10H"] {
            let res: Result<Card, _> = serde_json::from_str(&format!("\"{tok}\""));
            assert!(res.is_err(), "token {tok:?} should not parse");
        }
    }

    #[test]
    fn trump_beats_higher_offsuit() {
        use Rank::*;
        use Suit::*;
        let lead = Spades;
        let trump = Trump::Hearts;
        let two_h = Card { suit: Hearts, rank: Two };
        let king_s = Card { suit: Spades, rank: King };
        let nine_s = Card { suit: Spades, rank: Nine };

        assert!(card_beats(two_h, king_s, lead, trump));
        assert!(card_beats(two_h, nine_s, lead, trump));
        assert!(!card_beats(king_s, two_h, lead, trump));
    }

    #[test]
    fn lead_suit_decides_without_trump() {
        use Rank::*;
        use Suit::*;
        let lead = Hearts;
        let ah = Card { suit: Hearts, rank: Ace };
        let kh = Card { suit: Hearts, rank: King };
        let ad = Card { suit: Diamonds, rank: Ace };

        assert!(card_beats(ah, kh, lead, Trump::NoTrump));
        assert!(!card_beats(kh, ah, lead, Trump::NoTrump));
        // Off-suit never wins, even an ace.
        assert!(!card_beats(ad, kh, lead, Trump::NoTrump));
        assert!(card_beats(kh, ad, lead, Trump::NoTrump));
    }

    #[test]
    fn offsuit_cards_never_beat_each_other() {
        use Rank::*;
        use Suit::*;
        let lead = Hearts;
        let ad = Card { suit: Diamonds, rank: Ace };
        let kc = Card { suit: Clubs, rank: King };
        assert!(!card_beats(ad, kc, lead, Trump::Spades));
        assert!(!card_beats(kc, ad, lead, Trump::Spades));
    }

    #[test]
    fn test_hand_has_suit() {
        let hand = parse_cards(&["2C", "AD"]);
        assert!(hand_has_suit(&hand, Suit::Clubs));
        assert!(!hand_has_suit(&hand, Suit::Hearts));
    }
}
