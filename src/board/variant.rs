//! Built-in game variants: a board layout plus the number of pieces each
//! player starts with.

use serde::{Deserialize, Serialize};

use super::topology::Board;

/// Number of players in every built-in variant.
pub const PLAYER_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    NineMensMorris,
    SixMensMorris,
}

impl Variant {
    /// Builds this variant's board.
    pub fn board(self) -> Board {
        match self {
            Variant::NineMensMorris => Board::nine_mens_morris(),
            Variant::SixMensMorris => Board::six_mens_morris(),
        }
    }

    /// Pieces each player holds in hand at the start of the game.
    pub const fn pieces(self) -> u8 {
        match self {
            Variant::NineMensMorris => 9,
            Variant::SixMensMorris => 6,
        }
    }

    /// Wire name, as used in `newGame` requests.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::NineMensMorris => "nine_mens_morris",
            Variant::SixMensMorris => "six_mens_morris",
        }
    }

    /// Parses a variant from its snake_case name or a short alias (`nine`, `six`).
    pub fn from_name(s: &str) -> Option<Variant> {
        match s {
            "nine_mens_morris" | "nine" | "9" => Some(Variant::NineMensMorris),
            "six_mens_morris" | "six" | "6" => Some(Variant::SixMensMorris),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for v in [Variant::NineMensMorris, Variant::SixMensMorris] {
            assert_eq!(Variant::from_name(v.name()), Some(v));
        }
        assert_eq!(Variant::from_name("six"), Some(Variant::SixMensMorris));
        assert_eq!(Variant::from_name("twelve"), None);
    }

    #[test]
    fn pieces_fit_on_board() {
        for v in [Variant::NineMensMorris, Variant::SixMensMorris] {
            let total = v.pieces() as usize * PLAYER_COUNT;
            assert!(total < v.board().node_count());
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Variant::SixMensMorris).unwrap();
        assert_eq!(json, "\"six_mens_morris\"");
        let v: Variant = serde_json::from_str("\"nine_mens_morris\"").unwrap();
        assert_eq!(v, Variant::NineMensMorris);
    }
}
