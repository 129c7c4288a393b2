//! Board topology: nodes, adjacency, and mills.
//!
//! A board is a fixed graph of named nodes with 2D coordinates and a table of
//! mills (triples of nodes that score when held by one player). Boards are
//! immutable once built and are shared by every state of a game through an
//! `Arc`. The built-in tables are compile-time `static` data; other layouts
//! can be loaded from JSON and are validated on the way in.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Index of a node in its board's node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u8);

impl NodeId {
    /// Returns the node table index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A connection to a neighbouring node. The weight is the drawn line length
/// and has no effect on the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub to: NodeId,
    pub weight: u8,
}

/// A point on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub connections: Vec<Edge>,
}

/// Three nodes that form a scoring line.
pub type Mill = [NodeId; 3];

/// Errors raised while building a board from external data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board has no nodes")]
    Empty,

    #[error("board has {0} nodes, at most 256 are supported")]
    TooManyNodes(usize),

    #[error("duplicate node name '{0}'")]
    DuplicateName(String),

    #[error("node '{from}' connects to unknown node index {to}")]
    EdgeOutOfRange { from: String, to: u8 },

    #[error("node '{0}' connects to itself")]
    SelfLoop(String),

    #[error("edge '{from}' -> '{to}' has no matching reverse edge")]
    Asymmetric { from: String, to: String },

    #[error("mill {0} references a node that is not on the board")]
    MillOutOfRange(usize),

    #[error("mill {0} repeats a node")]
    DegenerateMill(usize),
}

/// A complete board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardDef")]
pub struct Board {
    nodes: Vec<Node>,
    mills: Vec<Mill>,
}

/// Unvalidated wire form of a board.
#[derive(Deserialize)]
struct BoardDef {
    nodes: Vec<Node>,
    mills: Vec<Mill>,
}

impl TryFrom<BoardDef> for Board {
    type Error = BoardError;

    fn try_from(def: BoardDef) -> Result<Self, Self::Error> {
        Board::new(def.nodes, def.mills)
    }
}

impl Board {
    /// Builds a board, checking that the graph and mill table are consistent.
    pub fn new(nodes: Vec<Node>, mills: Vec<Mill>) -> Result<Board, BoardError> {
        let board = Board { nodes, mills };
        board.validate()?;
        Ok(board)
    }

    /// Parses and validates a board from its JSON form.
    pub fn from_json(s: &str) -> serde_json::Result<Board> {
        serde_json::from_str(s)
    }

    /// The standard 24-point Nine Men's Morris board.
    pub fn nine_mens_morris() -> Board {
        Board::from_table(&NINE_MENS_NODES, &NINE_MENS_MILLS)
    }

    /// The 16-point Six Men's Morris board (two squares, no diagonals).
    pub fn six_mens_morris() -> Board {
        Board::from_table(&SIX_MENS_NODES, &SIX_MENS_MILLS)
    }

    fn from_table(nodes: &[NodeSpec], mills: &[[u8; 3]]) -> Board {
        let nodes = nodes
            .iter()
            .map(|spec| Node {
                name: (spec.name as char).to_string(),
                x: spec.x,
                y: spec.y,
                connections: spec
                    .connections
                    .iter()
                    .map(|&(to, weight)| Edge { to: letter(to), weight })
                    .collect(),
            })
            .collect();
        let mills = mills
            .iter()
            .map(|m| [letter(m[0]), letter(m[1]), letter(m[2])])
            .collect();
        Board { nodes, mills }
    }

    fn validate(&self) -> Result<(), BoardError> {
        if self.nodes.is_empty() {
            return Err(BoardError::Empty);
        }
        if self.nodes.len() > usize::from(u8::MAX) + 1 {
            return Err(BoardError::TooManyNodes(self.nodes.len()));
        }

        let mut names = HashSet::new();
        for node in &self.nodes {
            if !names.insert(node.name.as_str()) {
                return Err(BoardError::DuplicateName(node.name.clone()));
            }
        }

        for (i, node) in self.nodes.iter().enumerate() {
            for edge in &node.connections {
                let Some(other) = self.nodes.get(edge.to.index()) else {
                    return Err(BoardError::EdgeOutOfRange {
                        from: node.name.clone(),
                        to: edge.to.0,
                    });
                };
                if edge.to.index() == i {
                    return Err(BoardError::SelfLoop(node.name.clone()));
                }
                if !other.connections.iter().any(|back| back.to.index() == i) {
                    return Err(BoardError::Asymmetric {
                        from: node.name.clone(),
                        to: other.name.clone(),
                    });
                }
            }
        }

        for (i, mill) in self.mills.iter().enumerate() {
            if mill.iter().any(|n| n.index() >= self.nodes.len()) {
                return Err(BoardError::MillOutOfRange(i));
            }
            if mill[0] == mill[1] || mill[1] == mill[2] || mill[0] == mill[2] {
                return Err(BoardError::DegenerateMill(i));
            }
        }

        Ok(())
    }

    /// Number of nodes on the board.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node ids in table order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(|i| NodeId(i as u8))
    }

    /// The node table.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the node for an id, or `None` if the id is off the board.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// True if `id` names a node on this board.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Display name of a node; off-board ids render as `?`.
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).map_or("?", |n| n.name.as_str())
    }

    /// Looks a node up by its display name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u8))
    }

    /// Neighbours of a node, in table order.
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.connections.iter().map(|e| e.to))
    }

    /// True if a piece may slide from `from` to `to`.
    pub fn is_adjacent(&self, from: NodeId, to: NodeId) -> bool {
        self.neighbors(from).any(|n| n == to)
    }

    /// Every line of three that forms a mill.
    pub fn mills(&self) -> &[Mill] {
        &self.mills
    }
}

/// One row of a built-in node table. Names and neighbours are single ASCII
/// letters; the letter's offset from `a` is the node index.
struct NodeSpec {
    name: u8,
    x: i32,
    y: i32,
    connections: &'static [(u8, u8)],
}

const fn letter(c: u8) -> NodeId {
    NodeId(c - b'a')
}

const fn spec(name: u8, x: i32, y: i32, connections: &'static [(u8, u8)]) -> NodeSpec {
    NodeSpec { name, x, y, connections }
}

//                111111111122222
//        0123456789012345678901234
//    0   a-----------b-----------c
//    2   |           |           |
//    4   |   d-------e-------f   |
//    6   |   |       |       |   |
//    8   |   |   g---h---i   |   |
//    10  |   |   |       |   |   |
//    12  j---k---l       m---n---o
//    14  |   |   |       |   |   |
//    16  |   |   p---q---r   |   |
//    18  |   |       |       |   |
//    20  |   s-------t-------u   |
//    22  |           |           |
//    24  v-----------w-----------x
static NINE_MENS_NODES: [NodeSpec; 24] = [
    spec(b'a', 0, 0, &[(b'b', 11), (b'j', 11)]),
    spec(b'b', 12, 0, &[(b'a', 11), (b'c', 11), (b'e', 3)]),
    spec(b'c', 24, 0, &[(b'b', 11), (b'o', 11)]),
    spec(b'd', 4, 4, &[(b'e', 7), (b'k', 7)]),
    spec(b'e', 12, 4, &[(b'b', 3), (b'd', 7), (b'f', 7), (b'h', 3)]),
    spec(b'f', 20, 4, &[(b'e', 7), (b'n', 7)]),
    spec(b'g', 8, 8, &[(b'h', 3), (b'l', 3)]),
    spec(b'h', 12, 8, &[(b'e', 3), (b'g', 3), (b'i', 3)]),
    spec(b'i', 16, 8, &[(b'h', 3), (b'm', 3)]),
    spec(b'j', 0, 12, &[(b'a', 11), (b'k', 3), (b'v', 11)]),
    spec(b'k', 4, 12, &[(b'd', 7), (b'j', 3), (b'l', 3), (b's', 7)]),
    spec(b'l', 8, 12, &[(b'g', 3), (b'k', 3), (b'p', 3)]),
    spec(b'm', 16, 12, &[(b'i', 3), (b'n', 3), (b'r', 3)]),
    spec(b'n', 20, 12, &[(b'f', 7), (b'm', 3), (b'o', 3), (b'u', 7)]),
    spec(b'o', 24, 12, &[(b'c', 11), (b'n', 3), (b'x', 11)]),
    spec(b'p', 8, 16, &[(b'l', 3), (b'q', 3)]),
    spec(b'q', 12, 16, &[(b'p', 3), (b'r', 3), (b't', 3)]),
    spec(b'r', 16, 16, &[(b'm', 3), (b'q', 3)]),
    spec(b's', 4, 20, &[(b'k', 7), (b't', 7)]),
    spec(b't', 12, 20, &[(b'q', 3), (b's', 7), (b'u', 7), (b'w', 3)]),
    spec(b'u', 20, 20, &[(b'n', 7), (b't', 7)]),
    spec(b'v', 0, 24, &[(b'j', 11), (b'w', 11)]),
    spec(b'w', 12, 24, &[(b't', 3), (b'v', 11), (b'x', 11)]),
    spec(b'x', 24, 24, &[(b'o', 11), (b'w', 11)]),
];

static NINE_MENS_MILLS: [[u8; 3]; 16] = [
    *b"abc", *b"def", *b"ghi", *b"jkl",
    *b"mno", *b"pqr", *b"stu", *b"vwx",
    *b"ajv", *b"dks", *b"glp", *b"beh",
    *b"qtw", *b"imr", *b"fnu", *b"cox",
];

//        0   4   8   12  16
//    0   a-------b-------c
//    4   |   d---e---f   |
//    8   g---h       i---j
//    12  |   k---l---m   |
//    16  n-------o-------p
static SIX_MENS_NODES: [NodeSpec; 16] = [
    spec(b'a', 0, 0, &[(b'b', 8), (b'g', 8)]),
    spec(b'b', 8, 0, &[(b'a', 8), (b'c', 8), (b'e', 4)]),
    spec(b'c', 16, 0, &[(b'b', 8), (b'j', 8)]),
    spec(b'd', 4, 4, &[(b'e', 4), (b'h', 4)]),
    spec(b'e', 8, 4, &[(b'b', 4), (b'd', 4), (b'f', 4)]),
    spec(b'f', 12, 4, &[(b'e', 4), (b'i', 4)]),
    spec(b'g', 0, 8, &[(b'a', 8), (b'h', 4), (b'n', 8)]),
    spec(b'h', 4, 8, &[(b'd', 4), (b'g', 4), (b'k', 4)]),
    spec(b'i', 12, 8, &[(b'f', 4), (b'j', 4), (b'm', 4)]),
    spec(b'j', 16, 8, &[(b'c', 8), (b'i', 4), (b'p', 8)]),
    spec(b'k', 4, 12, &[(b'h', 4), (b'l', 4)]),
    spec(b'l', 8, 12, &[(b'k', 4), (b'm', 4), (b'o', 4)]),
    spec(b'm', 12, 12, &[(b'i', 4), (b'l', 4)]),
    spec(b'n', 0, 16, &[(b'g', 8), (b'o', 8)]),
    spec(b'o', 8, 16, &[(b'l', 4), (b'n', 8), (b'p', 8)]),
    spec(b'p', 16, 16, &[(b'j', 8), (b'o', 8)]),
];

static SIX_MENS_MILLS: [[u8; 3]; 8] = [
    *b"abc", *b"def", *b"klm", *b"nop",
    *b"agn", *b"dhk", *b"fim", *b"cjp",
];
