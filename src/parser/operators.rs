//! Operator precedence table.
//!
//! The table is owned by a [`Parser`](super::parser::Parser), so user
//! operator declarations only affect the session that parsed them.

use std::collections::HashMap;

use log::{debug, warn};

pub const DEFAULT_BINARY_PRECEDENCE: u32 = 30;
pub const MIN_PRECEDENCE: u32 = 1;
pub const MAX_PRECEDENCE: u32 = 100;

const BUILTIN_BINARY: [(&str, u32); 12] = [
    ("||", 5),
    ("&&", 6),
    ("<", 10),
    (">", 10),
    ("==", 10),
    ("!=", 10),
    ("<=", 10),
    (">=", 10),
    ("+", 20),
    ("-", 20),
    ("*", 40),
    ("/", 40),
];

const BUILTIN_UNARY: [&str; 2] = ["-", "!"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn count(&self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }

    /// Prefix used to name the function implementing an operator.
    pub fn prefix(&self) -> &'static str {
        match self {
            Arity::Unary => "unary",
            Arity::Binary => "binary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorEntry {
    pub spelling: String,
    pub precedence: u32,
    pub arity: Arity,
    pub user_defined: bool,
}

#[derive(Debug, Clone)]
pub struct OperatorTable {
    binary: HashMap<String, OperatorEntry>,
    unary: HashMap<String, OperatorEntry>,
}

impl OperatorTable {
    /// A table holding only the built-in operators.
    pub fn new() -> Self {
        let mut table = OperatorTable::empty();

        for (spelling, precedence) in BUILTIN_BINARY {
            table.insert(spelling, precedence, Arity::Binary, false);
        }
        for spelling in BUILTIN_UNARY {
            table.insert(spelling, 0, Arity::Unary, false);
        }

        table
    }

    pub fn empty() -> Self {
        OperatorTable {
            binary: HashMap::new(),
            unary: HashMap::new(),
        }
    }

    fn insert(&mut self, spelling: &str, precedence: u32, arity: Arity, user_defined: bool) -> Option<OperatorEntry> {
        let entry = OperatorEntry {
            spelling: String::from(spelling),
            precedence,
            arity,
            user_defined,
        };

        match arity {
            Arity::Binary => self.binary.insert(String::from(spelling), entry),
            Arity::Unary => self.unary.insert(String::from(spelling), entry),
        }
    }

    /// Looks up an operator, preferring its binary form. Unknown spellings are `None`.
    pub fn lookup(&self, spelling: &str) -> Option<(u32, Arity)> {
        self.binary
            .get(spelling)
            .or_else(|| self.unary.get(spelling))
            .map(|entry| (entry.precedence, entry.arity))
    }

    pub fn get(&self, spelling: &str, arity: Arity) -> Option<&OperatorEntry> {
        match arity {
            Arity::Binary => self.binary.get(spelling),
            Arity::Unary => self.unary.get(spelling),
        }
    }

    /// Precedence of `spelling` as an infix operator.
    pub fn binary_precedence(&self, spelling: &str) -> Option<u32> {
        self.binary.get(spelling).map(|entry| entry.precedence)
    }

    /// Records a user operator. The last definition of a spelling wins.
    pub fn register(&mut self, spelling: &str, precedence: u32, arity: Arity) -> Option<OperatorEntry> {
        let previous = self.insert(spelling, precedence, arity, true);

        match &previous {
            Some(entry) if !entry.user_defined => {
                warn!("{} operator `{}` shadows a built-in operator", arity.prefix(), spelling)
            }
            _ => debug!(
                "registered {} operator `{}` with precedence {}",
                arity.prefix(),
                spelling,
                precedence
            ),
        }

        previous
    }

    pub fn is_user_defined(&self, spelling: &str, arity: Arity) -> bool {
        self.get(spelling, arity).map(|entry| entry.user_defined).unwrap_or(false)
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        OperatorTable::new()
    }
}
