//! Buffered token stream with pushback and speculative parsing support.
//!
//! The stream always holds the current token, so inspecting it never
//! touches the underlying [`TokenSource`]. Tokens consumed while a
//! checkpoint is open are remembered, so a failed speculative parse can
//! rewind and re-read them in their original order.

use std::collections::VecDeque;

use log::trace;

use crate::{
    errors::errors::Error,
    lexer::{
        lexer::TokenSource,
        tokens::{Token, TokenKind},
    },
    SourceLocation, MK_TOKEN,
};

/// A position in the stream that can later be rewound to or committed.
#[derive(Debug)]
#[must_use]
pub struct Checkpoint {
    mark: usize,
    depth: usize,
}

pub struct TokenStream {
    source: Box<dyn TokenSource>,
    /// Tokens waiting to be read. The front is the current token.
    pending: VecDeque<Token>,
    /// Tokens consumed since the outermost open checkpoint.
    history: Vec<Token>,
    open_checkpoints: usize,
    lex_error: Option<Error>,
}

impl TokenStream {
    pub fn new(source: Box<dyn TokenSource>) -> Self {
        let mut stream = TokenStream {
            source,
            pending: VecDeque::new(),
            history: vec![],
            open_checkpoints: 0,
            lex_error: None,
        };
        stream.fill();
        stream
    }

    /// A stream that is already at its end.
    pub fn empty() -> Self {
        TokenStream::new(Box::new(VecDeque::new()))
    }

    fn fill(&mut self) {
        if !self.pending.is_empty() {
            return;
        }

        let token = match self.source.next_token() {
            Ok(token) => token,
            Err(error) => {
                let location = error.get_location();
                self.lex_error = Some(error);
                MK_TOKEN!(TokenKind::Invalid, String::from("<invalid>"), location)
            }
        };
        self.pending.push_back(token);
    }

    pub fn current(&self) -> &Token {
        // `fill` runs after every mutation, so the front is always present
        &self.pending[0]
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current().location
    }

    /// Consumes the current token and returns it.
    pub fn advance(&mut self) -> Token {
        let token = match self.pending.pop_front() {
            Some(token) => token,
            None => MK_TOKEN!(TokenKind::EOF, String::from("EOF"), SourceLocation::null()),
        };

        if token.kind != TokenKind::EOF && self.open_checkpoints > 0 {
            self.history.push(token.clone());
        }

        if token.kind == TokenKind::EOF {
            // EOF is sticky
            self.pending.push_front(token.clone());
        }

        self.fill();
        token
    }

    /// Pushes tokens back so they are read next, in the order given.
    pub fn requeue(&mut self, tokens: Vec<Token>) {
        trace!("requeue: {} token(s)", tokens.len());
        for token in tokens.into_iter().rev() {
            self.pending.push_front(token);
        }
    }

    pub fn checkpoint(&mut self) -> Checkpoint {
        self.open_checkpoints += 1;
        Checkpoint {
            mark: self.history.len(),
            depth: self.open_checkpoints,
        }
    }

    /// Returns the stream to the state it had when `checkpoint` was taken.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(checkpoint.depth, self.open_checkpoints);
        let replay = self.history.split_off(checkpoint.mark);
        self.requeue(replay);
        self.close(checkpoint);
    }

    /// Keeps everything consumed since `checkpoint`.
    pub fn commit(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(checkpoint.depth, self.open_checkpoints);
        self.close(checkpoint);
    }

    fn close(&mut self, _checkpoint: Checkpoint) {
        self.open_checkpoints = self.open_checkpoints.saturating_sub(1);
        if self.open_checkpoints == 0 {
            self.history.clear();
        }
    }

    /// The error behind the most recent `Invalid` token.
    pub fn lex_error(&self) -> Option<Error> {
        self.lex_error.clone()
    }
}
