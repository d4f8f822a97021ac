use std::ops::{Deref, DerefMut};

use crate::board::Position;
use crate::error::SearchError;
use crate::search::eval::EvalTerms;
use crate::types::Move;

/// Running evaluation terms with the prior values kept for undo.
#[derive(Clone, Debug)]
pub struct EvalState {
    current: EvalTerms,
    stack: Vec<EvalTerms>,
}

impl EvalState {
    pub fn new(initial: EvalTerms) -> Self {
        Self { current: initial, stack: Vec::with_capacity(64) }
    }

    #[inline]
    pub fn current(&self) -> EvalTerms { self.current }

    pub fn push(&mut self, delta: EvalTerms) {
        self.stack.push(self.current);
        self.current += delta;
    }

    pub fn pop(&mut self) -> Result<(), SearchError> {
        self.current = self.stack.pop().ok_or(SearchError::NothingToUndo)?;
        Ok(())
    }

    pub fn depth(&self) -> usize { self.stack.len() }
}

/// The position under search together with its incremental evaluation.
/// Moves are played through [`SearchLine::play`], whose guard undoes both on drop.
pub struct SearchLine<'p, P: Position> {
    pos: &'p mut P,
    eval: EvalState,
}

impl<'p, P: Position> SearchLine<'p, P> {
    pub fn new(pos: &'p mut P, initial: EvalTerms) -> Self {
        Self { pos, eval: EvalState::new(initial) }
    }

    #[inline]
    pub fn position(&self) -> &P { &*self.pos }

    #[inline]
    pub fn current(&self) -> EvalTerms { self.eval.current() }

    /// Moves played below the line's root.
    pub fn ply(&self) -> usize { self.eval.depth() }

    pub fn play(&mut self, mv: Move, delta: EvalTerms) -> Result<Played<'_, 'p, P>, SearchError> {
        self.pos.apply(mv)?;
        self.eval.push(delta);
        Ok(Played { line: self })
    }

    fn unplay(&mut self) -> Result<(), SearchError> {
        self.pos.undo()?;
        self.eval.pop()
    }
}

/// One applied move. Dropping it undoes the move, on every exit path.
pub struct Played<'a, 'p, P: Position> {
    line: &'a mut SearchLine<'p, P>,
}

impl<'a, 'p, P: Position> Deref for Played<'a, 'p, P> {
    type Target = SearchLine<'p, P>;
    fn deref(&self) -> &Self::Target { &*self.line }
}

impl<'a, 'p, P: Position> DerefMut for Played<'a, 'p, P> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut *self.line }
}

impl<'a, 'p, P: Position> Drop for Played<'a, 'p, P> {
    fn drop(&mut self) {
        // A successful apply always leaves something to undo.
        if let Err(e) = self.line.unplay() {
            log::error!("undo after search step failed: {e}");
            debug_assert!(false, "unbalanced apply/undo: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CozyPosition;
    use crate::search::eval::{Evaluator, PieceSquareEvaluator};

    #[test]
    fn guard_undoes_on_drop() {
        let mut pos = CozyPosition::startpos();
        let before = pos.clone();
        let ev = PieceSquareEvaluator::default();
        let initial = ev.evaluate_terms(&pos);
        {
            let mut line = SearchLine::new(&mut pos, initial);
            let mv = line.position().find_uci("e2e4").unwrap();
            let delta = ev.delta_evaluate(line.position(), mv).unwrap();
            let played = line.play(mv, delta).unwrap();
            assert_eq!(played.ply(), 1);
            assert_eq!(played.current(), initial + delta);
            drop(played);
            assert_eq!(line.ply(), 0);
            assert_eq!(line.current(), initial);
        }
        assert_eq!(pos.board(), before.board());
    }

    #[test]
    fn failed_apply_leaves_state_alone() {
        let mut pos = CozyPosition::startpos();
        let mut line = SearchLine::new(&mut pos, EvalTerms::default());
        let bogus: Move = "e2e5".parse().unwrap();
        assert!(line.play(bogus, EvalTerms { material: 1, ..Default::default() }).is_err());
        assert_eq!(line.ply(), 0);
        assert_eq!(line.current(), EvalTerms::default());
    }
}
