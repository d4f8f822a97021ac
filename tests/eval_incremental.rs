use negamax_select::search::eval::{EvalMode, Evaluator, PieceSquareEvaluator};
use negamax_select::search::line::SearchLine;
use negamax_select::{CozyPosition, Position};
use pretty_assertions::assert_eq;

const FENS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    // castling both sides, captures, en passant b4a3
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b KQkq a3 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    // white en passant e5f6
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    // capture-promotion d7c8
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    // white capture-promotion b7a8, black side in check
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    // quiet promotions, black capture-promotion a2b1
    "8/P6k/8/8/8/8/p7/K7 w - - 0 1",
    "8/P6k/8/8/8/8/p7/2K5 b - - 0 1",
    "8/7k/8/8/8/8/p7/1N2K3 b - - 0 1",
    "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

const MODES: [EvalMode; 3] = [EvalMode::Material, EvalMode::Static, EvalMode::Tapered];

#[test]
fn delta_matches_full_recompute_for_every_move() {
    for mode in MODES {
        let ev = PieceSquareEvaluator::new(mode);
        for fen in FENS {
            let mut pos = CozyPosition::from_fen(fen).expect("valid FEN");
            let before = ev.evaluate_terms(&pos);
            for mv in pos.legal_moves() {
                let delta = ev.delta_evaluate(&pos, mv).expect("delta for legal move");
                pos.apply(mv).unwrap();
                let after = ev.evaluate_terms(&pos);
                assert_eq!(before + delta, after, "{mode:?} {fen} {mv}");
                pos.undo().unwrap();
                assert_eq!(ev.evaluate_terms(&pos), before, "undo drift {fen} {mv}");
            }
        }
    }
}

#[test]
fn full_evaluation_is_idempotent() {
    let ev = PieceSquareEvaluator::new(EvalMode::Tapered);
    for fen in FENS {
        let pos = CozyPosition::from_fen(fen).unwrap();
        assert_eq!(ev.full_evaluate(&pos), ev.full_evaluate(&pos));
        assert_eq!(ev.evaluate_terms(&pos), ev.evaluate_terms(&pos));
    }
}

#[test]
fn incremental_line_tracks_a_two_ply_walk() {
    // every move, then every reply, compared against recomputation
    let ev = PieceSquareEvaluator::new(EvalMode::Tapered);
    let mut pos = CozyPosition::from_fen(FENS[2]).unwrap();
    let initial = ev.evaluate_terms(&pos);
    let mut line = SearchLine::new(&mut pos, initial);
    let first = line.position().legal_moves();
    for m1 in first {
        let d1 = ev.delta_evaluate(line.position(), m1).unwrap();
        let mut l1 = line.play(m1, d1).unwrap();
        assert_eq!(l1.current(), ev.evaluate_terms(l1.position()));
        for m2 in l1.position().legal_moves() {
            let d2 = ev.delta_evaluate(l1.position(), m2).unwrap();
            let l2 = l1.play(m2, d2).unwrap();
            assert_eq!(l2.current(), ev.evaluate_terms(l2.position()), "{m1} {m2}");
        }
    }
    assert_eq!(line.current(), initial);
    assert_eq!(line.ply(), 0);
}

#[test]
fn capture_removes_victim_value() {
    // Qe2xd2 wins a queen
    let ev = PieceSquareEvaluator::new(EvalMode::Material);
    let pos = CozyPosition::from_fen("k7/8/8/8/8/8/3qQ3/7K w - - 0 1").unwrap();
    let mv = pos.find_uci("e2d2").unwrap();
    let delta = ev.delta_evaluate(&pos, mv).unwrap();
    assert_eq!(delta.material, 900);
}

#[test]
fn promotion_swaps_pawn_for_piece() {
    let ev = PieceSquareEvaluator::new(EvalMode::Material);
    let pos = CozyPosition::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let q = ev.delta_evaluate(&pos, pos.find_uci("a7a8q").unwrap()).unwrap();
    let n = ev.delta_evaluate(&pos, pos.find_uci("a7a8n").unwrap()).unwrap();
    assert_eq!(q.material, 800);
    assert_eq!(n.material, 200);
    assert!(q.phase > n.phase);
}

#[test]
fn delta_refuses_illegal_moves() {
    use negamax_select::SearchError;
    let ev = PieceSquareEvaluator::default();
    let pos = CozyPosition::startpos();
    // blocked pawn push, blocked sliders, castling through own pieces
    for uci in ["e2e5", "a1a5", "d1h5", "e1g1", "e1c1"] {
        let mv = uci.parse().unwrap();
        assert!(!pos.is_legal(mv), "{uci}");
        assert!(matches!(ev.delta_evaluate(&pos, mv), Err(SearchError::InvalidMove { .. })), "{uci} accepted");
    }
    // castling out of check
    let checked = CozyPosition::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
    let castle = "e1g1".parse().unwrap();
    assert!(matches!(ev.delta_evaluate(&checked, castle), Err(SearchError::InvalidMove { .. })));
}

#[test]
fn mobility_leaf_matches_full_evaluation_after_moves() {
    // leaf score from running terms equals a full evaluation once mobility is added
    let ev = PieceSquareEvaluator::new(EvalMode::Tapered).with_mobility(3);
    let mut pos = CozyPosition::from_fen(FENS[2]).unwrap();
    let initial = ev.evaluate_terms(&pos);
    let mut line = SearchLine::new(&mut pos, initial);
    for mv in line.position().legal_moves() {
        let delta = ev.delta_evaluate(line.position(), mv).unwrap();
        let child = line.play(mv, delta).unwrap();
        assert_eq!(ev.leaf_score(child.position(), &child.current()), ev.full_evaluate(child.position()), "{mv}");
    }
}
