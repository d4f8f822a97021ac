use negamax_select::{perft, CozyPosition, Position};

#[test]
fn perft_startpos_small_depths() {
    let mut p = CozyPosition::startpos();
    assert_eq!(perft(&mut p, 1).unwrap(), 20);
    assert_eq!(perft(&mut p, 2).unwrap(), 400);
    assert_eq!(perft(&mut p, 3).unwrap(), 8902);
    assert_eq!(p.ply(), 0, "perft left moves applied");
}

#[test]
fn perft_kiwipete_through_apply_undo() {
    // castling, en passant and promotions all go through the adapter's move conversion
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut p = CozyPosition::from_fen(fen).unwrap();
    assert_eq!(perft(&mut p, 1).unwrap(), 48);
    assert_eq!(perft(&mut p, 2).unwrap(), 2039);
    assert_eq!(perft(&mut p, 3).unwrap(), 97862);
    assert_eq!(p.fen(), CozyPosition::from_fen(fen).unwrap().fen());
}

#[test]
fn perft_endgame_and_promotions() {
    let mut p = CozyPosition::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
    assert_eq!(perft(&mut p, 3).unwrap(), 2812);
    let mut p = CozyPosition::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8").unwrap();
    assert_eq!(perft(&mut p, 2).unwrap(), 1486);
}

#[test]
fn apply_undo_restores_every_field() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut p = CozyPosition::from_fen(fen).unwrap();
    let start_key = p.key();
    let start_fen = p.fen();
    let mut keys = vec![start_key];
    // walk the last generated move a few plies deep, then unwind
    for _ in 0..6 {
        let Some(&mv) = p.legal_moves().last() else { break };
        p.apply(mv).unwrap();
        keys.push(p.key());
    }
    let depth = p.ply();
    for i in (0..depth).rev() {
        p.undo().unwrap();
        assert_eq!(p.key(), keys[i], "key mismatch unwinding to ply {i}");
    }
    assert_eq!(p.fen(), start_fen);
    assert!(p.undo().is_err());
}

#[test]
fn terminal_queries() {
    let mate = CozyPosition::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
    assert!(mate.is_checkmate());
    assert!(!mate.is_stalemate());
    let stale = CozyPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(stale.is_stalemate());
    assert!(!stale.in_check());
}

#[test]
fn en_passant_victim_is_behind_target() {
    let p = CozyPosition::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    let ep = p.find_uci("e5f6").unwrap();
    let mut played = p.clone();
    played.apply_uci("e5f6").unwrap();
    assert_eq!(played.piece_at("f5".parse().unwrap()), None);
    assert!(played.apply_uci("e5e6").is_err());
    assert!(p.is_en_passant(ep));
    assert!(p.is_capture(ep));
    assert_eq!(p.en_passant_victim(ep).map(|s| s.to_string()), Some("f5".to_string()));
    let push = p.find_uci("e5e6").unwrap();
    assert!(!p.is_capture(push));
}
