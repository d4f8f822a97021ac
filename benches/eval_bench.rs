use criterion::{criterion_group, criterion_main, Criterion, black_box};
use negamax_select::search::eval::{EvalMode, Evaluator, PieceSquareEvaluator};
use negamax_select::{CozyPosition, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_eval(c: &mut Criterion) {
    let pos = CozyPosition::from_fen(KIWIPETE).unwrap();
    let ev = PieceSquareEvaluator::new(EvalMode::Tapered);
    c.bench_function("full_eval_kiwipete", |ben| {
        ben.iter(|| black_box(ev.full_evaluate(black_box(&pos))))
    });
    let moves = pos.legal_moves();
    c.bench_function("delta_eval_all_moves_kiwipete", |ben| {
        ben.iter(|| {
            let mut acc = 0i32;
            for &m in &moves {
                if let Ok(d) = ev.delta_evaluate(&pos, m) { acc = acc.wrapping_add(d.mg); }
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
