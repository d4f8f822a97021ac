use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use negamax_select::search::eval::{is_mate_score, EvalMode, Evaluator};
use negamax_select::{CozyPosition, EngineConfig, Position, TieBreak};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EvalArg { Material, Static, Tapered }

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TieArg { First, Random }

#[derive(Parser, Debug)]
#[command(name = "chess-select", version, about = "Pick a move for a FEN position with negamax alpha-beta")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// JSON engine config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Search depth in plies
    #[arg(long)]
    depth: Option<u32>,

    /// Time budget in milliseconds (iterative deepening up to depth)
    #[arg(long)]
    movetime: Option<u64>,

    /// Evaluation function
    #[arg(long, value_enum)]
    eval: Option<EvalArg>,

    /// Mobility weight in centipawns per move (0 = off)
    #[arg(long)]
    mobility: Option<i32>,

    /// Tie-break among equal-best root moves
    #[arg(long, value_enum)]
    tie: Option<TieArg>,

    /// RNG seed for random tie-breaking
    #[arg(long)]
    seed: Option<u64>,

    /// Transposition table size in MB
    #[arg(long)]
    hash_mb: Option<usize>,

    /// Disable the transposition table
    #[arg(long, default_value_t = false)]
    no_tt: bool,

    /// Print every root move with its score
    #[arg(long, default_value_t = false)]
    all: bool,

    /// Emit the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(p) => EngineConfig::from_json_file(p).with_context(|| format!("loading {}", p.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(d) = args.depth { cfg.search.depth = d; }
    if args.movetime.is_some() { cfg.search.movetime_ms = args.movetime; }
    if args.seed.is_some() { cfg.search.seed = args.seed; }
    if let Some(mb) = args.hash_mb { cfg.hash_mb = mb; }
    if let Some(w) = args.mobility { cfg.mobility_weight = w; }
    if args.no_tt { cfg.search.use_tt = false; }
    if let Some(e) = args.eval {
        cfg.eval = match e { EvalArg::Material => EvalMode::Material, EvalArg::Static => EvalMode::Static, EvalArg::Tapered => EvalMode::Tapered };
    }
    if let Some(t) = args.tie {
        cfg.search.tie_break = match t { TieArg::First => TieBreak::First, TieArg::Random => TieBreak::Random };
    }

    let mut pos = if args.fen == "startpos" {
        CozyPosition::startpos()
    } else {
        CozyPosition::from_fen(&args.fen).with_context(|| format!("bad FEN '{}'", args.fen))?
    };
    if pos.legal_moves().is_empty() {
        let what = if pos.in_check() { "checkmate" } else { "stalemate" };
        anyhow::bail!("no move to select: position is {what}");
    }

    let mut searcher = cfg.build_searcher();
    let static_cp = searcher.evaluator().full_evaluate(&pos);
    let res = searcher.think(&mut pos).context("search failed")?;
    let st = res.stats;
    let secs = st.elapsed.as_secs_f64();
    let nps = if secs > 0.0 { st.nodes as f64 / secs } else { 0.0 };

    let roots = if args.all { searcher.score_root_moves(&mut pos, res.depth).context("scoring root moves")? } else { Vec::new() };

    if args.json {
        let out = serde_json::json!({
            "fen": pos.fen(),
            "bestmove": res.best_move.to_string(),
            "score": res.score,
            "mate": is_mate_score(res.score),
            "static_eval": static_cp,
            "depth": res.depth,
            "nodes": st.nodes,
            "tt_hits": st.tt_hits,
            "tt_cutoffs": st.tt_cutoffs,
            "beta_cutoffs": st.beta_cutoffs,
            "elapsed_ms": st.elapsed.as_millis() as u64,
            "nps": nps,
            "root_moves": roots.iter().map(|(m, s)| serde_json::json!({ "move": m.to_string(), "score": s })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (m, s) in &roots { println!("{m} {s}"); }
        if is_mate_score(res.score) { println!("mate found"); }
        println!(
            "bestmove={} score={} depth={} nodes={} tt_hits={} cutoffs={} elapsed={:.3}s nps={:.1}",
            res.best_move, res.score, res.depth, st.nodes, st.tt_hits, st.beta_cutoffs, secs, nps
        );
    }
    Ok(())
}
