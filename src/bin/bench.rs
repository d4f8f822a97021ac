use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use negamax_select::{CozyPosition, EngineConfig};
use std::path::PathBuf;
use std::time::Instant;

const SUITE: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
];

#[derive(Parser, Debug)]
#[command(name = "bench", version, about = "Search a fixed FEN suite and report nodes per second")]
struct Args {
    /// Search depth in plies
    #[arg(long, default_value_t = 4)]
    depth: u32,

    /// Extra FENs, one per line ('#' starts a comment)
    #[arg(long)]
    fens: Option<PathBuf>,

    /// JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable the transposition table
    #[arg(long, default_value_t = false)]
    no_tt: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(p) => EngineConfig::from_json_file(p).with_context(|| format!("loading {}", p.display()))?,
        None => EngineConfig::default(),
    };
    if args.no_tt { cfg.search.use_tt = false; }
    cfg.search.depth = args.depth;

    let mut fens: Vec<String> = SUITE.iter().map(|s| s.to_string()).collect();
    if let Some(p) = &args.fens {
        let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
        fens.extend(text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')).map(String::from));
    }

    let bar = ProgressBar::new(fens.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("progress template")?,
    );

    let mut searcher = cfg.build_searcher();
    let t0 = Instant::now();
    let mut total_nodes = 0u64;
    for fen in &fens {
        let mut pos = CozyPosition::from_fen(fen).with_context(|| format!("bad FEN '{fen}'"))?;
        searcher.new_game();
        let res = searcher.think(&mut pos).with_context(|| format!("searching '{fen}'"))?;
        total_nodes += res.stats.nodes;
        bar.set_message(format!("{} {}", res.best_move, res.score));
        bar.println(format!("{fen} bestmove={} score={} nodes={}", res.best_move, res.score, res.stats.nodes));
        bar.inc(1);
    }
    bar.finish_and_clear();

    let dt = t0.elapsed().as_secs_f64();
    let nps = if dt > 0.0 { total_nodes as f64 / dt } else { 0.0 };
    println!("positions={} depth={} nodes={} elapsed={:.3}s nps={:.1}", fens.len(), args.depth, total_nodes, dt, nps);
    Ok(())
}
