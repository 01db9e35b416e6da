//! Demo driver for the cadence engine.
//!
//! Builds a scene (from play definition files when available, otherwise a
//! built-in showcase), runs the tick loop at a fixed timestep, and paints
//! node transforms to stdout. All the algorithmic work lives in
//! `cadence-core`; this binary is just the host loop and render step.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use cadence_core::{
    load_plays_from_dir, Action, BezierConfig, Ease, Engine, EngineConfig, Node, Painter,
    SharedTarget,
};
use clap::Parser;
use nalgebra_glm as glm;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "cadence demo driver")]
struct Cli {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 240)]
    frames: u64,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Print the scene every N frames (0 = never)
    #[arg(long, default_value_t = 30)]
    paint_every: u64,

    /// Directory of play definition TOML files
    #[arg(long)]
    plays: Option<PathBuf>,
}

type NamedNodes = Vec<(String, Rc<RefCell<Node>>)>;

struct StdoutPainter {
    nodes: NamedNodes,
    every: u64,
}

impl Painter for StdoutPainter {
    fn paint(&mut self, frame: u64, now: f64) {
        if self.every == 0 || frame % self.every != 0 {
            return;
        }
        println!("frame {frame:>5}  t={now:>7.3}s");
        for (name, node) in &self.nodes {
            let node = node.borrow();
            let p = node.position;
            let r = node.rotation;
            let s = node.scale;
            println!(
                "  {name:<8} pos=({:7.2},{:7.2},{:7.2})  rot=({:6.1},{:6.1},{:6.1})  scale=({:5.2},{:5.2},{:5.2})",
                p.x, p.y, p.z, r.x, r.y, r.z, s.x, s.y, s.z
            );
        }
    }
}

fn node_by_name(nodes: &mut NamedNodes, next_id: &mut u64, name: &str) -> Rc<RefCell<Node>> {
    if let Some((_, node)) = nodes.iter().find(|(existing, _)| existing == name) {
        return node.clone();
    }
    let node = Node::shared(*next_id);
    *next_id += 1;
    nodes.push((name.to_string(), node.clone()));
    node
}

/// Attach enabled plays from `dir` to their named nodes. Returns how many
/// were attached.
fn attach_plays(
    engine: &mut Engine,
    nodes: &mut NamedNodes,
    next_id: &mut u64,
    dir: &PathBuf,
) -> usize {
    let plays = match load_plays_from_dir(dir) {
        Ok(plays) => plays,
        Err(err) => {
            tracing::warn!(%err, "failed to load plays");
            return 0;
        }
    };
    let mut attached = 0;
    for play in plays.into_iter().filter(|play| play.enabled) {
        let node = node_by_name(nodes, next_id, &play.target);
        let shared: SharedTarget = node;
        match play.build() {
            Ok(action) => {
                engine.manager_mut().add_action(action, &shared, false);
                attached += 1;
            }
            Err(err) => tracing::warn!(play = %play.id, %err, "skipping play"),
        }
    }
    attached
}

/// Built-in showcase scene used when no play files are found.
fn build_demo_scene(engine: &mut Engine, nodes: &mut NamedNodes, next_id: &mut u64) {
    let hero = node_by_name(nodes, next_id, "hero");
    let shared: SharedTarget = hero;
    let patrol = Action::sequence(vec![
        Action::move_by(1.0, glm::vec3(4.0, 0.0, 0.0)).easing(Ease::SineInOut),
        Action::move_by(1.0, glm::vec3(-4.0, 0.0, 0.0)).easing(Ease::SineInOut),
    ]);
    engine
        .manager_mut()
        .add_action(Action::repeat_forever(patrol), &shared, false);

    let drone = node_by_name(nodes, next_id, "drone");
    let shared: SharedTarget = drone;
    let arc = Action::bezier_by(
        2.0,
        BezierConfig {
            control_1: glm::vec3(0.0, 6.0, 0.0),
            control_2: glm::vec3(8.0, 6.0, 0.0),
            end: glm::vec3(8.0, 0.0, 0.0),
        },
    );
    engine
        .manager_mut()
        .add_action(Action::repeat(arc, 2).with_tag(1), &shared, false);

    let beacon = node_by_name(nodes, next_id, "beacon");
    let shared: SharedTarget = beacon;
    let pulse = Action::spawn(vec![
        Action::scale_by(1.5, glm::vec3(2.0, 2.0, 2.0)).easing(Ease::Out { rate: 2.0 }),
        Action::rotate_by(3.0, glm::vec3(0.0, 0.0, 360.0)),
    ]);
    engine.manager_mut().add_action(pulse, &shared, false);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load();
    let mut engine = Engine::with_config(config.clone());

    let mut nodes: NamedNodes = Vec::new();
    let mut next_id = 1_u64;

    let plays_dir = cli
        .plays
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.play_directory));
    let mut attached = 0;
    if plays_dir.is_dir() {
        attached = attach_plays(&mut engine, &mut nodes, &mut next_id, &plays_dir);
        tracing::info!(count = attached, dir = %plays_dir.display(), "plays attached");
    }
    if attached == 0 {
        build_demo_scene(&mut engine, &mut nodes, &mut next_id);
    }

    engine
        .scheduler_mut()
        .schedule_interval(|tick| tracing::info!(now = tick.now, "heartbeat"), 1.0);

    engine.set_painter(StdoutPainter {
        nodes: nodes.clone(),
        every: cli.paint_every,
    });

    for _ in 0..cli.frames {
        engine.tick(cli.dt);
    }

    println!(
        "simulated {} frames ({:.2}s), {} target(s) still animating, {} timer(s) pending",
        engine.frame(),
        engine.now(),
        engine.manager().target_count(),
        engine.scheduler().len()
    );
}
