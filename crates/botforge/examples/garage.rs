//! botforge garage: builds a few robots, animates one for a few seconds and
//! writes the result as a scene document.
//!
//! Usage: `cargo run -p botforge --example garage [settings.toml]`
//! Set `RUST_LOG=botforge=debug` to watch parts being built.

use std::time::Duration;

use anyhow::Context;
use botforge::render::{self, DrawCall, Renderer};
use botforge::{BodyAccessory, ConfigStore, JsonFileStore, Region, Settings, Workbench};
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Counts draw calls per material instead of drawing.
#[derive(Default)]
struct Tally(std::collections::BTreeMap<String, usize>);

impl Renderer for Tally {
    fn draw(&mut self, call: &DrawCall) {
        *self.0.entry(call.material.name.clone()).or_default() += 1;
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    };
    let mut bench = Workbench::new(settings);

    // === Walk the head catalog ===
    for _ in 0..bench.state().catalog().count(Region::Head) {
        let robot = bench.frame(Duration::from_millis(16));
        println!("{:<10} {:>3} meshes", bench.state().summary().head, robot.mesh_count());
        bench.state_mut().cycle_style(Region::Head);
    }

    // === Accessories ===
    for _ in 0..8 {
        bench.state_mut().cycle_accessory_preset();
        println!("{}", bench.config().accessories());
    }
    for item in BodyAccessory::ALL {
        bench.state_mut().toggle_body_accessory(item);
    }
    println!("dressed up: {}", bench.config().accessories());

    // === A reproducible random robot ===
    let mut rng = Pcg32::seed_from_u64(7);
    bench.state_mut().randomize(&mut rng);
    println!("random: {}", bench.state().summary().to_message()?);

    // === Idle for three seconds at 60 fps ===
    let mut tally = Tally::default();
    let tick = Duration::from_micros(16_667);
    for _ in 1..180 {
        bench.frame(tick);
    }
    let robot = bench.frame(tick);
    let calls = render::submit(&mut tally, &robot);
    println!("{calls} draw calls, idle state {:?}", bench.idle_state());
    for (material, count) in &tally.0 {
        println!("  {material:<18} {count}");
    }

    // === Save, share and export ===
    let mut store = JsonFileStore::open(std::env::temp_dir().join("botforge-garage"))?;
    bench.save(&mut store, "garage")?;
    println!("saved to {}", store.dir().join("garage.json").display());
    assert_eq!(store.load("garage", bench.state().catalog())?, Some(bench.config()));

    println!("share: {}", bench.share_url("https://botforge.example/build")?);

    let doc = bench.assembler().document(&bench.config());
    std::fs::write("garage.json", doc.to_json()?)?;
    println!("wrote garage.json");

    Ok(())
}
