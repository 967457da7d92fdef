//! Gun Mayhem Headless Demo
//!
//! Runs a scripted match on placeholder sprites, reports the score and
//! verifies determinism by replaying the recorded inputs.
//!
//! Usage: `gun-mayhem [match-config.json]`

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gun_mayhem::{
    VERSION,
    game::{
        arena::{replay_match, Arena},
        assets::ArenaAssets,
        audio::{play_events, RecordingAudio, SoundEffect},
        config::MatchConfig,
        events::GameEventData,
        input::{Action, InputFrame},
        player::PlayerId,
    },
};

/// Length of the demo match (30 seconds at 60 Hz).
const DEMO_TICKS: u32 = 1800;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Gun Mayhem Core v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => MatchConfig::from_path(&path)
            .with_context(|| format!("failed to load match config from {path}"))?,
        None => MatchConfig::default(),
    };
    info!(
        "Arena {}x{} at {} Hz, {} platforms",
        config.arena.width,
        config.arena.height,
        config.arena.tick_rate,
        config.arena.platforms.len()
    );

    demo_match(config)
}

/// Placeholder sprites for every configured colour.
fn demo_assets(config: &MatchConfig) -> ArenaAssets {
    let palette: Vec<(&str, [u8; 4])> = config
        .players
        .iter()
        .map(|player| (player.color.as_str(), color_for(&player.color)))
        .collect();
    ArenaAssets::placeholder(&palette)
}

fn color_for(name: &str) -> [u8; 4] {
    match name {
        "green" => [60, 180, 75, 255],
        "red" => [220, 50, 50, 255],
        "blue" => [50, 90, 220, 255],
        "yellow" => [230, 200, 40, 255],
        _ => [160, 160, 160, 255],
    }
}

/// Scripted input: player 0 advances and fires in bursts, player 1 hops
/// and fires back.
fn scripted_input(player: usize, t: u32) -> InputFrame {
    let mut input = InputFrame::new();
    match player {
        0 => {
            input.set(Action::Left, t % 240 < 150);
            input.set(Action::Right, (200..230).contains(&(t % 240)));
            input.set(Action::Shoot, t % 25 < 2);
        }
        _ => {
            input.set(Action::Right, t % 300 < 120);
            input.set(Action::Up, t % 70 == 0);
            input.set(Action::Shoot, t % 40 < 2);
        }
    }
    input
}

fn demo_match(config: MatchConfig) -> Result<()> {
    info!("=== Starting Demo Match ===");

    let assets = demo_assets(&config);
    let mut arena = Arena::new(config.clone(), &assets).context("failed to start match")?;

    let mut audio = RecordingAudio::default();
    arena.start_ambience(&mut audio);

    let player_ids: Vec<PlayerId> = arena.players().iter().map(|p| p.id()).collect();
    for player in arena.players() {
        info!(
            "Added {} ({}) at ({:.1}, {:.1}) facing {:?}",
            player.name(),
            player.color(),
            player.position.x,
            player.position.y,
            player.direction
        );
    }

    let mut recorded: BTreeMap<PlayerId, Vec<InputFrame>> = BTreeMap::new();
    let mut total_events = 0;

    info!("Running {} ticks...", DEMO_TICKS);

    for t in 0..DEMO_TICKS {
        let mut inputs = BTreeMap::new();
        for (index, id) in player_ids.iter().enumerate() {
            let input = scripted_input(index, t);
            inputs.insert(*id, input);
            recorded.entry(*id).or_default().push(input);
        }

        let result = arena.tick(&inputs);
        total_events += result.events.len();
        play_events(&mut audio, &result.events);

        for event in &result.events {
            if let GameEventData::Respawned { player_id, respawn_count } = event.data {
                let name = arena.player(player_id).map_or("?", |p| p.name());
                info!("Tick {}: {} fell into the void ({} deaths)", event.tick, name, respawn_count);
            }
        }

        // Report every 10 seconds
        if result.tick % 600 == 0 {
            info!(
                "Tick {}: {} bullets in flight, {} events so far",
                result.tick,
                arena.bullets().len(),
                total_events
            );
        }
    }

    // Print final results
    info!("=== Match Results ===");
    let hash = arena.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    for board in arena.scoreboards() {
        let view = board.view();
        info!("{}: {}", view.name, view.deaths_label);
    }
    match arena.leader().and_then(|id| arena.player(id)) {
        Some(leader) => info!("Leader: {}", leader.name()),
        None => info!("Leader: tied"),
    }

    let shots = audio.played.iter().filter(|s| **s == SoundEffect::Shoot).count();
    let hits = audio.played.iter().filter(|s| **s == SoundEffect::Hit).count();
    info!("Total events: {} ({} shots, {} hits)", total_events, shots, hits);
    info!("Draw list: {} commands", arena.draw_list().len());

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_match(config, &assets, &recorded, DEMO_TICKS)
        .context("failed to replay match")?;
    let replay_hash = replayed.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    Ok(())
}
