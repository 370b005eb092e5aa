//! Rebound Pong headless driver
//!
//! Plays a match at a fixed frame length and prints the final score as JSON.
//! Usage: `rebound-pong [settings.json] [computer|human]`

use rebound_pong::sim::Key;
use rebound_pong::{Game, Opponent, Settings};

/// Simulated frame length (ms)
const FRAME_MS: f32 = 16.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(arg) = args.next() {
        match Opponent::parse(&arg) {
            Some(opponent) => settings.opponent = opponent,
            None => log::warn!("Unknown opponent {arg:?}, keeping {}", settings.opponent.as_str()),
        }
    }
    log::info!("Rebound Pong (headless) starting, {} ms match", settings.run_ms);

    let mut game = Game::new(&settings);
    // Serve immediately, then let the paddle sit still
    game.key_event(Key::Space, true);

    let mut elapsed = 0.0;
    let mut frames: u64 = 0;
    while elapsed < settings.run_ms {
        game.tick(FRAME_MS);
        let frame = game.frame();
        log::trace!("Frame {}: {} drawables", frames, frame.drawables.len());
        if !frame.overlay.is_empty() && frames % 60 == 0 {
            let lines: Vec<&str> = frame.overlay.iter().map(|l| l.text.as_str()).collect();
            log::debug!("{}", lines.join(" "));
        }
        elapsed += f64::from(FRAME_MS);
        frames += 1;
        if frames == 1 {
            game.key_event(Key::Space, false);
        }
    }

    let score = game.ctx.score;
    log::info!(
        "Match over after {} frames: {}-{} with {} balls",
        frames,
        score.player1,
        score.player2,
        game.ball_count()
    );
    match serde_json::to_string(&score) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not encode score: {err}"),
    }
}
