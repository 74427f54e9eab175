//! AI 自对弈
//!
//! 运行方式:
//! ```bash
//! cargo run -p xiangqi-ai --bin selfplay -- [红方难度] [黑方难度] [最大步数]
//!
//! # 红方用 OpenAI、黑方用 DeepSeek 做顾问
//! OPENAI_API_KEY=... DEEPSEEK_API_KEY=... cargo run -p xiangqi-ai --features llm --bin selfplay -- hard hard
//! ```

use std::env;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xiangqi_ai::{AdvisorConfig, ArbiterConfig, ChatAdvisor, Difficulty, MoveAdvisor, MoveArbiter};
use xiangqi_core::{Color, GameState};

const DEFAULT_MAX_PLIES: u32 = 300;

/// 一方的 AI
struct Player {
    arbiter: MoveArbiter,
    advisor: Option<ChatAdvisor>,
}

impl Player {
    fn new(side: Color, difficulty: Difficulty) -> Result<Self> {
        let config = AdvisorConfig::for_side(side);
        let advisor = if config.is_configured() {
            info!("{} uses advisor {} at {}", side, config.model, config.base_url);
            Some(ChatAdvisor::new(config)?)
        } else {
            None
        };

        Ok(Self {
            arbiter: MoveArbiter::new(ArbiterConfig::from_difficulty(difficulty)),
            advisor,
        })
    }
}

fn parse_difficulty(arg: Option<&String>) -> Result<Difficulty> {
    match arg {
        Some(text) => text.parse().map_err(|e: String| anyhow!(e)),
        None => Ok(Difficulty::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("xiangqi_ai=info".parse()?))
        .init();

    let args: Vec<String> = env::args().collect();
    let red_level = parse_difficulty(args.get(1))?;
    let black_level = parse_difficulty(args.get(2))?;
    let max_plies = match args.get(3) {
        Some(text) => text.parse().context("max plies must be a number")?,
        None => DEFAULT_MAX_PLIES,
    };

    info!("Self-play: red={} black={} max_plies={}", red_level, black_level, max_plies);

    let mut red = Player::new(Color::Red, red_level)?;
    let mut black = Player::new(Color::Black, black_level)?;
    let mut game = GameState::new();

    while !game.status().is_terminal() && game.ply() < max_plies {
        let side = game.side_to_move();
        let player = match side {
            Color::Red => &mut red,
            Color::Black => &mut black,
        };

        let decision = match &player.advisor {
            Some(advisor) => {
                player
                    .arbiter
                    .choose_with_advisor(&game, advisor as &dyn MoveAdvisor)
                    .await
            }
            None => player.arbiter.choose(&game),
        };
        let Some(decision) = decision else {
            break;
        };

        let outcome = game.commit_move(decision.mv)?;
        println!(
            "{:>3}. {} {} ({:?}){}",
            outcome.ply,
            side,
            outcome.mv,
            decision.source,
            if outcome.gives_check { " check" } else { "" }
        );

        if let Some(warning) = game.repetition().warning() {
            warn!("{}", warning);
        }
    }

    println!("\n{}", game.board().to_text());
    match game.winner() {
        Some(winner) => println!("{} wins by {} after {} plies", winner, game.status(), game.ply()),
        None if game.status().is_terminal() => println!("Draw by {} after {} plies", game.status(), game.ply()),
        None => println!("No result after {} plies", game.ply()),
    }

    Ok(())
}
