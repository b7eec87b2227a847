//! Control-loop driver for the waypoint test play.
use anyhow::Result;
use gameplay::{Driver, DriverConfig, Status};
use tokio::time::{self, MissedTickBehavior};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DriverConfig::from_env();
    let mut driver = Driver::from_config(&config)?;

    if config.dump_graph {
        println!("{}", driver.play().play().to_dot());
        println!("{}", driver.describe());
    }

    tracing::info!(
        hz = config.loop_config.tick_hz,
        robot = config.robot_id,
        max_speed = driver.world().max_speed(),
        continuous = config.continuous,
        "starting test move sequence"
    );

    let mut interval = time::interval(config.loop_config.period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("interrupted");
                break;
            }
            _ = interval.tick() => {}
        }

        if let Status::Finished(_) = driver.step()? {
            break;
        }
        if config
            .loop_config
            .max_ticks
            .is_some_and(|max| driver.ticks() >= max)
        {
            tracing::info!(ticks = driver.ticks(), "tick limit reached");
            break;
        }
    }

    tracing::info!(ticks = driver.ticks(), laps = driver.laps(), "driver stopped");
    Ok(())
}
