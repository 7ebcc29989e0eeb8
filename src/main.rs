use fern::colors::{Color, ColoredLevelConfig};
use log::{error, LevelFilter};
use hobbytag_lib::cli;
use hobbytag_lib::config::AppConfig;

fn setup_logger(level: LevelFilter) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let (config, command) = match AppConfig::parse() {
        Ok(x) => x,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = setup_logger(config.log.level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = cli::run(config, command).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
