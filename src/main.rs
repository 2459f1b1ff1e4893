use ip_range_cidr::config::Config;
use ip_range_cidr::output::render;
use ip_range_cidr::{ranges_to_cidr, read_range_lines};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logging(&config.log_config)?;
    log::info!("#Start main() {:?}", config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let texts = if args.is_empty() {
        read_range_lines(std::io::stdin().lock())?
    } else {
        args
    };
    if texts.is_empty() {
        return Err("No ranges given on the command line or stdin".into());
    }

    let (ranges, blocks) = ranges_to_cidr(&texts, config.compact)?;
    let out = render(config.output, &ranges, &blocks)?;
    println!("{}", out.trim_end());

    Ok(())
}

/// Use the log4rs file when present, otherwise log warnings to stderr.
fn init_logging(path: &str) -> Result<(), Box<dyn Error>> {
    if Path::new(path).exists() {
        log4rs::init_file(path, Default::default())
            .map_err(|e| format!("Error initializing log4rs from {path}: {e}"))?;
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(log_config)?;
    Ok(())
}
