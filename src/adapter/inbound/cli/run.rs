//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    apply_overrides(&mut config, args, output::is_json());
    config.validate()?;
    config.init_logging();

    if !output::is_quiet() || output::is_json() {
        print_startup_config(&config, args.once);
    }

    orchestration::run(config, args.once).await
}

fn apply_overrides(config: &mut Config, args: &RunArgs, force_json_logs: bool) {
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || force_json_logs {
        config.logging.format = "json".to_string();
    }
    if let Some(bucket) = args.bucket {
        config.schedule.bucket_minutes = bucket;
    }
    if args.no_dedup {
        config.dedup.enabled = false;
    }
}

fn print_startup_config(config: &Config, once: bool) {
    let exchanges: Vec<_> = config
        .enabled_exchanges()
        .map(|exchange| format!("{} ({}%)", exchange.kind, exchange.threshold_pct()))
        .collect();

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Exchanges", exchanges.join(", "));
    if once {
        output::field("Mode", "single scan");
    } else {
        output::field("Bucket", format!("{} min", config.schedule.bucket_minutes));
    }
    if config.dedup.enabled {
        output::field("Dedup", format!("resets at {:?} UTC", config.dedup.reset_hours_utc));
    } else {
        output::warning("Alert dedup disabled - repeated signals will alert every cycle");
    }
    if output::verbosity() > 0 {
        output::field("Log level", &config.logging.level);
        output::field("Timeout", format!("{} ms", config.schedule.fetch_timeout_ms));
    }
}
