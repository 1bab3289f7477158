use clap::Parser;
use vehicle_etl::core::ConfigProvider;
use vehicle_etl::utils::error::ErrorSeverity;
use vehicle_etl::utils::{logger, validation::Validate};
use vehicle_etl::{CliConfig, EtlEngine, EtlError, LocalStorage, TomlConfig, VehiclePipeline};

async fn run_with<C>(config: C, monitor: bool) -> vehicle_etl::Result<()>
where
    C: ConfigProvider + Validate + 'static,
{
    config.validate()?;

    let pipeline = VehiclePipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);
    let report = engine.run().await?;

    println!("Read {} rows", report.stats.lines_read);
    println!(
        "OK rows: {:04}, Rejected rows: {:04}",
        report.stats.accepted, report.stats.rejected
    );
    Ok(())
}

fn exit_code(e: &EtlError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting vehicle-etl");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.config.clone() {
        Some(path) => match TomlConfig::from_file(&path) {
            Ok(toml) => {
                let monitor = cli.monitor || toml.monitoring_enabled();
                run_with(toml, monitor).await
            }
            Err(e) => Err(e),
        },
        None => {
            let monitor = cli.monitor;
            run_with(cli, monitor).await
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let code = exit_code(&e);
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}
