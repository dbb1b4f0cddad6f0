use clap::Parser;
use crm_parent_link::core::{Confirmation, Pipeline};
use crm_parent_link::utils::error::{ErrorSeverity, SyncError};
use crm_parent_link::utils::{logger, validation::Validate};
use crm_parent_link::{
    AssumeYes, CliConfig, ConsolePrompt, HubSpotClient, LocalStorage, ParentLinkPipeline,
    PromptToken, SyncEngine, SyncOutcome,
};
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else if let Err(e) = logger::init_cli_logger(cli.verbose, Path::new(&config.output.logs_dir)) {
        eprintln!("❌ Could not set up logging: {}", e);
        std::process::exit(3);
    }

    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(e);
    }

    let mut credentials = cli.credential_chain(&config);
    if !cli.no_prompt {
        credentials = credentials.with(PromptToken::stdin());
    }
    let access_token = match credentials.resolve() {
        Ok(token) => Some(token),
        Err(SyncError::MissingCredentials) => None,
        Err(e) => fail(e),
    };

    match access_token {
        Some(access_token) => {
            let api =
                match HubSpotClient::new(&config.api, config.association.clone(), &access_token) {
                    Ok(api) => api,
                    Err(e) => fail(e),
                };
            let storage = LocalStorage::new(".".to_string());
            let pipeline = ParentLinkPipeline::new(storage, config, api);

            if cli.yes {
                run(pipeline, AssumeYes).await;
            } else {
                run(pipeline, ConsolePrompt::stdin()).await;
            }
        }
        None => tracing::info!("Update operation aborted."),
    }

    tracing::info!("Update operation finished");
}

async fn run<P: Pipeline, C: Confirmation>(pipeline: P, confirmation: C) {
    let engine = SyncEngine::new(pipeline, confirmation);

    match engine.run().await {
        Ok(SyncOutcome::Aborted { validated_rows }) => {
            println!("Update aborted; {} validated rows were not sent", validated_rows);
        }
        Ok(SyncOutcome::Completed { report, artifacts }) => {
            println!(
                "✅ {} associations updated, {} errors",
                report.results.len(),
                report.errors.len()
            );
            if report.skipped > 0 {
                println!("⚠️  {} rows were not processed (strict mode)", report.skipped);
            }
            println!("📁 Results saved to: {}", artifacts.outputs_path);
            if let Some(errors_path) = artifacts.errors_path {
                println!("📁 Errors saved to: {}", errors_path);
            }
        }
        Err(e) => fail(e),
    }
}

fn fail(e: SyncError) -> ! {
    tracing::error!(
        "An error occurred: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
