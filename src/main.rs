use clap::Parser;
use futures::{future, stream, TryStreamExt};
use std::convert::Infallible;
use user_fetch::utils::logger;
use user_fetch::{CliConfig, FetchError, FetchMode, User, UserApi, UserFetchAdapter};

// 不用 #[tokio::main]：blocking client 不能在 async runtime 裡建立或釋放
fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting user-fetch CLI");
    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.resolve_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.category().exit_code());
        }
    };

    let adapter = UserFetchAdapter::with_default_client(settings.api_url)?;

    match fetch(&adapter, config.mode, settings.limit) {
        Ok(users) => {
            tracing::info!("✅ Fetched {} users ({:?})", users.len(), config.mode);
            println!("{}", serde_json::to_string_pretty(&users)?);
        }
        Err(e) => {
            tracing::error!("❌ Fetch failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);
            std::process::exit(e.category().exit_code());
        }
    }

    Ok(())
}

fn fetch(adapter: &UserFetchAdapter, mode: FetchMode, limit: i32) -> user_fetch::Result<Vec<User>> {
    match mode {
        FetchMode::Blocking => adapter.fetch_users_blocking(limit),
        FetchMode::Reactive => {
            let users =
                adapter.fetch_users_reactive(stream::once(future::ready(Ok::<_, Infallible>(limit))))?;
            let runtime = tokio::runtime::Runtime::new().map_err(FetchError::RuntimeError)?;
            runtime.block_on(users.try_collect())
        }
    }
}
