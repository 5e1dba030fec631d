use dotenvy::dotenv;
use tracing::info;

use std::net::SocketAddr;
use subdesk::infra::{
    app::create_app,
    config::AppConfig,
    scheduler::run_daily_jobs_loop,
    setup::{init_app_state, init_tracing},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.log_file);

    let app_state = init_app_state(config).await?;

    // Read settings before moving app_state
    let bind_addr = app_state.config.bind_addr;
    let daily_job_hour = app_state.config.daily_job_hour;

    tokio::spawn(run_daily_jobs_loop(
        app_state.subscriber_use_cases.clone(),
        daily_job_hour,
    ));

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
