use salary_predictor::api;
use salary_predictor::common::config::AppCfg;
use salary_predictor::common::log;
use salary_predictor::model::{load_handle, FsModelRepo};
use salary_predictor::ErrorCode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppCfg::load()?;
    log::init(&cfg);

    let handle = load_handle(&FsModelRepo::new(&cfg));
    if let Err(err) = api::serve(cfg.bind_addr, handle).await {
        tracing::error!(
            ev = "serve_failed",
            code = ErrorCode::Internal as u32,
            addr = %cfg.bind_addr,
            error = %err,
            "server stopped"
        );
        return Err(err.into());
    }
    Ok(())
}
