use std::process::ExitCode;

use notion_page_http::{
    config::{self, DotenvSource},
    job, logging, PageClient,
};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv = config::load_dotenv();

    let log_file = config::log_file_from_lookup(|name| std::env::var(name).ok());
    let (dispatch, log_file_error) =
        match logging::stdout_and_file(&log_file, logging::DEFAULT_FILTER) {
            Ok(dispatch) => (dispatch, None),
            Err(err) => (logging::stdout_only(logging::DEFAULT_FILTER), Some(err)),
        };
    // Ignoring the error keeps an already installed subscriber in place.
    let _ = tracing::dispatcher::set_global_default(dispatch.clone());

    info!(log_file = %log_file.display(), "script started");
    if let Some(err) = log_file_error {
        warn!(log_file = %log_file.display(), error = %err, "log file unavailable, logging to stdout only");
    }
    match dotenv {
        DotenvSource::Loaded(path) => info!(path = %path.display(), "loaded .env file"),
        DotenvSource::NotFound => warn!("no .env file found in this or any parent directory"),
        DotenvSource::Unreadable(err) => warn!(error = %err, ".env file could not be loaded"),
    }
    job::log_environment(std::env::vars_os().map(|(name, value)| {
        (
            name.to_string_lossy().into_owned(),
            value.to_string_lossy().into_owned(),
        )
    }));

    let client = PageClient::new().with_dispatch(dispatch);
    let outcome = job::run(|name| std::env::var(name).ok(), &client).await;
    ExitCode::from(job::exit_status(&outcome))
}
