//! One run of the page-creation job: configuration, payload, probe, send.

use std::{env, fs};

use tracing::{debug, error, info};

use crate::{
    config::{is_secret_name, JobConfig, API_KEY_VAR},
    page::draft_page,
    request::REDACTED,
    Delivery, PageClient, RequestDescriptor, Result,
};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Runs the job with configuration read through `lookup`.
///
/// Configuration problems are reported before any network traffic happens.
pub async fn run<F>(lookup: F, client: &PageClient) -> Result<Delivery>
where
    F: Fn(&str) -> Option<String>,
{
    client.scoped(run_inner(lookup, client)).await
}

async fn run_inner<F>(lookup: F, client: &PageClient) -> Result<Delivery>
where
    F: Fn(&str) -> Option<String>,
{
    info!("starting page creation job");

    let config = match JobConfig::from_lookup(&lookup) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "cannot start job");
            log_working_directory();
            error!("job failed");
            return Err(err);
        }
    };
    let api_key = if config.api_key.is_some() {
        REDACTED
    } else {
        "<unset>"
    };
    info!(
        api_url = %config.api_url,
        database_id = %config.database_id,
        api_key,
        "configuration loaded"
    );

    let outcome = send_page(&config, client).await;
    match &outcome {
        Ok(delivery) => info!(
            status = delivery.status,
            body = %delivery.body,
            "page created, job completed successfully"
        ),
        Err(err) => error!(kind = ?err.kind(), status = ?err.status(), error = %err, "job failed"),
    }
    outcome
}

async fn send_page(config: &JobConfig, client: &PageClient) -> Result<Delivery> {
    let page = draft_page(config.database_id.as_str());
    let mut request = RequestDescriptor::post_json(config.api_url.as_str(), &page)?;
    if let Some(key) = &config.api_key {
        request = request.secret_header(API_KEY_HEADER, key.expose())?;
    }

    // Probe failures are already logged; the main request goes out either way.
    client.probe(&request).await;
    client.send(&request).await
}

fn log_working_directory() {
    info!(
        "make sure a .env file is reachable or the variables are exported; {} is optional",
        API_KEY_VAR
    );
    match env::current_dir() {
        Ok(cwd) => {
            let entries: Vec<String> = fs::read_dir(&cwd)
                .map(|dir| {
                    dir.filter_map(|entry| entry.ok())
                        .map(|entry| entry.file_name().to_string_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default();
            info!(cwd = %cwd.display(), files = ?entries, "current working directory");
        }
        Err(err) => info!(error = %err, "current working directory is unavailable"),
    }
}

/// Logs every variable at debug level, masking the ones that look secret.
pub fn log_environment<I>(vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    debug!("environment variables:");
    for (name, value) in vars {
        if is_secret_name(&name) {
            debug!("{name} = {REDACTED}");
        } else {
            debug!("{name} = {value}");
        }
    }
}

/// Process exit status for a job outcome.
pub fn exit_status(outcome: &Result<Delivery>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
