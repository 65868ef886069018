use std::time::Duration;

use schoolboard_lib::ApiClient;
use schoolboard_lib::Method;
use schoolboard_lib::RequestOptions;
use schoolboard_lib::fetch::{FetchContext, FetchLifecycle, FetchOutcome, FetchRequest};
use schoolboard_lib::navigation::ChannelNavigator;

use super::open_storage;
use crate::error::{CliError, Result};
use crate::settings::Settings;

pub async fn handle(
    settings: &Settings,
    path: String,
    method: String,
    payload: Option<String>,
    timeout: Option<u64>,
) -> Result<()> {
    let base_url = settings
        .base_url
        .clone()
        .ok_or_else(|| CliError::usage("no base URL; pass --base-url or set SCHOOLBOARD_BASE_URL"))?;
    let method = Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| CliError::usage(format!("invalid HTTP method: {}", method)))?;

    let mut request = FetchRequest::new(path).method(method);
    if let Some(payload) = payload {
        request = request.payload(serde_json::from_str(&payload)?);
    }
    if let Some(secs) = timeout {
        request = request.options(RequestOptions::default().timeout(Duration::from_secs(secs)));
    }

    let storage = open_storage(settings).await?;
    let (navigator, mut redirects) = ChannelNavigator::new();
    let client = ApiClient::builder()
        .base_url(base_url)
        .connect_timeout(Duration::from_secs(10))
        .build();
    let context = FetchContext::new(client, storage).with_navigator(std::sync::Arc::new(navigator));

    let lifecycle: FetchLifecycle<serde_json::Value> = FetchLifecycle::new(context, request);
    let outcome = lifecycle.trigger().await;

    while let Ok(event) = redirects.try_recv() {
        println!("Redirect to {}", event.path);
    }

    match outcome {
        FetchOutcome::Success => {
            let data = lifecycle.data().unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        FetchOutcome::Failed(err) => Err(CliError::Fetch(err)),
        FetchOutcome::Unauthorized(reason) => {
            eprintln!("Not logged in: {}. Run `schoolboard login --token <token>`.", reason);
            Ok(())
        }
        FetchOutcome::Superseded | FetchOutcome::Disposed => Ok(()),
    }
}
