use anyhow::Context as _;
use serde_json::{Value, json};

use crate::cli::FetchArgs;
use crate::cms::{CmsClient, ContentSource as _, Entries};
use crate::config::CmsConfig;

pub async fn run(args: FetchArgs) -> anyhow::Result<()> {
    let config = CmsConfig::from_args(&args.cms)?;
    let query: Value = serde_json::from_str(&args.query).context("parse --query as JSON")?;
    if !query.is_object() {
        anyhow::bail!("--query must be a JSON object");
    }

    let client = CmsClient::new(&config)?;
    let body = client
        .fetch(&args.path, &query)
        .await
        .with_context(|| format!("fetch {}", client.endpoint(&args.path, &query)))?;

    let output = if args.raw {
        body
    } else {
        let entries = Entries::from_body(body);
        json!({ "data": entries.data, "pagination": entries.pagination })
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("serialize response")?
    );
    Ok(())
}
