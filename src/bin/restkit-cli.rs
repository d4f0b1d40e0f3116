use std::collections::BTreeMap;

use axum::http::Method;
use clap::{Parser, ValueEnum};

use restkit::client::{ClientError, Entity, Failure, Request, RestClient};
use restkit::config::ClientConfig;
use restkit::http::media_type::TEXT_PLAIN_UTF_8;

#[derive(Parser)]
#[command(name = "restkit-cli")]
#[command(about = "Issue a request and report which outcome handler ran", long_about = None)]
struct Cli {
    /// HTTP method
    #[arg(value_enum)]
    method: Verb,

    /// Target URL
    url: String,

    /// Path segment appended to the target (repeatable)
    #[arg(long = "path")]
    paths: Vec<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "query", value_parser = parse_query)]
    queries: Vec<(String, String)>,

    /// Header as name:value (repeatable)
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Accepted media type (repeatable)
    #[arg(long = "accept")]
    accepts: Vec<String>,

    /// Request body for POST and PUT
    #[arg(long)]
    data: Option<String>,

    /// Content type of --data
    #[arg(long, default_value = TEXT_PLAIN_UTF_8)]
    content_type: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

fn parse_query(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected name:value, got '{}'", s))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ClientConfig {
        request_timeout_secs: cli.timeout,
        ..ClientConfig::default()
    };
    let client = RestClient::new(&config)?;

    let mut builder = Request::builder(cli.url)
        .headers(cli.headers)
        .accepting(cli.accepts)
        .on_success(|response| {
            println!("success: {}", response.status_info());
            Ok(())
        })
        .on_not_found(|response| {
            println!("not found: {}", response.status_info());
            Ok(())
        })
        .on_unsuccessful(|response| {
            println!("unsuccessful: {}", response.status_info());
            Ok(())
        })
        .on_failure(|failure: Failure<'_>| {
            if failure.is_timeout() {
                eprintln!("failure (timeout): {}", failure);
            } else {
                eprintln!("failure: {}", failure);
            }
            Ok(())
        });
    for segment in cli.paths {
        builder = builder.path(segment);
    }
    let mut queries: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in cli.queries {
        queries.entry(key).or_default().push(value);
    }
    builder = builder.query_params(queries);
    if let Some(data) = cli.data {
        builder = builder.entity(Entity::new(cli.content_type, data));
    }
    let request = builder.build();

    let response = match client.execute(cli.method.into(), &request).await {
        Ok(response) => response,
        // on_failure has already reported the transport error.
        Err(ClientError::NoResponse(_)) => std::process::exit(2),
        Err(e) => return Err(e.into()),
    };

    let mut response = response.detach().await?;
    for (name, value) in response.headers() {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    let body = response.bytes().await?;
    println!();
    println!("{}", String::from_utf8_lossy(&body));

    Ok(())
}
