#[cfg(test)]
#[path = "feeler_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::header;
use reqwest::Url;
use tokio::sync::mpsc;
use tokio::time;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::Event;
use crate::domain::models::StreamPayload;
use crate::domain::models::StreamRequest;

/// Parses a millisecond config value, where `0` turns the timeout off.
fn parse_timeout(millis: &str) -> Result<Option<Duration>> {
    let millis = millis
        .parse::<u64>()
        .with_context(|| return format!("Invalid timeout in milliseconds: {millis}"))?;

    if millis == 0 {
        return Ok(None);
    }

    return Ok(Some(Duration::from_millis(millis)));
}

/// Client for the Feeling Interpreter API.
pub struct FeelerApi {
    url: String,
    connect_timeout: String,
    read_timeout: String,
    health_check_timeout: String,
}

impl Default for FeelerApi {
    fn default() -> FeelerApi {
        return FeelerApi {
            url: Config::get(ConfigKey::BackendURL),
            connect_timeout: Config::get(ConfigKey::ConnectTimeout),
            read_timeout: Config::get(ConfigKey::ReadTimeout),
            health_check_timeout: Config::get(ConfigKey::HealthCheckTimeout),
        };
    }
}

impl FeelerApi {
    pub fn url(&self) -> &str {
        return &self.url;
    }

    fn stream_url(&self, user_input: &str) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{url}/stream",
            url = self.url.trim_end_matches('/')
        ))
        .with_context(|| return format!("Invalid backend URL: {}", self.url))?;

        url.query_pairs_mut().append_pair("user_input", user_input);

        return Ok(url);
    }
}

#[async_trait]
impl Backend for FeelerApi {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let mut req = reqwest::Client::new().get(&self.url);
        if let Some(timeout) = parse_timeout(&self.health_check_timeout)? {
            req = req.timeout(timeout);
        }

        let res = match req.send().await {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Feeling Interpreter is not running");
                bail!("Feeling Interpreter is not running");
            }
        };

        if res.status() != 200 {
            tracing::error!(
                status = res.status().as_u16(),
                "Feeling Interpreter health check failed"
            );
            bail!("Feeling Interpreter health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn stream_feeling<'a>(
        &self,
        request: StreamRequest,
        tx: &'a mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let mut client = reqwest::Client::builder();
        if let Some(timeout) = parse_timeout(&self.connect_timeout)? {
            client = client.connect_timeout(timeout);
        }
        let read_timeout = parse_timeout(&self.read_timeout)?;

        let res = client
            .build()?
            .get(self.stream_url(&request.user_input)?)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to open stream to the Feeling Interpreter"
            );
            bail!(
                "Failed to open stream to the Feeling Interpreter, status {}",
                res.status().as_u16()
            );
        }

        let mut stream = std::pin::pin!(res.bytes_stream().eventsource());

        loop {
            let next = match read_timeout {
                Some(timeout) => match time::timeout(timeout, stream.next()).await {
                    Ok(next) => next,
                    Err(_) => bail!(
                        "No stream data received for {}ms",
                        timeout.as_millis()
                    ),
                },
                None => stream.next().await,
            };

            let event = match next {
                Some(Ok(event)) => event,
                Some(Err(err)) => bail!("Stream failed: {err}"),
                None => bail!("Stream closed before completion"),
            };

            if event.data.is_empty() {
                continue;
            }

            tracing::debug!(session_id = %request.session_id, data = %event.data, "Stream event");

            // Anything unreadable is still handed over, the session decides what
            // a bad payload means. Either way nothing useful can follow it.
            let finished = StreamPayload::parse(&event.data)
                .map(|payload| return payload.is_terminal())
                .unwrap_or(true);

            tx.send(Event::StreamMessage(request.session_id, event.data))?;

            if finished {
                return Ok(());
            }
        }
    }
}
