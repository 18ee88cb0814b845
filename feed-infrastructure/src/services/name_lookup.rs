use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use feed_domain::{NameLookup, RuntimeConfig};

/// Resolves display names from the upstream player and team endpoints.
pub struct HttpNameLookup {
    client: Client,
    players_url: String,
    team_url: String,
}

impl HttpNameLookup {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_seconds.max(1)))
            .build()?;
        Ok(Self {
            client,
            players_url: config.players_url.clone(),
            team_url: config.team_url.clone(),
        })
    }

    async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        let value = self
            .client
            .get(url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl NameLookup for HttpNameLookup {
    async fn player_name(&self, player_id: &str) -> Result<String> {
        let players = self
            .get_json(&self.players_url, &[("ids", player_id)])
            .await?;
        player_display_name(&players).ok_or_else(|| anyhow!("player {} has no name", player_id))
    }

    async fn team_name(&self, team_id: &str) -> Result<String> {
        let team = self.get_json(&self.team_url, &[("id", team_id)]).await?;
        team_display_name(&team).ok_or_else(|| anyhow!("team {} has no full name", team_id))
    }
}

/// Scattered players carry their real name in `state.unscatteredName`.
fn player_display_name(players: &Value) -> Option<String> {
    let player = players.as_array()?.first()?;
    player
        .pointer("/state/unscatteredName")
        .and_then(Value::as_str)
        .or_else(|| player.get("name").and_then(Value::as_str))
        .map(str::to_string)
}

fn team_display_name(team: &Value) -> Option<String> {
    team.get("fullName")
        .and_then(Value::as_str)
        .map(str::to_string)
}
