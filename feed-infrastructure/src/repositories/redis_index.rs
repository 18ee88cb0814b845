use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use redis::Value;
use tracing::{debug, info, warn};

use feed_domain::{
    EventIndex, FlatRecord, IndexConfig, Page, SearchHits, FIELD_CATEGORY, FIELD_DAY,
    FIELD_ETIMESTAMP, FIELD_ETYPE, FIELD_GAME_TAGS, FIELD_ID, FIELD_METADATA, FIELD_PHASE,
    FIELD_PLAYER_NAMES, FIELD_PLAYER_TAGS, FIELD_SEASON, FIELD_TEAM_NAMES, FIELD_TEAM_TAGS,
    FIELD_TOURNAMENT,
};
use feed_domain::tag_codec::LIST_SEPARATOR;

const POOL_TIMEOUT: Duration = Duration::from_secs(10);
const MATCH_ALL: &str = "*";

const TAG_FIELDS: [&str; 11] = [
    FIELD_ID,
    FIELD_ETYPE,
    FIELD_CATEGORY,
    FIELD_PLAYER_TAGS,
    FIELD_PLAYER_NAMES,
    FIELD_TEAM_TAGS,
    FIELD_TEAM_NAMES,
    FIELD_GAME_TAGS,
    FIELD_METADATA,
    FIELD_SEASON,
    FIELD_TOURNAMENT,
];
const NUMERIC_FIELDS: [&str; 3] = [FIELD_ETIMESTAMP, FIELD_PHASE, FIELD_DAY];

/// Event index backed by RediSearch over plain hashes.
pub struct RedisEventIndex {
    pool: Pool,
    config: IndexConfig,
}

impl RedisEventIndex {
    pub fn new(config: IndexConfig) -> Result<Self> {
        let mut pool_config = Config::from_url(&config.redis_url);
        let mut pool = PoolConfig::new(config.redis_pool_size);
        pool.timeouts.wait = Some(POOL_TIMEOUT);
        pool.timeouts.create = Some(POOL_TIMEOUT);
        pool.timeouts.recycle = Some(POOL_TIMEOUT);
        pool_config.pool = Some(pool);

        let pool = pool_config
            .create_pool(Some(Runtime::Tokio1))
            .context("failed to create redis pool")?;
        Ok(Self { pool, config })
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| anyhow!("failed to get redis connection: {}", err))
    }

    fn record_key(&self, id: &str) -> String {
        format!("{}{}", self.config.key_prefix, id)
    }

    fn create_command(&self) -> redis::Cmd {
        let mut cmd = redis::cmd("FT.CREATE");
        cmd.arg(&self.config.index_name)
            .arg("ON")
            .arg("HASH")
            .arg("PREFIX")
            .arg(1)
            .arg(&self.config.key_prefix)
            .arg("SCHEMA");
        for field in TAG_FIELDS {
            cmd.arg(field)
                .arg("TAG")
                .arg("SEPARATOR")
                .arg(LIST_SEPARATOR.to_string());
        }
        for field in NUMERIC_FIELDS {
            cmd.arg(field).arg("NUMERIC");
        }
        cmd
    }
}

#[async_trait]
impl EventIndex for RedisEventIndex {
    async fn ensure_index(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let created: redis::RedisResult<()> = self.create_command().query_async(&mut conn).await;
        match created {
            Ok(()) => {
                info!(index = %self.config.index_name, "created search index");
                Ok(())
            }
            Err(err) if is_index_exists(&err) => {
                debug!(index = %self.config.index_name, "search index already exists");
                Ok(())
            }
            Err(err) => Err(anyhow!("failed to create search index: {}", err)),
        }
    }

    async fn insert_records(&self, records: &[(String, FlatRecord)]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let mut pipe = redis::pipe();
        for (id, record) in records {
            let fields: Vec<(&str, &str)> = record.iter().collect();
            pipe.hset_multiple(self.record_key(id), &fields).ignore();
        }
        let mut conn = self.connection().await?;
        let _: () = pipe
            .query_async(&mut conn)
            .await
            .context("failed to write event records")?;
        Ok(())
    }

    async fn search(&self, query: &str, page: Page) -> Result<SearchHits> {
        let query = if query.trim().is_empty() { MATCH_ALL } else { query };
        let mut conn = self.connection().await?;
        let reply: Value = redis::cmd("FT.SEARCH")
            .arg(&self.config.index_name)
            .arg(query)
            .arg("LIMIT")
            .arg(page.offset)
            .arg(page.limit)
            .query_async(&mut conn)
            .await
            .with_context(|| format!("search failed for query {query:?}"))?;
        parse_search_reply(reply)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

fn is_index_exists(err: &redis::RedisError) -> bool {
    err.to_string().to_ascii_lowercase().contains("index already exists")
}

/// `[total, key, [field, value, ...], key, [...], ...]`
///
/// A hit whose document vanished before loading (`Nil`) or whose fields are
/// unreadable is dropped and counted in `skipped`; its siblings are kept.
fn parse_search_reply(reply: Value) -> Result<SearchHits> {
    let items = match reply {
        Value::Array(items) => items,
        other => bail!("unexpected search reply: {:?}", other),
    };
    let mut items = items.into_iter();
    let total = match items.next() {
        Some(Value::Int(total)) => u64::try_from(total).unwrap_or(0),
        other => bail!("search reply has no total: {:?}", other),
    };

    let mut result = SearchHits {
        total,
        ..SearchHits::default()
    };
    while let Some(key) = items.next() {
        let parsed = match items.next() {
            Some(Value::Array(fields)) => parse_hit_fields(fields),
            other => Err(anyhow!("no field list: {:?}", other)),
        };
        match parsed {
            Ok(pairs) => result.hits.push(pairs),
            Err(err) => {
                warn!(key = ?key, "skipping unreadable search hit: {}", err);
                result.skipped += 1;
            }
        }
    }
    Ok(result)
}

fn parse_hit_fields(fields: Vec<Value>) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(fields.len() / 2);
    let mut fields = fields.into_iter();
    while let (Some(field), Some(value)) = (fields.next(), fields.next()) {
        pairs.push((text(field)?, text(value)?));
    }
    Ok(pairs)
}

fn text(value: Value) -> Result<String> {
    match value {
        Value::BulkString(bytes) => {
            String::from_utf8(bytes).map_err(|err| anyhow!("non-utf8 field: {}", err))
        }
        Value::SimpleString(text) => Ok(text),
        Value::Int(number) => Ok(number.to_string()),
        other => Err(anyhow!("unexpected field value: {:?}", other)),
    }
}
