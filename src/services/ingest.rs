//! Record ingestion: one tweet row at a time into nodes and edges.

use std::io::Read;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};

use crate::config::{IngestConfig, RecordErrorPolicy};
use crate::error::AppError;
use crate::models::{AttrValue, Attribute, EdgeSpec, Label, NodeRef, Relation, TweetRecord};
use crate::repositories::GraphStore;
use crate::services::registry::{EntityKind, EntityRegistry};
use crate::source::RecordSource;

/// Outcome of an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records fully written.
    pub records: u64,
    /// Malformed records passed over under [`RecordErrorPolicy::Skip`].
    pub skipped: u64,
    pub elapsed: Duration,
}

/// Drives records into a [`GraphStore`].
///
/// Nodes are created only the first time the registry sees their key;
/// edges are created for every occurrence. Within a record, the Tweet and
/// author nodes are written before any edge that references them.
pub struct IngestService<'a, S: GraphStore> {
    store: &'a S,
    registry: EntityRegistry,
    settings: IngestConfig,
    processed: u64,
}

impl<'a, S: GraphStore> IngestService<'a, S> {
    pub fn new(store: &'a S, settings: IngestConfig) -> Self {
        Self {
            store,
            registry: EntityRegistry::new(),
            settings,
            processed: 0,
        }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Ingests every row of `source`.
    ///
    /// Store failures always abort. Malformed rows abort or are skipped
    /// according to the configured policy; nothing is written for a row
    /// that fails to parse.
    pub async fn run<R: Read>(
        &mut self,
        source: &mut RecordSource<R>,
    ) -> Result<IngestSummary, AppError> {
        let started = Instant::now();
        let mut skipped = 0;
        let mut read = 0;
        source.require_header()?;

        for row in source.rows() {
            read += 1;
            let (fields, line) = row?;
            let outcome = match TweetRecord::parse(&fields, line) {
                Ok(record) => self.ingest_record(&record).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => {}
                Err(e)
                    if e.is_record_local()
                        && self.settings.on_record_error == RecordErrorPolicy::Skip =>
                {
                    tracing::warn!(error = %e, "Skipping record");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }

            if progress_due(read, self.settings.progress_interval) {
                tracing::info!("Created {} tweet nodes", self.processed);
            }
        }

        let summary = IngestSummary {
            records: self.processed,
            skipped,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            skipped = summary.skipped,
            "Created {} tweet nodes in {:?}",
            summary.records,
            summary.elapsed
        );
        Ok(summary)
    }

    /// Writes one record: its Tweet node, any unseen entities, and all edges.
    pub async fn ingest_record(&mut self, record: &TweetRecord) -> Result<(), AppError> {
        let time = if self.settings.utc {
            record.time_in(&Utc)?
        } else {
            record.time_in(&Local)?
        };
        let tweet = NodeRef::tweet(record.tweet_id);
        let author = NodeRef::user(record.author_id);

        let mut attributes = vec![Attribute::new("tweet_id", record.tweet_id)];
        attributes.extend(time.attributes());
        attributes.push(Attribute::new("timestamp", record.timestamp));
        self.store
            .create_node(Label::Tweet, &attributes)
            .await
            .map_err(|e| e.writing("tweet"))?;

        if self
            .registry
            .register(EntityKind::User, &record.author_id.to_string())
        {
            self.create_user(record.author_id, false).await?;
        }

        for hashtag in &record.hashtags {
            if self.registry.register(EntityKind::Hashtag, hashtag) {
                self.store
                    .create_node(Label::Hashtag, &[Attribute::new("hashtag", hashtag.as_str())])
                    .await
                    .map_err(|e| e.writing("hashtag"))?;
            }
            let node = NodeRef::hashtag(hashtag);
            self.edge(&tweet, Relation::Contains, &node, "tweet-hashtag relation")
                .await?;
            self.edge(&node, Relation::Contained, &tweet, "hashtag-tweet relation")
                .await?;
        }

        for url in &record.urls {
            if self.registry.register(EntityKind::Url, url) {
                self.store
                    .create_node(Label::Url, &[Attribute::new("url", url.as_str())])
                    .await
                    .map_err(|e| e.writing("url"))?;
            }
            let node = NodeRef::url(url);
            self.edge(&tweet, Relation::Contains, &node, "tweet-url relation")
                .await?;
            self.edge(&node, Relation::Contained, &tweet, "url-tweet relation")
                .await?;
        }

        for &mention in &record.mentions {
            if self
                .registry
                .register(EntityKind::User, &mention.to_string())
            {
                self.create_user(mention, true).await?;
            } else {
                self.store
                    .set_attribute(
                        "user_id",
                        &AttrValue::Int(mention),
                        "mentioned",
                        &AttrValue::Bool(true),
                    )
                    .await
                    .map_err(|e| e.writing("mention"))?;
            }
            self.edge(
                &tweet,
                Relation::Mentions,
                &NodeRef::user(mention),
                "tweet-user mention relation",
            )
            .await?;
        }

        for url in &record.urls {
            for hashtag in &record.hashtags {
                self.edge(
                    &NodeRef::url(url),
                    Relation::Relates,
                    &NodeRef::hashtag(hashtag),
                    "url-hashtag relation",
                )
                .await?;
            }
        }
        for hashtag in &record.hashtags {
            for url in &record.urls {
                self.edge(
                    &NodeRef::hashtag(hashtag),
                    Relation::Relates,
                    &NodeRef::url(url),
                    "hashtag-url relation",
                )
                .await?;
            }
        }

        self.edge(&author, Relation::Tweets, &tweet, "user-tweet relation")
            .await?;
        self.edge(&tweet, Relation::Tweeted, &author, "tweet-user relation")
            .await?;

        self.processed += 1;
        Ok(())
    }

    async fn create_user(&self, user_id: i64, mentioned: bool) -> Result<(), AppError> {
        self.store
            .create_node(
                Label::User,
                &[
                    Attribute::new("user_id", user_id),
                    Attribute::new("mentioned", mentioned),
                ],
            )
            .await
            .map_err(|e| e.writing("user"))
    }

    async fn edge(
        &self,
        from: &NodeRef,
        relation: Relation,
        to: &NodeRef,
        what: &'static str,
    ) -> Result<(), AppError> {
        self.store
            .create_edge(&EdgeSpec::new(from.clone(), relation, to.clone()))
            .await
            .map(|_| ())
            .map_err(|e| e.writing(what))
    }
}

/// Progress is reported by input position, skipped rows included.
fn progress_due(read: u64, interval: u64) -> bool {
    interval > 0 && read % interval == 0
}
