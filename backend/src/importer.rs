//! Sequential import pipeline for uploaded demo files.
//!
//! A single coordinator task owns the queue of uploads and drains it one
//! file at a time. Multi-part recordings only combine once every expected
//! part parsed, and the expected count comes from what is still queued for
//! the same base name, which the coordinator can see because nothing else
//! touches the queue.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::import_state;
use crate::parser::{self, ExternalParser, ParseError};
use crate::storage::DemoStorage;

#[derive(Debug, Clone)]
pub struct ImportTask {
    pub upload_id: String,
    pub file_name: String,
}

static PART_NAME: std::sync::LazyLock<regex::Regex> =
    std::sync::LazyLock::new(|| regex::Regex::new(r"^(.+)-p(\d+)\.dem$").unwrap());

/// Splits `falcons-vs-liquid-p2.dem` into `("falcons-vs-liquid", 2)`.
/// Anything without the `-p<N>` suffix is a complete single-file match.
pub fn split_part_name(file_name: &str) -> Option<(&str, u32)> {
    let captures = PART_NAME.captures(file_name)?;
    let base = captures.get(1)?.as_str();
    let number: u32 = captures.get(2)?.as_str().parse().ok()?;
    Some((base, number))
}

/// Identity used for duplicate detection: the team pair is order-insensitive
/// and, like the map, compared case-insensitively; the date is exact.
pub fn duplicate_key(data: &analysis::MatchData) -> (String, String, String, String) {
    let mut names = [
        data.team_a.name.trim().to_lowercase(),
        data.team_b.name.trim().to_lowercase(),
    ];
    names.sort();
    let [first, second] = names;

    (
        first,
        second,
        data.map_name.trim().to_lowercase(),
        data.date.clone(),
    )
}

pub fn is_duplicate(
    existing: &[(String, analysis::MatchData)],
    candidate: &analysis::MatchData,
) -> bool {
    let key = duplicate_key(candidate);
    existing.iter().any(|(_, data)| duplicate_key(data) == key)
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("loading stored demo: {0}")]
    Storage(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Combine(#[from] analysis::combine::CombineError),
    #[error("duplicate match: {team_a} vs {team_b} on {map} ({date}) already exists")]
    Duplicate {
        team_a: String,
        team_b: String,
        map: String,
        date: String,
    },
    #[error("database error: {0}")]
    Db(#[from] diesel::result::Error),
    #[error(transparent)]
    Insert(#[from] crate::store::InsertError),
    #[error("an earlier part of {base} failed to parse, part discarded")]
    AbandonedSet { base: String },
}

pub struct Importer {
    storage: Box<dyn DemoStorage>,
    parser: ExternalParser,
    queue: VecDeque<ImportTask>,
    /// Parsed parts per base name, waiting for the rest of their set.
    pending: HashMap<String, Vec<(u32, analysis::MatchData)>>,
    /// Base names whose set already lost a part; their remaining parts are
    /// discarded instead of being combined into a partial match.
    failed: HashSet<String>,
}

impl Importer {
    pub fn new(storage: Box<dyn DemoStorage>, parser: ExternalParser) -> Self {
        Self {
            storage,
            parser,
            queue: VecDeque::new(),
            pending: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Runs until every task sender is dropped.
    pub async fn run(mut self, mut tasks: tokio::sync::mpsc::UnboundedReceiver<ImportTask>) {
        loop {
            while let Ok(task) = tasks.try_recv() {
                self.queue.push_back(task);
            }

            let task = match self.queue.pop_front() {
                Some(task) => task,
                None => match tasks.recv().await {
                    Some(task) => {
                        self.queue.push_back(task);
                        continue;
                    }
                    None => return,
                },
            };

            let mut db_con = crate::db_connection().await;

            if let Err(e) = crate::store::set_status(
                &mut db_con,
                &task.upload_id,
                import_state::PROCESSING,
                None,
            )
            .await
            {
                tracing::error!("Marking upload as processing: {:?}", e);
            }

            let (state, detail) = match self.process(&task, &mut db_con).await {
                Ok(detail) => {
                    tracing::info!("{}: {}", task.file_name, detail);
                    (import_state::COMPLETED, detail)
                }
                Err(error) => {
                    tracing::error!("Import of {} failed: {}", task.file_name, error);
                    (import_state::ERROR, error.to_string())
                }
            };

            if let Err(e) =
                crate::store::set_status(&mut db_con, &task.upload_id, state, Some(detail)).await
            {
                tracing::error!("Storing import result: {:?}", e);
            }
        }
    }

    #[tracing::instrument(skip(self, db_con), fields(file = %task.file_name))]
    async fn process(
        &mut self,
        task: &ImportTask,
        db_con: &mut diesel_async::AsyncPgConnection,
    ) -> Result<String, ImportError> {
        let (base, number) = match split_part_name(&task.file_name) {
            None => {
                let data = self.parse_upload(task).await?;
                let match_id = self.persist(db_con, &data).await?;
                return Ok(format!("imported as match {}", match_id));
            }
            Some((base, number)) => (base.to_owned(), number),
        };

        if self.failed.contains(&base) {
            if !self.base_still_queued(&base) {
                // Last straggler of the broken set, a re-upload starts clean.
                self.failed.remove(&base);
            }
            return Err(ImportError::AbandonedSet { base });
        }

        let data = match self.parse_upload(task).await {
            Ok(data) => data,
            Err(error) => {
                self.pending.remove(&base);
                if self.base_still_queued(&base) {
                    self.failed.insert(base);
                }
                return Err(error);
            }
        };

        let parts = self.pending.entry(base.clone()).or_default();
        parts.push((number, data));
        let collected = parts.len();

        let remaining = self.base_queued_count(&base);
        if remaining > 0 {
            return Ok(format!(
                "part {} of {} parsed, {} part(s) still queued",
                number, base, remaining
            ));
        }

        let mut parts = self.pending.remove(&base).unwrap_or_default();
        parts.sort_by_key(|(number, _)| *number);
        let combined =
            analysis::combine::combine(parts.into_iter().map(|(_, data)| data).collect())?;

        let match_id = self.persist(db_con, &combined).await?;
        Ok(format!(
            "combined {} part(s) as match {}",
            collected, match_id
        ))
    }

    async fn parse_upload(&self, task: &ImportTask) -> Result<analysis::MatchData, ImportError> {
        let path = self
            .storage
            .fetch(task.upload_id.clone())
            .await
            .map_err(ImportError::Storage)?;

        let parsed = self.parser.parse(&path, &task.file_name).await?;

        let date = chrono::Utc::now().format("%d/%m/%Y").to_string();
        Ok(parser::to_match_data(parsed, date)?)
    }

    async fn persist(
        &self,
        db_con: &mut diesel_async::AsyncPgConnection,
        data: &analysis::MatchData,
    ) -> Result<String, ImportError> {
        let existing = crate::store::load_matches(db_con).await?;
        if is_duplicate(&existing, data) {
            return Err(ImportError::Duplicate {
                team_a: data.team_a.name.clone(),
                team_b: data.team_b.name.clone(),
                map: data.map_name.clone(),
                date: data.date.clone(),
            });
        }

        let match_id = uuid::Uuid::now_v7().to_string();
        crate::store::insert_match(db_con, &match_id, data).await?;

        Ok(match_id)
    }

    fn base_queued_count(&self, base: &str) -> usize {
        self.queue
            .iter()
            .filter(|task| {
                split_part_name(&task.file_name)
                    .map(|(queued_base, _)| queued_base == base)
                    .unwrap_or(false)
            })
            .count()
    }

    fn base_still_queued(&self, base: &str) -> bool {
        self.base_queued_count(base) > 0
    }
}
