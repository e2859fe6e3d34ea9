//! File-backed store backend.
//!
//! Points are persisted as one JSON object per line. Inserts append a
//! single line; removals rewrite the whole file through a temp file and an
//! atomic rename. The full point log is also kept in memory, so reads never
//! touch the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use super::memory::run_search;
use super::{FieldValue, Point, Predicate, SeriesStore};
use crate::clock::Clock;
use crate::error::{Error, Result};

pub struct FileStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    points: RwLock<Vec<Point>>,
}

impl FileStore {
    /// Opens the store, loading any existing points from `path`.
    pub async fn open(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let points = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_lines(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(path = %path.display(), points = points.len(), "opened file store");
        Ok(Self {
            path,
            clock,
            points: RwLock::new(points),
        })
    }

    async fn append_line(&self, point: &Point) -> Result<()> {
        let mut line = serde_json::to_string(point)
            .map_err(|e| Error::Storage(format!("serialize point: {}", e)))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn rewrite(&self, points: &[Point]) -> Result<()> {
        let mut contents = String::new();
        for point in points {
            let line = serde_json::to_string(point)
                .map_err(|e| Error::Storage(format!("serialize point: {}", e)))?;
            contents.push_str(&line);
            contents.push('\n');
        }

        // Write to a sibling temp file, then rename over the original so a
        // crash mid-rewrite never leaves a truncated data file.
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

fn parse_lines(contents: &str) -> Result<Vec<Point>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::Storage(format!("corrupt point at line {}: {}", i + 1, e)))
        })
        .collect()
}

#[async_trait]
impl SeriesStore for FileStore {
    async fn insert(
        &self,
        tags: BTreeMap<String, String>,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<()> {
        let point = Point {
            time: self.clock.now_millis(),
            tags,
            fields,
        };

        // The write guard spans file append and index update so concurrent
        // mutations never interleave.
        let mut points = self.points.write().await;
        self.append_line(&point).await?;
        points.push(point);
        Ok(())
    }

    async fn search(
        &self,
        predicate: &Predicate,
        sorted: bool,
        limit: Option<usize>,
    ) -> Result<Vec<Point>> {
        let points = self.points.read().await;
        Ok(run_search(&points, predicate, sorted, limit))
    }

    async fn remove(&self, predicate: &Predicate) -> Result<usize> {
        let mut points = self.points.write().await;
        let retained: Vec<Point> = points
            .iter()
            .filter(|p| !predicate.matches(p))
            .cloned()
            .collect();
        let removed = points.len() - retained.len();
        if removed > 0 {
            self.rewrite(&retained).await?;
            *points = retained;
        }
        Ok(removed)
    }
}
