//! Group completed trace blocks by their body.
//!
//! Two blocks belong to the same exception when everything after the header
//! line is byte-for-byte identical. The header (usually the log line carrying
//! the exception message) varies between occurrences and is kept per
//! occurrence instead.

use crate::parser::TraceBlock;
use crate::utils::config::{TIMESTAMP_SUFFIX_LEN, UNKNOWN_TIMESTAMP};
use crate::utils::error::AggregateError;
use clap::ValueEnum;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Every occurrence of one distinct trace body
///
/// **Public** - read by the report writers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExceptionGroup {
    /// Number of occurrences
    pub count: usize,

    /// `HH:MM:SS` suffix of the timestamp of each occurrence
    pub timestamps: Vec<String>,

    /// Header line of each occurrence
    pub headers: Vec<String>,
}

impl ExceptionGroup {
    /// Header of the first occurrence
    pub fn first_header(&self) -> Option<&str> {
        self.headers.first().map(String::as_str)
    }
}

/// How long an aggregate state lives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AggregateScope {
    /// One state for the whole run; every report includes earlier files
    #[default]
    Run,

    /// A fresh state for every input file
    File,
}

/// Mapping from trace body to its group, in first-encounter order
///
/// **Public** - owned by the caller and passed to `register`
#[derive(Debug, Clone, Default)]
pub struct AggregateState {
    /// Index into `groups` for each body
    index: HashMap<String, usize>,

    /// Groups in the order their body was first seen
    groups: Vec<(String, ExceptionGroup)>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of a completed block
    ///
    /// **Public** - main entry point for aggregation
    ///
    /// # Errors
    /// * `AggregateError::MissingBody` - block has no line after its header
    pub fn register(&mut self, block: &TraceBlock) -> Result<(), AggregateError> {
        if block.body_lines().is_empty() {
            return Err(AggregateError::MissingBody(block.header().to_string()));
        }

        let suffix = block
            .timestamp()
            .map(timestamp_suffix)
            .unwrap_or(UNKNOWN_TIMESTAMP)
            .to_string();

        let group = self.group_mut(block.body());
        group.count += 1;
        group.timestamps.push(suffix);
        group.headers.push(block.header().to_string());

        Ok(())
    }

    /// Register a batch of blocks in order
    pub fn register_all<'a>(
        &mut self,
        blocks: impl IntoIterator<Item = &'a TraceBlock>,
    ) -> Result<(), AggregateError> {
        for block in blocks {
            self.register(block)?;
        }
        Ok(())
    }

    /// Look up a group, creating an empty one for an unseen body
    pub fn group_mut(&mut self, body: String) -> &mut ExceptionGroup {
        let slot = match self.index.get(&body) {
            Some(&slot) => slot,
            None => {
                debug!("New exception group #{}", self.groups.len() + 1);
                let slot = self.groups.len();
                self.index.insert(body.clone(), slot);
                self.groups.push((body, ExceptionGroup::default()));
                slot
            }
        };

        &mut self.groups[slot].1
    }

    pub fn get(&self, body: &str) -> Option<&ExceptionGroup> {
        self.index.get(body).map(|&slot| &self.groups[slot].1)
    }

    /// Groups in first-encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExceptionGroup)> {
        self.groups.iter().map(|(body, group)| (body.as_str(), group))
    }

    /// Number of distinct bodies
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total occurrences across all groups
    pub fn total_occurrences(&self) -> usize {
        self.groups.iter().map(|(_, group)| group.count).sum()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.groups.clear();
    }
}

/// Last `TIMESTAMP_SUFFIX_LEN` characters of a timestamp (`HH:MM:SS`)
fn timestamp_suffix(timestamp: &str) -> &str {
    let skip = timestamp.chars().count().saturating_sub(TIMESTAMP_SUFFIX_LEN);
    match timestamp.char_indices().nth(skip) {
        Some((start, _)) => &timestamp[start..],
        None => timestamp,
    }
}
