//! Client-side unit identifiers and the strict matching of provider results against them

use std::collections::HashSet;

use indexmap::IndexMap;
use shared_types::{DocumentId, UnitId};
use thiserror::Error;

use crate::model::unit::{ContentKind, RawResult, ResultKey, SignableUnit, UnitContent, UnitItem};
use crate::provider::gateway::model::TimestampToken;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("Empty batch")]
    EmptyBatch,
    #[error("Batch mixes `{expected}` and `{found}` units")]
    MixedBatch {
        expected: ContentKind,
        found: ContentKind,
    },
    #[error("Document `{0}` appears more than once in the batch")]
    DuplicateDocument(DocumentId),
    #[error("Missing result for unit(s) {0:?}")]
    MissingResult(Vec<UnitId>),
    #[error("Result for unknown {0}")]
    UnknownResult(ResultKey),
    #[error("Duplicate result for {0}")]
    DuplicateResult(ResultKey),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCorrelator;

impl UnitCorrelator {
    /// Assigns a fresh identifier to every item, keeping caller order and metadata
    pub fn prepare_batch(
        &self,
        items: Vec<UnitItem>,
    ) -> Result<Vec<SignableUnit>, CorrelationError> {
        let kind = batch_kind(items.iter().map(|item| &item.content))?;

        let mut documents = HashSet::new();
        let duplicate = items.iter().find_map(|item| match &item.content {
            UnitContent::Document(document_id) if !documents.insert(*document_id) => {
                Some(*document_id)
            }
            _ => None,
        });
        if let Some(document_id) = duplicate {
            return Err(CorrelationError::DuplicateDocument(document_id));
        }

        let units: Vec<SignableUnit> = items
            .into_iter()
            .map(|item| SignableUnit::new(UnitId::new_random(), item))
            .collect();

        tracing::debug!("Prepared batch of {} `{kind}` unit(s)", units.len());
        Ok(units)
    }

    /// Strict bijection between results and units, in batch order
    pub fn match_results(
        &self,
        units: &[SignableUnit],
        results: Vec<RawResult>,
    ) -> Result<IndexMap<UnitId, RawResult>, CorrelationError> {
        let expected = units.iter().map(|unit| (unit.result_key(), unit.id()));

        correlate(expected, results.into_iter().map(|result| (result.key, result)))
    }

    /// Strict bijection between timestamp tokens and the given units, in the given order
    pub fn match_timestamps(
        &self,
        unit_ids: &[UnitId],
        tokens: Vec<TimestampToken>,
    ) -> Result<IndexMap<UnitId, Vec<u8>>, CorrelationError> {
        let expected = unit_ids.iter().map(|id| (ResultKey::Unit(*id), *id));

        correlate(
            expected,
            tokens
                .into_iter()
                .map(|token| (ResultKey::Unit(token.id), token.token)),
        )
    }
}

/// Content kind shared by every unit of a non-empty batch
pub fn batch_kind<'a>(
    contents: impl IntoIterator<Item = &'a UnitContent>,
) -> Result<ContentKind, CorrelationError> {
    let mut contents = contents.into_iter();
    let expected = contents
        .next()
        .ok_or(CorrelationError::EmptyBatch)?
        .kind();

    match contents.map(UnitContent::kind).find(|kind| *kind != expected) {
        Some(found) => Err(CorrelationError::MixedBatch { expected, found }),
        None => Ok(expected),
    }
}

fn correlate<V>(
    expected: impl Iterator<Item = (ResultKey, UnitId)>,
    received: impl Iterator<Item = (ResultKey, V)>,
) -> Result<IndexMap<UnitId, V>, CorrelationError> {
    let slots: IndexMap<ResultKey, UnitId> = expected.collect();
    let mut matched: IndexMap<UnitId, V> = IndexMap::with_capacity(slots.len());

    for (key, value) in received {
        let unit_id = *slots
            .get(&key)
            .ok_or(CorrelationError::UnknownResult(key))?;

        if matched.insert(unit_id, value).is_some() {
            return Err(CorrelationError::DuplicateResult(key));
        }
    }

    let missing: Vec<UnitId> = slots
        .values()
        .filter(|unit_id| !matched.contains_key(*unit_id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(CorrelationError::MissingResult(missing));
    }

    Ok(slots
        .values()
        .filter_map(|unit_id| matched.swap_remove(unit_id).map(|value| (*unit_id, value)))
        .collect())
}
