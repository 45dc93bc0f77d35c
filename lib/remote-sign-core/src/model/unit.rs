use serde::{Deserialize, Serialize};
use shared_types::{DocumentId, UnitId};
use strum::{AsRefStr, Display};
use url::Url;

/// Kind of content submitted in a transaction, rendered as route segment
#[derive(Debug, Copy, Clone, Display, AsRefStr, PartialEq, Eq, Hash)]
pub enum ContentKind {
    #[strum(serialize = "document")]
    Document,
    #[strum(serialize = "document-hash")]
    DocumentHash,
    #[strum(serialize = "to-be-signed")]
    ToBeSigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitContent {
    /// Document previously uploaded to the provider
    Document(DocumentId),
    DocumentHash(Vec<u8>),
    ToBeSigned(Vec<u8>),
}

impl UnitContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Document(_) => ContentKind::Document,
            Self::DocumentHash(_) => ContentKind::DocumentHash,
            Self::ToBeSigned(_) => ContentKind::ToBeSigned,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeCoordinates {
    pub x: f32,
    pub y: f32,
}

/// Placement of the visible signature inside a PDF page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualParameters {
    pub page_number: u32,
    pub relative_coordinates: RelativeCoordinates,
    pub relative_width: f32,
    pub relative_height: f32,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitMetadata {
    /// Filename the content originates from
    pub origin: Option<String>,
    pub visual: Option<VisualParameters>,
}

/// Input of [`crate::service::correlation::UnitCorrelator::prepare_batch`]
#[derive(Debug, Clone, PartialEq)]
pub struct UnitItem {
    pub content: UnitContent,
    pub metadata: UnitMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignableUnit {
    id: UnitId,
    pub content: UnitContent,
    pub metadata: UnitMetadata,
}

impl SignableUnit {
    pub(crate) fn new(id: UnitId, item: UnitItem) -> Self {
        Self {
            id,
            content: item.content,
            metadata: item.metadata,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Key under which the provider reports the result of this unit
    pub fn result_key(&self) -> ResultKey {
        match &self.content {
            UnitContent::Document(document_id) => ResultKey::Document(*document_id),
            UnitContent::DocumentHash(_) | UnitContent::ToBeSigned(_) => ResultKey::Unit(self.id),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResultKey {
    Unit(UnitId),
    Document(DocumentId),
}

impl std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit(id) => write!(f, "unit {id}"),
            Self::Document(id) => write!(f, "document {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    SignatureValue {
        value: Vec<u8>,
        timestamp: Option<Vec<u8>>,
    },
    CmsSignedData(Vec<u8>),
    /// Signed revision still held by the provider
    DocumentRevision { href: Url },
    /// Downloaded signed revision
    SignedDocument(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResult {
    pub key: ResultKey,
    pub payload: RawPayload,
}
