mod certificate_id;
mod document_id;
mod macros;
mod transaction_id;
mod unit_id;

pub use certificate_id::CertificateId;
pub use document_id::DocumentId;
pub use transaction_id::TransactionId;
pub use unit_id::UnitId;
