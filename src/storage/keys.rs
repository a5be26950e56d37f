//! Object key naming
//!
//! Originals land under `originals/`, reconstructed output under
//! `processed/`. Filenames are qualified with the upload timestamp so
//! repeated uploads of the same source file never collide, and the processed
//! key is a pure function of the original key so the two can be correlated
//! without a separate index.

/// Namespace for unmodified uploads.
pub const ORIGINALS_NAMESPACE: &str = "originals";

/// Namespace for reconstructed documents.
pub const PROCESSED_NAMESPACE: &str = "processed";

/// Timestamp-qualified filename: `{epoch_millis}_{original_name}`.
pub fn timestamped_name(original_name: &str, epoch_millis: i64) -> String {
    format!("{}_{}", epoch_millis, original_name)
}

/// Full key for an original upload.
pub fn original_key(original_name: &str, epoch_millis: i64) -> String {
    format!(
        "{}/{}",
        ORIGINALS_NAMESPACE,
        timestamped_name(original_name, epoch_millis)
    )
}

/// Full key for the processed counterpart of `original_key`.
///
/// Drops the extension from the timestamped basename, prefixes `ocr_`, and
/// appends `.pdf`.
pub fn processed_key(original_key: &str) -> String {
    let basename = original_key.rsplit('/').next().unwrap_or(original_key);
    let stem = match basename.rfind('.') {
        Some(idx) => &basename[..idx],
        None => basename,
    };
    format!("{}/ocr_{}.pdf", PROCESSED_NAMESPACE, stem)
}
