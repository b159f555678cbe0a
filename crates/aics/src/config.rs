//! Decode configuration.

/// What the decode loop does when a record fails to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Drop the failing record and everything after it, and return the
    /// records decoded so far. The failure is logged at `warn` level.
    #[default]
    KeepValidPrefix,
    /// Return the first record-level error to the caller.
    Strict,
}

/// Options for [`CaptureFile::decode_with`](crate::CaptureFile::decode_with).
///
/// # Examples
///
/// ```
/// use aics::{DecodeOptions, RecoveryPolicy};
///
/// let opts = DecodeOptions {
///     max_records: Some(100),
///     ..Default::default()
/// };
/// assert_eq!(opts.recovery, RecoveryPolicy::KeepValidPrefix);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Failure handling. Default: [`RecoveryPolicy::KeepValidPrefix`].
    pub recovery: RecoveryPolicy,
    /// Stop after this many records. Reaching the limit is not an error;
    /// the unread bytes are reported as trailing. Default: `None`.
    pub max_records: Option<usize>,
}

impl DecodeOptions {
    /// Options that surface the first record-level error.
    pub fn strict() -> Self {
        Self {
            recovery: RecoveryPolicy::Strict,
            ..Self::default()
        }
    }
}
