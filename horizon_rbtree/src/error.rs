use thiserror::Error;

/// Errors raised by tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError<K> {
    /// The tree rejects equal keys and `key` is already present.
    #[error("this red-black tree does not allow the duplicated key {0:?} to be inserted")]
    DuplicateKey(K),

    /// Recording was requested on a tree built without a recorder.
    #[error("step recording can not be enabled: the tree was built without a step recorder")]
    RecordingMisuse,
}

impl<K> TreeError<K> {
    /// The offending key of a [`TreeError::DuplicateKey`].
    pub fn duplicate_key(&self) -> Option<&K> {
        match self {
            TreeError::DuplicateKey(key) => Some(key),
            TreeError::RecordingMisuse => None,
        }
    }
}

pub type TreeResult<T, K> = Result<T, TreeError<K>>;
