//! A Braid-HTTP PUT transaction carrying patches.

use serde::{Deserialize, Serialize};

use crate::core::types::Patch;

/// One PUT transaction: the version it produces, the versions it builds on,
/// and the patches that get from the parents to the new version.
///
/// Encoded with [`make_put_request`](crate::core::protocol::put::make_put_request)
/// and decoded with [`read_put_request`](crate::core::protocol::put::read_put_request).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutRequest {
    pub content_type: String,
    pub accept: String,
    /// Identifier of the version that results once every patch is applied.
    pub version: String,
    /// Versions this one depends on, in order. Sent comma-joined.
    pub parents: Vec<String>,
    pub patches: Vec<Patch>,
}

impl PutRequest {
    #[inline]
    pub fn new(version: impl Into<String>) -> Self {
        PutRequest {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_patch(mut self, patch: Patch) -> Self {
        self.patches.push(patch);
        self
    }

    pub fn with_patches(mut self, patches: Vec<Patch>) -> Self {
        self.patches = patches;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    #[inline]
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }
}
