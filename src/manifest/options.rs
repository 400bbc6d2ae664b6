/// Configuration types for manifest parsing.
///
/// This module defines the options used to customize how SCOs are emitted
/// and how validation findings are treated at publish time.
/// Configuration options for manifest parsing.
///
/// # Examples
///
/// ```rust
/// use scorm_manifest::{ParseOptions, PublishPolicy};
///
/// // Create with defaults
/// let options = ParseOptions::default();
///
/// // Or customize
/// let options = ParseOptions::new()
///     .with_non_launchable(false)
///     .with_publish_policy(PublishPolicy::Warn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Whether SCO entries whose resource is not launchable are kept in `scos`
    pub include_non_launchable: bool,
    /// Deepest item nesting that is parsed; deeper descendants are dropped
    pub max_item_depth: usize,
    /// What `parse_for_publish` does with an invalid manifest
    pub publish_policy: PublishPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_non_launchable: true,
            max_item_depth: 64,
            publish_policy: PublishPolicy::Block,
        }
    }
}

impl ParseOptions {
    /// Create a new `ParseOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether non-launchable entries (2004 assets) stay in the SCO list.
    ///
    /// When disabled they are left out entirely and `seq_order` only counts
    /// what is emitted.
    #[inline]
    pub fn with_non_launchable(mut self, include: bool) -> Self {
        self.include_non_launchable = include;
        self
    }

    /// Set the maximum item nesting depth.
    ///
    /// Top-level items are depth 0 and are always parsed.
    #[inline]
    pub fn with_max_item_depth(mut self, depth: usize) -> Self {
        self.max_item_depth = depth;
        self
    }

    /// Set the publish policy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scorm_manifest::{ParseOptions, PublishPolicy};
    ///
    /// let options = ParseOptions::new().with_publish_policy(PublishPolicy::Warn);
    /// assert_eq!(options.publish_policy, PublishPolicy::Warn);
    /// ```
    #[inline]
    pub fn with_publish_policy(mut self, policy: PublishPolicy) -> Self {
        self.publish_policy = policy;
        self
    }
}

/// How an invalid manifest is treated when a course is about to be published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishPolicy {
    /// Refuse to publish while validation errors exist.
    #[default]
    Block,
    /// Publish anyway and log the errors.
    Warn,
}
