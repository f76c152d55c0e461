//! Feature flags for optional functionality.

/// Feature flags controlling which gists and capabilities are exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Only list gists whose files are all markdown (or tldraw).
    pub markdown_only: bool,
    /// Include starred gists in the resource list and enable starred tools.
    pub include_starred: bool,
    /// Include archived gists in the resource list.
    pub include_archived: bool,
    /// Include the daily-notes gist in the resource list.
    pub include_daily: bool,
    /// Expose prompts and the prompt tools.
    pub include_prompts: bool,
}

impl FeatureFlags {
    /// Creates feature flags with all features disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            markdown_only: false,
            include_starred: false,
            include_archived: false,
            include_daily: false,
            include_prompts: false,
        }
    }

    /// Creates feature flags with every feature enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            markdown_only: true,
            include_starred: true,
            include_archived: true,
            include_daily: true,
            include_prompts: true,
        }
    }

    /// Enables every flag set in `other`.
    ///
    /// Command-line switches can only turn features on.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            markdown_only: self.markdown_only || other.markdown_only,
            include_starred: self.include_starred || other.include_starred,
            include_archived: self.include_archived || other.include_archived,
            include_daily: self.include_daily || other.include_daily,
            include_prompts: self.include_prompts || other.include_prompts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_only_enables() {
        let file = FeatureFlags {
            include_daily: true,
            ..FeatureFlags::none()
        };
        let cli = FeatureFlags {
            include_prompts: true,
            ..FeatureFlags::none()
        };

        let merged = file.union(cli);
        assert!(merged.include_daily);
        assert!(merged.include_prompts);
        assert!(!merged.include_starred);
        assert_eq!(FeatureFlags::none().union(FeatureFlags::all()), FeatureFlags::all());
    }
}
