//! Build mode and per-run options.

/// Build mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Debug builds honor `assets.compile.sourcemap` and skip minification
    /// while source maps are on.
    pub debug: bool,
}

impl BuildMode {
    /// Production mode: optimized output without debug metadata.
    pub const PRODUCTION: Self = Self { debug: false };

    /// Development mode: source maps allowed.
    pub const DEVELOPMENT: Self = Self { debug: true };

    #[inline]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        Self::PRODUCTION
    }
}

/// Options for one build run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Compute everything, write nothing to the output tree.
    pub dry_run: bool,
    pub mode: BuildMode,
}

impl BuildOptions {
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }
}
