/// Which way a batch run converts documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Sparse-list (v1) to layered (v2).
    #[default]
    Upgrade,
    /// Layered (v2) back to sparse-list (v1).
    Downgrade,
}

impl Direction {
    /// Suffix for the backup copy of the original file, named after the
    /// format the original was in.
    pub fn backup_extension(self) -> &'static str {
        match self {
            Direction::Upgrade => "v1.json",
            Direction::Downgrade => "v2.json",
        }
    }
}

/// Where converted documents go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Overwrite the input file in place (after backing it up).
    #[default]
    InPlace,
    /// Print converted documents to stdout; leave files untouched.
    Stdout,
    /// Convert and report only.
    DryRun,
}

/// Settings for a batch conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub direction: Direction,
    pub output: OutputMode,
    /// Back up the original before overwriting it.
    pub backup: bool,
}

impl ConvertOptions {
    /// In-place upgrade with backups, the default batch behavior.
    pub fn upgrade() -> Self {
        Self {
            direction: Direction::Upgrade,
            output: OutputMode::InPlace,
            backup: true,
        }
    }

    pub fn writes_files(&self) -> bool {
        self.output == OutputMode::InPlace
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::upgrade()
    }
}
