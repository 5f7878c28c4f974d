//! Shared types used across CLI commands and tests.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Where the input is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputSource {
    Stdin,
    File(std::path::PathBuf),
}

impl InputSource {
    /// Name used in diagnostics.
    pub(crate) fn display_name(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }
}
