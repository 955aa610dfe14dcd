use std::path::PathBuf;

/// Resolves launcher executables such as `npx` or `uvx`.
pub trait ProgramLocator: Send + Sync {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Looks programs up on the system `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPath;

impl ProgramLocator for SystemPath {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
