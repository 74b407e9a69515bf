use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Writes `contents` to `path`, creating parent directories first and
/// replacing any existing file.
pub fn save_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// `<output>.score_<score>`
pub fn checkpoint_path(output: &Path, score: u64) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(format!(".score_{}", score));
    PathBuf::from(name)
}

/// `<base>/out/<input file name>`
pub fn default_output_path(base: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output.txt".into());
    base.join("out").join(name)
}
