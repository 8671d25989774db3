//! Where converted art goes.

use ascii_studio::AsciiArt;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File an image's art is written to, `None` for stdout.
///
/// With several inputs `output` names a directory holding one `<file name>.txt`
/// per input, so `cat.png` and `cat.jpg` land in different files.
pub fn destination(output: Option<&Path>, input: &Path, multiple: bool) -> Option<PathBuf> {
    let output = output?;
    if !multiple {
        return Some(output.to_path_buf());
    }
    let name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Some(output.join(format!("{name}.txt")))
}

/// Two inputs whose art would be written to the same file.
#[derive(Debug, PartialEq, Eq)]
pub struct Collision {
    pub destination: PathBuf,
    pub first: PathBuf,
    pub second: PathBuf,
}

/// First pair of inputs sharing a destination file, if any.
pub fn find_collision(output: Option<&Path>, inputs: &[PathBuf]) -> Option<Collision> {
    let multiple = inputs.len() > 1;
    let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::new();
    for input in inputs {
        let Some(path) = destination(output, input, multiple) else {
            continue;
        };
        if let Some(first) = seen.get(&path) {
            return Some(Collision {
                destination: path,
                first: (*first).clone(),
                second: input.clone(),
            });
        }
        seen.insert(path, input);
    }
    None
}

/// Write one result to its destination.
pub fn emit(
    art: &AsciiArt,
    input: &Path,
    output: Option<&Path>,
    multiple: bool,
) -> io::Result<()> {
    match destination(output, input, multiple) {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, art.to_string())?;
            log::info!("wrote {}", path.display());
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            if multiple {
                writeln!(stdout, "==> {} <==", input.display())?;
            }
            writeln!(stdout, "{art}")
        }
    }
}
