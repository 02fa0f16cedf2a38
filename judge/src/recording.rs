use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tictactoe::Histories;
use tracing::info;

/// Writes the histories of every game into numbered JSON files, which can
/// be loaded again to resume a game.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self { num: 1, directory })
    }

    pub fn write_game_recording(&mut self, histories: &Histories) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer(&mut writer, histories)?;
        writeln!(writer)?;
        writer.flush()?;
        info!(path = %filepath.display(), "Recorded game");
        self.num += 1;
        Ok(filepath)
    }
}
