use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::Serialize;

/// Writes a finished run record as one JSON document.
///
/// Compact output puts the whole record on a single line, which suits
/// collecting many runs into a JSON-lines file. Pretty output is for reading.
pub struct RecordWriter<W> {
    writer: W,
    target: String,
    pretty: bool,
}

impl RecordWriter<Box<dyn Write>> {
    /// Opens `path` for writing, or standard output when it is `None` or `-`.
    pub fn open(path: Option<&Path>, pretty: bool) -> anyhow::Result<Self> {
        match path {
            Some(path) if path != Path::new("-") => {
                let file = File::create(path).with_context(|| {
                    format!("Failed to create output file: {}", path.display())
                })?;
                Ok(Self::new(
                    Box::new(BufWriter::new(file)),
                    path.display().to_string(),
                    pretty,
                ))
            }
            _ => Ok(Self::new(
                Box::new(io::stdout().lock()),
                "stdout".to_owned(),
                pretty,
            )),
        }
    }
}

impl<W> RecordWriter<W>
where
    W: Write,
{
    pub fn new(writer: W, target: String, pretty: bool) -> Self {
        Self {
            writer,
            target,
            pretty,
        }
    }

    pub fn write_record<T>(&mut self, record: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, record)
        } else {
            serde_json::to_writer(&mut self.writer, record)
        };
        result.with_context(|| format!("Failed to write JSON to {}", self.target))?;
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write output to {}", self.target))?;
        tracing::debug!(output = %self.target, pretty = self.pretty, "wrote record");
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;
    Ok(value)
}

/// Reads a text file, or standard input when `path` is `-`.
pub fn read_text_input(file_kind: &str, path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        return io::read_to_string(io::stdin())
            .with_context(|| format!("Failed to read {file_kind} from stdin"));
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))
}
