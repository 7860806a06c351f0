use crate::config::Config;
use crate::entry::{LedgerEntry, Record, HEADER};
use crate::errors::{RenderError, StoreError};
use crate::layout::layout_page;
use crate::pdf::render_pdf;
use crate::report::Summary;
use csv::Trim;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CSV_EXTENSION: &str = "csv";
const PDF_EXTENSION: &str = "pdf";
const TMP_SUFFIX: &str = "tmp";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A directory of reports, each stored as `<name>.csv`. Exported documents
/// are written next to them as `<name>.pdf`.
#[derive(Clone, Debug)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn csv_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let name = canonical_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, CSV_EXTENSION)))
    }

    pub fn pdf_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let name = canonical_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, PDF_EXTENSION)))
    }

    pub fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.csv_path(name)?.exists())
    }

    /// Names of every stored report, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CSV_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        Ok(names)
    }

    /// Reads every entry of the report called `name`, in stored order.
    pub fn load(&self, name: &str) -> Result<Vec<LedgerEntry>, StoreError> {
        let path = self.csv_path(name)?;
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let entries = read_entries(File::open(&path)?)?;
        debug!(report = name, rows = entries.len(), "loaded report");

        Ok(entries)
    }

    /// Stores a new report. Existing reports are never overwritten here.
    pub fn create(&self, name: &str, entries: &[LedgerEntry]) -> Result<PathBuf, StoreError> {
        if entries.is_empty() {
            return Err(StoreError::EmptyReport);
        }
        if self.exists(name)? {
            return Err(StoreError::AlreadyExists(canonical_name(name)?.to_string()));
        }

        self.save(name, entries)
    }

    /// Writes `entries` as the full contents of report `name`, replacing any
    /// previous contents.
    pub fn save(&self, name: &str, entries: &[LedgerEntry]) -> Result<PathBuf, StoreError> {
        let path = self.csv_path(name)?;

        let mut buf = Vec::new();
        write_entries(&mut buf, entries)?;
        write_atomic(&path, &buf)?;
        info!(path = %path.display(), rows = entries.len(), "saved report");

        Ok(path)
    }

    /// Renders report `name` to `<name>.pdf` and returns the document path.
    pub fn export_pdf(&self, name: &str, config: &Config) -> Result<PathBuf, RenderError> {
        let entries = self.load(name)?;
        let summary = Summary::from_entries(&entries)?;
        let page = layout_page(&summary, &config.layout, &config.labels);

        let title = canonical_name(name)?;
        let bytes = render_pdf(&page, title, &config.fonts)?;

        let path = self.pdf_path(name)?;
        write_atomic(&path, &bytes)?;
        info!(path = %path.display(), "exported report");

        Ok(path)
    }
}

/// Decodes report rows from `reader`. A leading byte-order mark is skipped.
///
/// Any row that fails to decode, or whose amount is not a valid
/// non-negative number, aborts the read.
pub fn read_entries<R: Read>(mut reader: R) -> Result<Vec<LedgerEntry>, StoreError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(&data);

    let mut rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut entries = Vec::new();
    for (index, record) in rows.deserialize::<Record>().enumerate() {
        let record = record?;
        // Line 1 is the header.
        let line = index as u64 + 2;
        let entry = LedgerEntry::try_from(record)
            .map_err(|source| StoreError::InvalidRecord { line, source })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Encodes `entries`, preceded by a byte-order mark and the header row.
pub fn write_entries<W: Write>(mut writer: W, entries: &[LedgerEntry]) -> Result<(), StoreError> {
    writer.write_all(UTF8_BOM)?;
    {
        // The header is written by hand so that an empty report still has one.
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut writer);
        wtr.write_record(HEADER)?;
        for entry in entries {
            wtr.serialize(Record::from(entry))?;
        }
        wtr.flush()?;
    }

    Ok(())
}

/// Writes `bytes` to a temporary sibling of `path` and renames it into
/// place, so readers never observe a partially written file.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = tmp_path(path);
    let result = File::create(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });

    match result.and_then(|_| fs::rename(&tmp, path)) {
        Ok(()) => Ok(()),
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Validates a report name and strips an optional `.csv` suffix.
fn canonical_name(name: &str) -> Result<&str, StoreError> {
    let trimmed = name.trim();
    let trimmed = trimmed
        .strip_suffix(&format!(".{}", CSV_EXTENSION))
        .unwrap_or(trimmed);

    let invalid = trimmed.is_empty()
        || trimmed.starts_with('.')
        || trimmed.contains(|c: char| c == '/' || c == '\\');
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }

    Ok(trimmed)
}
