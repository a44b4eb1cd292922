//! Import payload packaging.
//!
//! The import operation takes one base64 `Data` field plus a `Filename`.
//! Row data becomes a generic XML document; a caller-supplied tabular file
//! is shipped as-is. When attached documents are involved, everything is
//! bundled into a zip archive first. The archive is written to a temp file
//! that is removed on success and failure alike, unless the client asked to
//! keep it for debugging.

use std::collections::HashSet;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use relatics_dx_soap::xml;

use crate::error::{Error, ErrorKind, Result};

/// File extensions accepted for caller-supplied tabular data files.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "csv"];

/// Basename used for the upload when the caller does not supply one.
pub const DEFAULT_IMPORT_BASENAME: &str = "relatics_dx_import";

/// Archive folder that attached documents land in; the server expects a
/// flat list under this prefix.
const DOCUMENTS_PREFIX: &str = "Documents";

/// One record of tabular import data; field order is preserved on the wire.
pub type ImportRow = Vec<(String, String)>;

/// The tabular data of one import call.
#[derive(Debug, Clone)]
pub enum ImportData {
    /// Records, serialized to the generic import XML: one `Row` element per
    /// record, one attribute per field.
    Rows(Vec<ImportRow>),
    /// A caller-supplied Excel or csv file, shipped as-is.
    File(PathBuf),
}

impl From<Vec<ImportRow>> for ImportData {
    fn from(rows: Vec<ImportRow>) -> Self {
        ImportData::Rows(rows)
    }
}

impl From<PathBuf> for ImportData {
    fn from(path: PathBuf) -> Self {
        ImportData::File(path)
    }
}

impl From<&Path> for ImportData {
    fn from(path: &Path) -> Self {
        ImportData::File(path.to_path_buf())
    }
}

/// Optional settings for an import call.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    file_name: Option<String>,
    documents: Vec<PathBuf>,
}

impl ImportOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filename reported to Relatics; shows up in the "Imported file"
    /// column of the import log. Any path and extension are stripped; the
    /// extension is derived from the payload.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Attach a document to the import. Filenames must be unique across
    /// the set; the server-side archive format is flat.
    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.documents.push(path.into());
        self
    }

    /// Attach several documents at once.
    pub fn with_documents(
        mut self,
        paths: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        self.documents.extend(paths.into_iter().map(Into::into));
        self
    }

    /// The attached document paths.
    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    pub(crate) fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

/// A packaged payload, ready for the `Data` and `Filename` fields.
#[derive(Debug, Clone)]
pub(crate) struct Payload {
    pub data_base64: String,
    pub filename: String,
}

/// Serialized row data or a reference to the caller's file.
enum PreparedData {
    Xml(String),
    File(PathBuf),
}

/// Package one import payload.
pub(crate) fn build_payload(
    data: &ImportData,
    options: &ImportOptions,
    keep_archive: bool,
) -> Result<Payload> {
    validate(data, options)?;

    let (prepared, extension) = prepare_data(data)?;
    let basename = basename_for(options.file_name());

    if options.documents.is_empty() {
        let data_base64 = match &prepared {
            PreparedData::Xml(xml_text) => general_purpose::STANDARD.encode(xml_text),
            PreparedData::File(path) => general_purpose::STANDARD.encode(fs::read(path)?),
        };
        return Ok(Payload {
            data_base64,
            filename: format!("{basename}.{extension}"),
        });
    }

    let archive = build_archive(&prepared, &extension, &options.documents, &basename, keep_archive)?;
    Ok(Payload {
        data_base64: general_purpose::STANDARD.encode(archive),
        filename: format!("{basename}.zip"),
    })
}

/// Reject empty data and duplicate document names before any file I/O.
fn validate(data: &ImportData, options: &ImportOptions) -> Result<()> {
    let empty = match data {
        ImportData::Rows(rows) => rows.is_empty(),
        ImportData::File(path) => path.as_os_str().is_empty(),
    };
    if empty {
        return Err(Error::new(ErrorKind::Validation(
            "supplied data is empty".to_string(),
        )));
    }

    let mut seen = HashSet::new();
    for path in &options.documents {
        let name = document_name(path);
        if !seen.insert(name.clone()) {
            return Err(Error::new(ErrorKind::Validation(format!(
                "duplicate filename in document list: {name:?}"
            ))));
        }
    }

    Ok(())
}

fn prepare_data(data: &ImportData) -> Result<(PreparedData, String)> {
    match data {
        ImportData::Rows(rows) => Ok((PreparedData::Xml(rows_to_xml(rows)?), "xml".to_string())),
        ImportData::File(path) => {
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string();
            if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
                return Err(Error::new(ErrorKind::UnsupportedFormat(format!(
                    "data file extension {extension:?} is not supported"
                ))));
            }
            Ok((PreparedData::File(path.clone()), extension))
        }
    }
}

/// Serialize rows to the generic import XML.
fn rows_to_xml(rows: &[ImportRow]) -> Result<String> {
    let mut out = String::from("<Import>");
    for row in rows {
        out.push_str("<Row");
        for (field, value) in row {
            if !xml::is_valid_name(field) {
                return Err(Error::new(ErrorKind::Validation(format!(
                    "field name {field:?} is not usable as an XML attribute"
                ))));
            }
            out.push(' ');
            out.push_str(field);
            out.push_str("=\"");
            out.push_str(&xml::escape(value));
            out.push('"');
        }
        out.push_str("/>");
    }
    out.push_str("</Import>");
    Ok(out)
}

/// Strip any path and extension from the caller's filename, falling back to
/// the fixed default.
fn basename_for(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or(DEFAULT_IMPORT_BASENAME)
        .to_string()
}

/// The final path segment of a document path.
fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write the archive to a temp file and hand back its bytes.
///
/// `NamedTempFile` unlinks on drop, which covers every early return below;
/// with `keep_archive` the file is persisted into the temp dir instead.
fn build_archive(
    prepared: &PreparedData,
    extension: &str,
    documents: &[PathBuf],
    basename: &str,
    keep_archive: bool,
) -> Result<Vec<u8>> {
    let mut temp = tempfile::NamedTempFile::new()?;
    let zip_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    {
        let mut archive = ZipWriter::new(temp.as_file_mut());

        for path in documents {
            archive.start_file(format!("{DOCUMENTS_PREFIX}/{}", document_name(path)), zip_options)?;
            archive.write_all(&fs::read(path)?)?;
        }

        archive.start_file(format!("{basename}.{extension}"), zip_options)?;
        match prepared {
            PreparedData::Xml(xml_text) => archive.write_all(xml_text.as_bytes())?,
            PreparedData::File(path) => archive.write_all(&fs::read(path)?)?,
        }

        archive.finish()?;
    }

    let bytes = fs::read(temp.path())?;

    if keep_archive {
        let kept_path = std::env::temp_dir().join(format!("{basename}.zip"));
        temp.persist(&kept_path)
            .map_err(|e| Error::new(ErrorKind::Io(format!("could not keep archive: {e}"))))?;
        debug!(path = %kept_path.display(), "kept import archive");
    }

    Ok(bytes)
}
