use encoding_rs::UTF_8;
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// UTF-8 byte order mark. The game only reads localisation files that start with it.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Writes `data` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)
}

/// Writes `data` to `path` prefixed with a UTF-8 BOM.
pub fn write_with_bom(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(data.len() + UTF8_BOM.len());
    buf.extend_from_slice(&UTF8_BOM);
    buf.extend_from_slice(data);
    write_file(path, &buf)
}

/// Lists the regular files of `dir` sorted by file name. Loaders that merge
/// several files let later names override earlier ones.
pub fn sorted_files(dir: &Path) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            entries.push(entry);
        }
    }
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

/// Reads a text file as UTF-8, dropping a leading BOM if there is one.
///
/// Bytes that are not valid UTF-8 become U+FFFD instead of failing the read;
/// hand-edited game files often carry stray Latin-1 bytes in comments.
pub fn read_text(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = DecodeReaderBytesBuilder::new()
        .encoding(Some(UTF_8))
        .strip_bom(true)
        .build(file);
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}
