use std::path::Path;

/// Read a file as UTF-8, falling back to Windows-1252 — the encoding the
/// CPA's spreadsheet tool uses when exporting CSV.
pub(crate) fn read_file_as_utf8(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn utf8_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn cp1252_bytes_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        // 0xE9 is 'é' in Windows-1252 but invalid as a lone UTF-8 byte.
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"name\nRen\xe9e\n").unwrap();
        drop(f);
        assert_eq!(read_file_as_utf8(&path).unwrap(), "name\nRenée\n");
    }
}
