//! File, stream and fixture behaviour through the public API

use std::fs;

use reliabletxt::{file, fixtures, Document, Encoding, ReliableTxtError, StreamOptions, StreamReader, StreamWriter};
use tempfile::TempDir;

#[test]
fn test_fixture_set_reads_back() {
    let dir = TempDir::new().unwrap();
    fixtures::generate(dir.path()).unwrap();

    for (name, text) in fixtures::examples() {
        for encoding in Encoding::ALL {
            let path = dir.path().join(format!("{}_{}.txt", name, fixtures::suffix(encoding)));
            let document = file::load(&path).unwrap();
            assert_eq!(document, Document::new(text.clone(), encoding), "{}", path.display());
        }
    }
}

#[test]
fn test_stream_reader_matches_read_all_lines() {
    let dir = TempDir::new().unwrap();
    fixtures::generate(dir.path()).unwrap();

    for name in ["Example03_FourLines", "Example04_LongLines", "Example06_UnicodeLineBreaks", "Example02_Empty"] {
        for encoding in Encoding::ALL {
            let path = dir.path().join(format!("{}_{}.txt", name, fixtures::suffix(encoding)));
            let expected = file::read_all_lines(&path).unwrap();
            let options = StreamOptions::default().with_chunk_size(7);
            let streamed: Vec<String> = StreamReader::open(&path, &options)
                .unwrap()
                .collect::<anyhow::Result<_>>()
                .unwrap();
            assert_eq!(streamed, expected, "{}", path.display());
        }
    }
}

#[test]
fn test_writer_and_append_helpers_agree() {
    let dir = TempDir::new().unwrap();
    let streamed = dir.path().join("streamed.txt");
    let appended = dir.path().join("appended.txt");
    let lines = ["alpha", "", "\u{1D11E}", "omega"];

    for encoding in Encoding::ALL {
        let options = StreamOptions::default().with_create_with(encoding).with_append(false);
        let mut writer = StreamWriter::open(&streamed, &options).unwrap();
        for line in lines {
            writer.write_line(line).unwrap();
        }
        writer.close().unwrap();

        file::write_all_text("", &appended, encoding).unwrap();
        for line in lines {
            file::append_all_lines(&[line], &appended, Encoding::Utf8).unwrap();
        }

        assert_eq!(fs::read(&streamed).unwrap(), fs::read(&appended).unwrap());
        assert_eq!(file::read_all_lines(&streamed).unwrap(), lines);
    }
}

#[test]
fn test_errors_keep_their_kind() {
    let dir = TempDir::new().unwrap();
    fixtures::generate(dir.path()).unwrap();

    let err = file::load(dir.path().join("InvalidExample01_Table_UTF8_withoutBOM.txt")).unwrap_err();
    assert_eq!(err.downcast_ref::<ReliableTxtError>(), Some(&ReliableTxtError::NoReliableTxtPreamble));

    let err = file::load(dir.path().join("InvalidExample02_CorruptData_UTF16.txt")).unwrap_err();
    assert_eq!(err.downcast_ref::<ReliableTxtError>(), Some(&ReliableTxtError::StringDecoding));
}
