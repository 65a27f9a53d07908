//! Example of writing and reading a ReliableTXT file line by line

use reliabletxt::{encoding::Encoding, file, stream::{StreamOptions, StreamReader, StreamWriter}};

fn main() -> anyhow::Result<()> {
    println!("=== Line Streaming Example ===\n");

    let dir = std::env::temp_dir().join("reliabletxt-line-streaming");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("lines.txt");

    // Create the file as UTF-16 and write lines one at a time
    let options = StreamOptions::default()
        .with_create_with(Encoding::Utf16)
        .with_append(false);
    let mut writer = StreamWriter::open(&path, &options)?;
    for i in 1..=5 {
        writer.write_line(&format!("Line {} \u{6771}", i))?;
    }
    writer.close()?;

    // Appending keeps the existing encoding
    file::append_all_lines(&["Line 6", "Line 7"], &path, Encoding::Utf8)?;
    println!("Encoding on disk: {}", file::encoding(&path)?);

    // Read back in small chunks
    let reader = StreamReader::open(&path, &StreamOptions::default().with_chunk_size(16))?;
    for (i, line) in reader.enumerate() {
        println!("{:>2}: {}", i + 1, line?);
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
