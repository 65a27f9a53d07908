//! Example of encoding and decoding ReliableTXT documents

use reliabletxt::{base64_string, decoder::Decoder, document::Document, encoder::Encoder, encoding::Encoding};

fn main() -> anyhow::Result<()> {
    println!("=== ReliableTXT Example ===\n");

    let text = "Line 1\nLine 2 \u{1D11E}\nLine 3";
    let encoder = Encoder::new();
    let decoder = Decoder::new();

    // Same text in every encoding
    for encoding in Encoding::ALL {
        let bytes = encoder.encode(text, encoding);
        let preview: Vec<String> = bytes.iter().take(8).map(|b| format!("{:02X}", b)).collect();
        println!("{:<15} {:>3} bytes  {} ...", encoding.to_string(), bytes.len(), preview.join(" "));

        let document = decoder.decode(&bytes)?;
        assert_eq!(document.text, text);
        assert_eq!(document.encoding, encoding);
    }
    println!();

    // Lines
    let document = Document::new(text, Encoding::Utf16);
    for (i, line) in document.lines().iter().enumerate() {
        println!("{}: {}", i + 1, line);
    }
    println!();

    // Base64 tokens
    let token = document.to_base64_string();
    println!("Base64 token: {}", token);
    let restored = Document::from_base64_string(&token)?;
    println!("Restored ({}): {:?}", restored.encoding, restored.text);
    println!("Raw bytes token: {}", base64_string::from_bytes(b"Man"));

    // Bytes without a preamble are rejected
    match decoder.decode(b"plain text") {
        Ok(_) => println!("Unexpectedly decoded plain text"),
        Err(err) => println!("Plain text: {}", err),
    }

    Ok(())
}
