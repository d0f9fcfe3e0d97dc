use std::{env, fs, path::PathBuf};

use lexdb_chunk::{chunk_smart, extract_legal_spans};
use lexdb_core::config::ChunkingConfig;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file> [chunk_size] [chunk_overlap]", args[0]);
        eprintln!("Example: {} diario-2024-03.txt 500 50", args[0]);
        std::process::exit(1);
    }
    let path = PathBuf::from(&args[1]);
    let defaults = ChunkingConfig::default();
    let chunk_size = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(defaults.chunk_size);
    let chunk_overlap = args.get(3).and_then(|a| a.parse().ok()).unwrap_or(defaults.chunk_overlap);

    let text = fs::read_to_string(&path)?;
    println!("🔍 lexdb-chunks\n===============");
    println!("File: {} ({} chars)", path.display(), text.chars().count());

    let spans = extract_legal_spans(&text);
    println!("\n📋 Detected {} normative spans:", spans.len());
    for span in &spans {
        // `number` is the full matched header, e.g. "PORTARIA Nº 1/2024".
        println!("  {}  [{}..{}]", span.instrument.number, span.start, span.end);
    }

    let chunks = chunk_smart(&text, chunk_size, chunk_overlap)?;
    println!("\n📦 {} chunks (size={}, overlap={}):", chunks.len(), chunk_size, chunk_overlap);
    for chunk in &chunks {
        let snippet: String = chunk.text.chars().take(80).collect();
        let tag = chunk
            .metadata
            .instrument
            .as_ref()
            .map(|r| r.number.clone())
            .unwrap_or_else(|| "-".to_string());
        println!("\n  #{:<4} {}  ({} chars)", chunk.chunk_index, tag, chunk.text.chars().count());
        println!("        {}", snippet.replace('\n', " "));
    }
    Ok(())
}
