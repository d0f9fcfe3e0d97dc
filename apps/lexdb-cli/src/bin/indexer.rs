use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::{env, fs, path::PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use lexdb_core::config::{ChunkingConfig, Config, HybridConfig};
use lexdb_hybrid::memory::{HashEmbedder, MemoryObjectStore, MemoryVectorIndex, PlainTextExtractor};
use lexdb_hybrid::{DocumentPipeline, HybridEngine};

fn init_tracing() {
    let filter = env::var("LEXDB_LOG").map(EnvFilter::new).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn mime_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") => "text/markdown",
        _ => "text/plain",
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut data_dir = None; let mut query = None; let mut alpha = None; let mut limit = 10usize;
    let mut i = 0; while i < args.len() { match args[i].as_str() {
        "--query" | "-q" => { if i + 1 < args.len() { query = Some(args[i + 1].clone()); i += 1; } else { eprintln!("Error: --query requires a string"); std::process::exit(1); } }
        "--alpha" => { if let Some(parsed) = args.get(i + 1).and_then(|a| a.parse::<f32>().ok()) { alpha = Some(parsed); i += 1; } else { eprintln!("Error: --alpha requires a number in [0, 1]"); std::process::exit(1); } }
        "--limit" => { if let Some(parsed) = args.get(i + 1).and_then(|a| a.parse::<usize>().ok()) { limit = parsed; i += 1; } else { eprintln!("Error: --limit requires a number"); std::process::exit(1); } }
        _ if !args[i].starts_with('-') => data_dir = Some(PathBuf::from(&args[i])), _ => {} } i += 1; }
    let data_dir = data_dir.unwrap_or_else(|| {
        let dir: String = config.get("data.txt_dir").unwrap_or_else(|_| "./dev_data/txt".to_string());
        PathBuf::from(dir)
    });
    let alpha = alpha.unwrap_or_else(|| config.get("hybrid.alpha").unwrap_or(0.5));

    println!("LexDB Indexer\n=============");
    println!("Data directory: {}", data_dir.display());

    let hybrid = HybridConfig { alpha, ..HybridConfig::default() };
    let engine = HybridEngine::new(HashEmbedder::default(), MemoryVectorIndex::new(), hybrid)?;
    let pipeline = DocumentPipeline::new(
        PlainTextExtractor,
        MemoryObjectStore::new(),
        engine,
        ChunkingConfig::default(),
    )?;

    let files: Vec<PathBuf> = WalkDir::new(&data_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| matches!(path.extension().and_then(|e| e.to_str()), Some("txt") | Some("md")))
        .collect();
    if files.is_empty() {
        eprintln!("No .txt or .md files under {}", data_dir.display());
        std::process::exit(1);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?);

    let runtime = tokio::runtime::Runtime::new()?;
    let mut total_chunks = 0usize;
    for path in &files {
        let bytes = fs::read(path)?;
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown").to_string();
        let mut extra = HashMap::new();
        if let Some(folder) = path.parent().and_then(|p| p.to_str()) {
            extra.insert("folder".to_string(), folder.to_string());
        }
        pb.set_message(filename.clone());
        let processed = runtime.block_on(pipeline.process_file(
            &bytes,
            &filename,
            mime_for(path),
            Some(extra),
        ))?;
        total_chunks += processed.chunks;
        pb.inc(1);
    }
    pb.finish_with_message("done");

    println!("\n✅ Indexed {} files ({} chunks)", files.len(), total_chunks);
    println!("📊 Vocabulary: {} terms over {} documents",
        pipeline.engine().vocabulary_size(), pipeline.engine().total_documents());

    if let Some(query) = query {
        run_query(&runtime, &pipeline, &query, alpha, limit)?;
        return Ok(());
    }

    // No --query: interactive loop over stdin.
    println!("\n💡 Type a query (empty line or 'quit' to exit)");
    let stdin = std::io::stdin();
    loop {
        print!("query> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line == "quit" || line == "exit" {
            break;
        }
        run_query(&runtime, &pipeline, line, alpha, limit)?;
    }
    Ok(())
}

fn run_query(
    runtime: &tokio::runtime::Runtime,
    pipeline: &DocumentPipeline<PlainTextExtractor, MemoryObjectStore, HashEmbedder, MemoryVectorIndex>,
    query: &str,
    alpha: f32,
    limit: usize,
) -> anyhow::Result<()> {
    println!("\n🔍 Query: \"{}\" (alpha={})", query, alpha);
    let hits = runtime.block_on(pipeline.engine().query(query, None, alpha, limit))?;
    println!("Found {} results", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        let text = hit.payload["text"].as_str().unwrap_or("");
        let snippet: String = text.chars().take(120).collect();
        println!("\n  {}. score={:.4}  id={}", i + 1, hit.score, hit.id);
        println!("     📝 {}", snippet.replace('\n', " "));
    }
    Ok(())
}
