use lexdb_core::types::{ChunkMetadata, InstrumentRef, InstrumentType, TextChunk};

#[test]
fn chunk_metadata_round_trips_through_json() {
    let mut metadata = ChunkMetadata {
        source: Some("diario-2024-03.txt".to_string()),
        word_span: Some((0, 450)),
        total_chunks: Some(3),
        instrument: Some(InstrumentRef {
            kind: InstrumentType::Ordinance,
            number: "PORTARIA Nº 123/2024".to_string(),
        }),
        part: None,
        ..Default::default()
    };
    metadata.extra.insert("folder".to_string(), "/rh/2024".to_string());

    let chunk = TextChunk {
        text: "PORTARIA Nº 123/2024 ...".to_string(),
        chunk_index: 0,
        metadata,
    };

    let json = serde_json::to_string(&chunk).expect("serialize");
    let back: TextChunk = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, chunk);
}

#[test]
fn empty_metadata_serializes_compactly() {
    let json = serde_json::to_value(ChunkMetadata::default()).expect("serialize");
    // Unset known fields and an empty extra map are omitted entirely.
    assert_eq!(json, serde_json::json!({}));
}

#[test]
fn instrument_labels_match_gazette_headers() {
    assert_eq!(InstrumentType::Ordinance.label(), "PORTARIA");
    assert_eq!(InstrumentType::NormativeInstruction.label(), "INSTRUÇÃO NORMATIVA");
}
