//! Integration tests for the asralign CLI.

use asralign_cli::cli::{Cli, run_cli};
use clap::Parser;
use std::path::Path;

fn write_json(path: &Path, value: serde_json::Value) {
    std::fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn speech_doc(words: &[&str]) -> serde_json::Value {
    let words: Vec<_> = words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            serde_json::json!({
                "text": w,
                "start": i as u64 * 1000,
                "end": i as u64 * 1000 + 900,
            })
        })
        .collect();
    serde_json::json!({ "words": words })
}

#[test]
fn align_produces_sentence_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let speech = dir.path().join("speech.json");
    let transcript = dir.path().join("transcript.json");
    let out = dir.path().join("pairs.json");

    write_json(
        &speech,
        speech_doc(&["de", "kat", "zat", "op", "de", "mat", "en", "sliep"]),
    );
    write_json(
        &transcript,
        serde_json::json!({ "paragraphs": ["De kat zat op de mat."] }),
    );

    let cli = Cli::parse_from([
        "asralign",
        "align",
        "-s",
        speech.to_str().unwrap(),
        "-t",
        transcript.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    run_cli(cli).expect("alignment failed");

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let pairs = value["sentence_pairs"].as_array().unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["asr"], "de kat zat op de mat");
    assert_eq!(pairs[0]["transcript"], "De kat zat op de mat .");
    assert!(pairs[0]["score"].as_f64().unwrap() >= 0.8);
}

#[test]
fn align_survives_transcription_noise() {
    let dir = tempfile::tempdir().unwrap();
    let speech = dir.path().join("speech.json");
    let transcript = dir.path().join("transcript.json");
    let out = dir.path().join("pairs.json");

    write_json(&speech, speech_doc(&["de", "kot", "zat"]));
    write_json(
        &transcript,
        serde_json::json!({ "paragraphs": ["de kat zat"] }),
    );

    let cli = Cli::parse_from([
        "asralign",
        "align",
        "-s",
        speech.to_str().unwrap(),
        "-t",
        transcript.to_str().unwrap(),
        "-S",
        "0.5",
        "-o",
        out.to_str().unwrap(),
    ]);
    run_cli(cli).expect("alignment failed");

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let pairs = value["sentence_pairs"].as_array().unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["asr"], "de kot zat");
}

#[test]
fn timealign_produces_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let speech = dir.path().join("speech.json");
    let transcript = dir.path().join("transcript.json");
    let out = dir.path().join("pairs.json");

    write_json(&speech, speech_doc(&["de", "kat", "zat", "op", "de", "mat"]));
    write_json(
        &transcript,
        serde_json::json!({ "utterances": [
            { "text": "de kat zat", "start": 0, "end": 2900 },
            { "text": "op de mat", "start": 3000, "end": 5900 },
        ]}),
    );

    let cli = Cli::parse_from([
        "asralign",
        "timealign",
        "-s",
        speech.to_str().unwrap(),
        "-t",
        transcript.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    run_cli(cli).expect("alignment failed");

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let pairs = value["sentence_pairs"].as_array().unwrap();

    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0]["asr"], "de kat zat");
    assert_eq!(pairs[0]["offset"], 0);
    assert_eq!(pairs[1]["asr"], "op de mat");
}

#[test]
fn corpus_merges_alignment_files() {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        &dir.path().join("run1.json"),
        serde_json::json!({ "sentence_pairs": [
            { "transcript": "De kat zat .", "asr": "de kat zat", "score": 0.9 },
            { "transcript": "En de hond .", "asr": "en de hond", "score": 0.8 },
        ]}),
    );

    let prefix = dir.path().join("corpus").to_str().unwrap().to_string();
    let cli = Cli::parse_from([
        "asralign",
        "corpus",
        "-i",
        dir.path().to_str().unwrap(),
        "-o",
        &prefix,
    ]);
    run_cli(cli).expect("corpus build failed");

    let spoken = std::fs::read_to_string(format!("{prefix}.spoken.txt")).unwrap();
    let written = std::fs::read_to_string(format!("{prefix}.written.txt")).unwrap();

    assert_eq!(spoken, "de kat zat\nen de hond\n");
    assert_eq!(written, "De kat zat .\nEn de hond .\n");
}

#[test]
fn missing_speech_document_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("transcript.json");
    write_json(&transcript, serde_json::json!({ "paragraphs": [] }));

    let cli = Cli::parse_from([
        "asralign",
        "align",
        "-s",
        dir.path().join("nope.json").to_str().unwrap(),
        "-t",
        transcript.to_str().unwrap(),
    ]);

    assert!(run_cli(cli).is_err());
}
