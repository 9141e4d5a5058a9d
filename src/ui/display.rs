//! Terminal output: result lines and the header table.

use std::path::Path;

use bytesize::ByteSize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use console::style;
use sweetbox::{Inspection, Mode};

/// Formats bytes into a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

pub fn show_success(mode: Mode, input: &Path, output: &Path) {
    eprintln!("{} {}", style("✓").green(), style(format!("{}: {} -> {}", mode.past_tense(), input.display(), output.display())).bold());
}

/// Prints the full context chain on one line.
pub fn show_error(err: &anyhow::Error) {
    eprintln!("{} {}", style("✗").red(), style(format!("{err:#}")).red());
}

pub fn show_header(path: &Path, inspection: &Inspection) {
    println!("{}", style(path.display()).bold());
    println!("{}", header_table(inspection));
}

/// One row per header field.
pub fn header_table(inspection: &Inspection) -> Table {
    let header = &inspection.header;
    let params = header.kdf_params();

    let rows: Vec<(&str, String)> = vec![
        ("Format", header.version().to_string()),
        ("Algorithm", header.algorithm().to_string()),
        ("KDF", header.kdf().to_string()),
        ("KDF memory", format_bytes(u64::from(params.memory_kib) * 1024)),
        ("KDF iterations", params.iterations.to_string()),
        ("KDF parallelism", params.parallelism.to_string()),
        ("Compression", header.compression().to_string()),
        ("Compressed", header.flags().compressed().to_string()),
        ("Original size", format_bytes(header.original_size())),
        ("Stored size", format_bytes(header.stored_size())),
        ("Header length", format_bytes(inspection.header_len as u64)),
        ("Payload length", format_bytes(inspection.payload_len)),
        ("Timestamp", format!("{} (unix)", header.timestamp())),
        ("Filename", header.filename().unwrap_or("-").to_owned()),
        ("Salt", hex::encode(header.salt())),
        ("Nonce", hex::encode(header.nonce())),
        ("Tag", if header.tag().is_empty() { "trailing".to_owned() } else { hex::encode(header.tag()) }),
    ];

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Field", "Value"]);
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }

    table
}
