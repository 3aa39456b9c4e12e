/// Interactive CBM image console application

use cbmdisk::petscii::to_display_string;
use cbmdisk::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "boot",
                "cat",
                "dir",
                "exit",
                "export",
                "help",
                "info",
                "load",
                "ls",
                "map",
                "open",
                "quit",
                "read-sector",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the command name
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".cbmdisk_history");
        p
    })
}

fn save_history(rl: &mut Editor<CommandCompleter, rustyline::history::DefaultHistory>) {
    if let Some(history_path) = history_path() {
        let _ = rl.save_history(&history_path);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("=== CBM Disk ===");
    println!("Interactive console for exploring D64, D81, T64 and PRG files.");
    println!("Type 'help' for available commands\n");

    let mut rl = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create editor: {}", e);
            return;
        }
    };
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    // Command-line argument opens an image straight away
    let mut image: Option<CbmImage> = None;
    if let Some(path) = std::env::args().nth(1) {
        open_command(&path, &mut image);
    }

    loop {
        let readline = rl.readline("> ");
        let input = match readline {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                save_history(&mut rl);
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => {
                print_help();
            }
            "quit" | "exit" => {
                save_history(&mut rl);
                println!("Goodbye!");
                break;
            }
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                open_command(&parts[1], &mut image);
            }
            "info" => {
                if let Some(ref img) = image {
                    print_info(img);
                } else {
                    println!("No image loaded. Use 'open <path>' first.");
                }
            }
            "dir" | "ls" => {
                if let Some(ref img) = image {
                    print_directory(img);
                } else {
                    println!("No image loaded.");
                }
            }
            "boot" => match image.as_ref().and_then(CbmImage::as_disk) {
                Some(disk) => println!("{}", disk.boot_sector()),
                None => println!("No disk image loaded."),
            },
            "read-sector" => match image.as_ref().and_then(CbmImage::as_disk) {
                Some(disk) => {
                    if parts.len() < 3 {
                        println!("Usage: read-sector <track> <sector>");
                        continue;
                    }
                    let (track, sector) = match (parse_hex_or_dec(&parts[1]), parse_hex_or_dec(&parts[2])) {
                        (Some(t), Some(s)) => (t, s),
                        _ => {
                            println!("Track and sector must be numbers.");
                            continue;
                        }
                    };

                    match disk.sector(track, sector) {
                        Ok(data) => {
                            println!("Sector {}/{} ({} bytes):", track, sector, data.len());
                            print_hex_dump(data, 256);
                            if let Ok(Some(code)) =
                                disk.image().sector_error(SectorRef::new(track, sector))
                            {
                                println!("Error byte: {:02X}", code);
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("No disk image loaded."),
            },
            "cat" => {
                if let Some(ref img) = image {
                    if parts.len() < 2 {
                        println!("Usage: cat <name|#index>");
                        continue;
                    }
                    match read_named(img, &parts[1]) {
                        Ok(data) => {
                            println!("File: {} ({} bytes)", parts[1], data.len());
                            print_hex_dump(&data, 256);
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                } else {
                    println!("No image loaded.");
                }
            }
            "export" => {
                if let Some(ref img) = image {
                    if parts.len() < 2 {
                        println!("Usage: export <name|#index> [output_path]");
                        println!("  output_path defaults to the file name with a .prg/.seq/... extension");
                        continue;
                    }
                    let output_path = parts
                        .get(2)
                        .cloned()
                        .unwrap_or_else(|| default_export_name(img, &parts[1]));

                    match read_named(img, &parts[1]) {
                        Ok(data) => match std::fs::write(&output_path, &data) {
                            Ok(_) => println!(
                                "Exported {} ({} bytes) to {}",
                                parts[1],
                                data.len(),
                                output_path
                            ),
                            Err(e) => println!("Error writing file: {}", e),
                        },
                        Err(e) => println!("Error reading file: {}", e),
                    }
                } else {
                    println!("No image loaded.");
                }
            }
            "map" => match image.as_ref().and_then(CbmImage::as_disk) {
                Some(disk) => cbmdisk::map::draw_sector_map(disk),
                None => println!("No disk image loaded."),
            },
            _ => {
                println!("Unknown command: {}. Type 'help' for available commands.", command);
            }
        }
    }
}

fn open_command(path: &str, image: &mut Option<CbmImage>) {
    match open_image(path) {
        Ok(img) => {
            println!(
                "Opened: {} ({}, {} files)",
                path,
                img.image_type(),
                img.entry_count()
            );
            *image = Some(img);
        }
        Err(e) => println!("Error: {}", e),
    }
}

/// Parse command line input, respecting quoted strings
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(current.clone());
                    current.clear();
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

/// Resolve `#n` as a live entry index, anything else as a name
///
/// Names are matched exactly first, then ignoring case.
fn read_named(image: &CbmImage, name: &str) -> Result<Vec<u8>> {
    if let Some(index) = name.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
        return image.file(index);
    }
    match image.find(name.as_bytes(), false) {
        Err(CbmError::FileNotFound(_)) => image.find(name.as_bytes(), true),
        other => other,
    }
}

fn default_export_name(image: &CbmImage, name: &str) -> String {
    let listing = image.listing();
    let entry = match name.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
        Some(index) => listing.get(index),
        None => listing
            .iter()
            .find(|e| names_match_loose(&e.name, name.as_bytes())),
    };
    match entry {
        Some(e) => format!(
            "{}.{}",
            sanitize(&to_display_string(&e.name)),
            e.file_type.to_string().to_lowercase()
        ),
        None => sanitize(name),
    }
}

fn names_match_loose(a: &[u8], b: &[u8]) -> bool {
    cbmdisk::filesystem::names_match(a, b, true)
}

/// Keep host file names portable
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || "-_ .".contains(c) { c } else { '_' })
        .collect();
    if cleaned.trim().is_empty() {
        "unnamed".to_string()
    } else {
        cleaned.trim().to_string()
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>                    - Open a D64/D81/T64/PRG file (use quotes for paths with spaces)");
    println!("  info                           - Show image information");
    println!("  dir, ls                        - List files");
    println!("  boot                           - Show the C128 boot sector (disks only)");
    println!("  read-sector <track> <sector>   - Read and display a sector (disks only)");
    println!("  cat <name|#index>              - Read and hex dump a file");
    println!("  export <name|#index> [path]    - Export a file to the host filesystem");
    println!("  map                            - Visual sector map (disks only)");
    println!("  help                           - Show this help");
    println!("  quit, exit                     - Exit");
}

fn print_info(image: &CbmImage) {
    println!("Format: {}", image.image_type());
    println!("Label: {}", to_display_string(image.label()));
    println!("Files: {}", image.entry_count());

    match image {
        CbmImage::Disk(disk) => {
            let header = disk.header();
            let geometry = disk.image().geometry();
            println!("Disk id: {}", to_display_string(disk.disk_id()));
            println!("DOS type: {}", to_display_string(&header.dos_version));
            println!("Tracks: {}", geometry.track_count());
            println!("Sectors: {}", geometry.total_sectors());
            println!(
                "Directory sectors: {} ({} slots)",
                disk.directory_sectors().len(),
                disk.raw_entries().len()
            );
            println!(
                "Error info: {}",
                if disk.image().has_error_info() { "Yes" } else { "No" }
            );
            println!(
                "Boot sector: {}",
                if disk.has_boot_sector() { "Yes" } else { "No" }
            );
        }
        CbmImage::Tape(tape) => {
            println!("Version: {:04X}", tape.version);
            println!("Directory slots: {}", tape.max_entries);
            println!("Used slots (declared): {}", tape.used_entries);
        }
        CbmImage::Prg(prg) => {
            println!("Size: {} bytes", prg.bytes().len());
            match prg.load_address() {
                Some(address) => println!("Load address: ${:04X}", address),
                None => println!("Load address: none"),
            }
        }
    }
}

fn print_directory(image: &CbmImage) {
    println!("0 \"{}\"", to_display_string(image.label()));

    match image {
        CbmImage::Disk(disk) => {
            for entry in disk.entries() {
                println!("{}", entry);
            }
        }
        CbmImage::Tape(tape) => {
            for entry in tape.entries() {
                println!(
                    "{:<5}{:<18} {}  ${:04X}-${:04X}",
                    entry.blocks(),
                    format!("\"{}\"", entry.display_name()),
                    entry.file_type(),
                    entry.start_address,
                    entry.end_address
                );
            }
        }
        CbmImage::Prg(prg) => {
            for entry in prg.entries() {
                println!(
                    "{:<5}{:<18} {}",
                    entry.blocks(),
                    format!("\"{}\"", entry.display_name()),
                    entry.file_type()
                );
            }
        }
    }

    if image.entry_count() == 0 {
        println!("No files found.");
    }
}

fn print_hex_dump(data: &[u8], max_bytes: usize) {
    let len = data.len().min(max_bytes);

    for (i, chunk) in data[..len].chunks(16).enumerate() {
        print!("{:04X}: ", i * 16);

        for (j, byte) in chunk.iter().enumerate() {
            print!("{:02X} ", byte);
            if j == 7 {
                print!(" ");
            }
        }

        // Pad short lines
        for j in chunk.len()..16 {
            print!("   ");
            if j == 7 {
                print!(" ");
            }
        }

        print!(" |");
        for byte in chunk {
            let c = if (32..127).contains(byte) {
                *byte as char
            } else {
                '.'
            };
            print!("{}", c);
        }
        println!("|");
    }

    if data.len() > max_bytes {
        println!("... ({} more bytes)", data.len() - max_bytes);
    }
}

fn parse_hex_or_dec(s: &str) -> Option<u8> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
