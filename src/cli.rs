use std::io::{self, Write};
use std::sync::Arc;
use vecstore::{Keyspace, Metric, Store, Vector};

pub enum Command {
    Create { keyspace: String, dimension: usize },
    Drop { keyspace: String },
    Keyspaces,
    Insert { keyspace: String, vec: Vector },
    Remove { keyspace: String, index: usize },
    Get { keyspace: String, index: usize },
    List { keyspace: String },
    Count { keyspace: String },
    Nearest { keyspace: String, vec: Vector },
    Threshold { keyspace: String, threshold: f64, vec: Vector },
    Compare { metric: Metric, left: Vector, right: Vector },
}

const COMMANDS: &str = "create, drop, keyspaces, insert, remove, get, list, count, nearest, threshold, compare";

/// Parse a command from a provided argument vector
/// args[0] is the prompt name, args[1] the command
pub fn parse_command_from_args(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err(format!("No command provided. Use: {}", COMMANDS));
    }

    let command = &args[1];

    match command.as_str() {
        "create" => parse_create(args),
        "drop" => parse_drop(args),
        "keyspaces" => Ok(Command::Keyspaces),
        "insert" => parse_insert(args),
        "remove" => parse_remove(args),
        "get" => parse_get(args),
        "list" => parse_list(args),
        "count" => parse_count(args),
        "nearest" => parse_nearest(args),
        "threshold" => parse_threshold(args),
        "compare" => parse_compare(args),
        _ => Err(format!("Unknown command: {}. Available: {}", command, COMMANDS)),
    }
}

fn parse_vector(args: &[String]) -> Result<Vector, String> {
    let values: Result<Vec<f64>, _> = args.iter()
        .map(|s| s.parse::<f64>())
        .collect();

    match values {
        Ok(v) if v.is_empty() => Err("Vector cannot be empty".to_string()),
        Ok(v) => Ok(Vector::from(v)),
        Err(_) => Err("Failed to parse vector components as numbers".to_string()),
    }
}

fn parse_index(arg: &str) -> Result<usize, String> {
    arg.parse::<usize>()
        .map_err(|_| format!("Invalid index: '{}'. Must be a non-negative integer.", arg))
}

/// Parse the 'create' command
/// Usage: create <keyspace> <dimension>
fn parse_create(args: &[String]) -> Result<Command, String> {
    if args.len() < 4 {
        return Err("'create' command requires a name and a dimension. Usage: create <keyspace> <dimension>".to_string());
    }

    let dimension = match args[3].parse::<usize>() {
        Ok(d) if d > 0 => d,
        _ => return Err(format!("Invalid dimension: '{}'. Must be a positive integer.", args[3])),
    };

    Ok(Command::Create { keyspace: args[2].clone(), dimension })
}

/// Parse the 'drop' command
/// Usage: drop <keyspace>
fn parse_drop(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'drop' command requires a keyspace. Usage: drop <keyspace>".to_string());
    }
    Ok(Command::Drop { keyspace: args[2].clone() })
}

/// Parse the 'insert' command
/// Usage: insert <keyspace> <v1> <v2> ...
fn parse_insert(args: &[String]) -> Result<Command, String> {
    if args.len() < 4 {
        return Err("'insert' command requires a keyspace and a vector. Usage: insert <keyspace> <v1> <v2> ...".to_string());
    }

    let vec = parse_vector(&args[3..])?;
    Ok(Command::Insert { keyspace: args[2].clone(), vec })
}

/// Parse the 'remove' command
/// Usage: remove <keyspace> <index>
fn parse_remove(args: &[String]) -> Result<Command, String> {
    if args.len() < 4 {
        return Err("'remove' command requires a keyspace and an index. Usage: remove <keyspace> <index>".to_string());
    }
    Ok(Command::Remove { keyspace: args[2].clone(), index: parse_index(&args[3])? })
}

/// Parse the 'get' command
/// Usage: get <keyspace> <index>
fn parse_get(args: &[String]) -> Result<Command, String> {
    if args.len() < 4 {
        return Err("'get' command requires a keyspace and an index. Usage: get <keyspace> <index>".to_string());
    }
    Ok(Command::Get { keyspace: args[2].clone(), index: parse_index(&args[3])? })
}

/// Parse the 'list' command
/// Usage: list <keyspace>
fn parse_list(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'list' command requires a keyspace. Usage: list <keyspace>".to_string());
    }
    if args.len() > 3 {
        eprintln!("Warning: 'list' command takes one argument, ignoring extras");
    }
    Ok(Command::List { keyspace: args[2].clone() })
}

/// Parse the 'count' command
/// Usage: count <keyspace>
fn parse_count(args: &[String]) -> Result<Command, String> {
    if args.len() < 3 {
        return Err("'count' command requires a keyspace. Usage: count <keyspace>".to_string());
    }
    if args.len() > 3 {
        eprintln!("Warning: 'count' command takes one argument, ignoring extras");
    }
    Ok(Command::Count { keyspace: args[2].clone() })
}

/// Parse the 'nearest' command
/// Usage: nearest <keyspace> <v1> <v2> ...
fn parse_nearest(args: &[String]) -> Result<Command, String> {
    if args.len() < 4 {
        return Err("'nearest' command requires a keyspace and a query vector. Usage: nearest <keyspace> <v1> <v2> ...".to_string());
    }

    let vec = parse_vector(&args[3..])?;
    Ok(Command::Nearest { keyspace: args[2].clone(), vec })
}

/// Parse the 'threshold' command
/// Usage: threshold <keyspace> <threshold> <v1> <v2> ...
fn parse_threshold(args: &[String]) -> Result<Command, String> {
    if args.len() < 5 {
        return Err("'threshold' command requires a keyspace, a threshold and a query vector. Usage: threshold <keyspace> <t> <v1> <v2> ...".to_string());
    }

    let threshold = args[3].parse::<f64>()
        .map_err(|_| format!("Invalid threshold: '{}'. Must be a number.", args[3]))?;
    let vec = parse_vector(&args[4..])?;

    Ok(Command::Threshold { keyspace: args[2].clone(), threshold, vec })
}

/// Parse the 'compare' command
/// Usage: compare <metric> <a1> <a2> ... / <b1> <b2> ...
fn parse_compare(args: &[String]) -> Result<Command, String> {
    if args.len() < 6 {
        return Err("'compare' command requires a metric and two vectors. Usage: compare <metric> <a...> / <b...>".to_string());
    }

    let metric = args[2].parse::<Metric>()?;
    let rest = &args[3..];
    let split = rest.iter()
        .position(|s| s == "/")
        .ok_or_else(|| "Separate the two vectors with '/'".to_string())?;

    let left = parse_vector(&rest[..split])?;
    let right = parse_vector(&rest[split + 1..])?;

    Ok(Command::Compare { metric, left, right })
}

/// REPL mode - interactive session over an in-memory store
pub fn run_repl(store: &Store) {
    println!("vecstore - In-Memory Similarity Search (store '{}')", store.name());
    println!("Type 'help' for commands, 'exit' or 'quit' to quit\n");

    loop {
        print!("vecstore> ");
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error flushing output: {}", error);
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            println!("Goodbye!");
            break;
        }

        if input == "help" {
            print_help();
            continue;
        }

        let mut args: Vec<String> = vec!["vecstore".to_string()];
        args.extend(input.split_whitespace().map(|s| s.to_string()));

        let command = match parse_command_from_args(&args) {
            Ok(cmd) => cmd,
            Err(error) => {
                eprintln!("Error: {}", error);
                continue;
            }
        };

        match execute_command(store, command) {
            Ok(output) => println!("{}", output),
            Err(error) => eprintln!("Error: {}", error),
        }
    }
}

fn lookup(store: &Store, keyspace: &str) -> Result<Arc<Keyspace>, String> {
    store.get_keyspace(keyspace).map_err(|e| e.to_string())
}

/// Runs one command against the store and returns what to print
pub fn execute_command(store: &Store, command: Command) -> Result<String, String> {
    match command {
        Command::Create { keyspace, dimension } => {
            let ks = store.create_keyspace(dimension, keyspace);
            Ok(format!("Created keyspace '{}' (dimension {})", ks.name(), ks.dimension()))
        }

        Command::Drop { keyspace } => {
            match store.remove_keyspace(&keyspace) {
                0 => Ok(format!("No keyspace named '{}'", keyspace)),
                n => Ok(format!("Dropped {} keyspace(s) named '{}'", n, keyspace)),
            }
        }

        Command::Keyspaces => {
            let keyspaces = store.keyspaces();
            if keyspaces.is_empty() {
                return Ok("Store is empty".to_string());
            }
            let mut out = String::from("Keyspaces:");
            for ks in &keyspaces {
                out.push_str(&format!("\n  {} (dimension {}, {} vectors)", ks.name(), ks.dimension(), ks.size()));
            }
            Ok(out)
        }

        Command::Insert { keyspace, vec } => {
            let ks = lookup(store, &keyspace)?;
            let index = ks.add_vector(vec).map_err(|e| e.to_string())?;
            Ok(format!("Inserted into '{}' at index {}", keyspace, index))
        }

        Command::Remove { keyspace, index } => {
            let ks = lookup(store, &keyspace)?;
            let removed = ks.remove_vector(index).map_err(|e| e.to_string())?;
            Ok(format!("Removed {} from '{}'", removed, keyspace))
        }

        Command::Get { keyspace, index } => {
            let ks = lookup(store, &keyspace)?;
            let vec = ks.get_vector(index).map_err(|e| e.to_string())?;
            Ok(format!("{}[{}]: {}", keyspace, index, vec))
        }

        Command::List { keyspace } => {
            let ks = lookup(store, &keyspace)?;
            let vectors = ks.vectors();
            if vectors.is_empty() {
                return Ok(format!("Keyspace '{}' is empty", keyspace));
            }
            let mut out = String::from("Stored vectors:");
            for (i, vec) in vectors.iter().enumerate() {
                out.push_str(&format!("\n  {}: {}", i, vec));
            }
            out.push_str(&format!("\nTotal: {} vectors", vectors.len()));
            Ok(out)
        }

        Command::Count { keyspace } => Ok(lookup(store, &keyspace)?.size().to_string()),

        Command::Nearest { keyspace, vec } => {
            let ks = lookup(store, &keyspace)?;
            let index = ks.find_nearest_neighbor(&vec).map_err(|e| e.to_string())?;
            Ok(format!("Nearest neighbor index: {}", index))
        }

        Command::Threshold { keyspace, threshold, vec } => {
            let ks = lookup(store, &keyspace)?;
            let neighbors = ks.find_neighbors_above_threshold(&vec, threshold)
                .map_err(|e| e.to_string())?;
            if neighbors.is_empty() {
                return Ok("No results found".to_string());
            }
            let mut out = format!("Found {} neighbors above threshold:", neighbors.len());
            for (rank, n) in neighbors.iter().enumerate() {
                out.push_str(&format!("\n{}. Index: {}, Similarity: {:.4}", rank + 1, n.index, n.similarity));
            }
            Ok(out)
        }

        Command::Compare { metric, left, right } => {
            let score = metric.score(&left, &right).map_err(|e| e.to_string())?;
            Ok(format!("{:?}: {:.6}", metric, score))
        }
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  create <ks> <dim>                 - Create a keyspace");
    println!("  drop <ks>                         - Remove every keyspace with that name");
    println!("  keyspaces                         - List keyspaces");
    println!("  insert <ks> <v1> <v2> ...         - Append a vector");
    println!("  remove <ks> <index>               - Remove a vector");
    println!("  get <ks> <index>                  - Show a vector");
    println!("  list <ks>                         - List all vectors of a keyspace");
    println!("  count <ks>                        - Show vector count");
    println!("  nearest <ks> <v1> <v2> ...        - Index of the nearest neighbor");
    println!("  threshold <ks> <t> <v1> <v2> ...  - Neighbors with similarity >= t");
    println!("  compare <metric> <a...> / <b...>  - euclidean, cosine or manhattan");
    println!("  help                              - Show this help");
    println!("  exit, quit                        - Exit the program");
}
