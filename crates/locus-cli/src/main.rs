use std::{env, path::Path, process};

use anyhow::Result;
use locus_config::Config;
use locus_engine::{
    Direction, Engine, EngineSettings, IterationOptions, PairKind, Position, ScopeKind,
    TextDocument, TreeSitterProvider,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage(&args[0]);
    }

    let settings = match Config::load() {
        Ok(Some(config)) => config.engine,
        Ok(None) => EngineSettings::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    log::info!("using {:?} hat stability", settings.stability);

    let mut provider = TreeSitterProvider::new();
    provider.register("rust", tree_sitter_rust::LANGUAGE.into());
    let mut engine = Engine::new(settings, Box::new(provider));

    match args[1].as_str() {
        "scopes" => {
            if args.len() != 4 {
                usage(&args[0]);
            }
            let kind = parse_scope_kind(&args[2]).unwrap_or_else(|| {
                eprintln!("Error: Unknown scope kind '{}'", args[2]);
                process::exit(1);
            });
            let document = read_document(&args[3])?;
            print_scopes(&engine, &document, kind)?;
        }
        "hats" => {
            let document = read_document(&args[2])?;
            let cursor = if args.len() == 5 {
                Position::new(parse_number(&args[3]), parse_number(&args[4]))
            } else {
                Position::new(0, 0)
            };
            print_hats(&mut engine, &document, cursor);
        }
        _ => usage(&args[0]),
    }

    Ok(())
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} scopes <kind> <file>");
    eprintln!("       {program} hats <file> [line] [column]");
    eprintln!();
    eprintln!("Scope kinds: character word token line paragraph document");
    eprintln!("             function class statement string comment pair interior item");
    process::exit(1);
}

fn parse_number(text: &str) -> u32 {
    text.parse().unwrap_or_else(|_| {
        eprintln!("Error: '{text}' is not a number");
        process::exit(1);
    })
}

fn parse_scope_kind(name: &str) -> Option<ScopeKind> {
    Some(match name {
        "character" => ScopeKind::Character,
        "word" => ScopeKind::Word,
        "token" => ScopeKind::Token,
        "line" => ScopeKind::Line,
        "paragraph" => ScopeKind::Paragraph,
        "document" => ScopeKind::Document,
        "function" => ScopeKind::NamedFunction,
        "class" => ScopeKind::Class,
        "statement" => ScopeKind::Statement,
        "string" => ScopeKind::String,
        "comment" => ScopeKind::Comment,
        "pair" => ScopeKind::SurroundingPair(PairKind::Any),
        "interior" => ScopeKind::PairInterior(PairKind::Any),
        "item" => ScopeKind::CollectionItem,
        _ => return None,
    })
}

fn read_document(path: &str) -> Result<TextDocument> {
    let text = std::fs::read_to_string(path)?;
    let language_id = match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("rs") => "rust",
        Some("css") => "css",
        Some("sh") => "shellscript",
        _ => "plaintext",
    };
    Ok(TextDocument::new(language_id, &text))
}

fn print_scopes(engine: &Engine, document: &TextDocument, kind: ScopeKind) -> Result<()> {
    let scopes = engine.generate_scopes(
        document,
        kind,
        Position::new(0, 0),
        Direction::Forward,
        IterationOptions::default(),
    )?;

    use locus_engine::Document;
    for scope in scopes {
        let excerpt: String = document
            .text_in(scope.content_range)
            .chars()
            .take(40)
            .collect();
        println!(
            "{} {}:{}-{}:{}  {}",
            scope.kind,
            scope.domain.start.line,
            scope.domain.start.character,
            scope.domain.end.line,
            scope.domain.end.character,
            excerpt.replace('\n', "\\n")
        );
    }
    Ok(())
}

fn print_hats(engine: &mut Engine, document: &TextDocument, cursor: Position) {
    engine.allocate_hats(document, &[cursor]);
    for hat in engine.hat_map().hats() {
        println!(
            "{} on '{}' of {} at {}:{}",
            hat.style,
            hat.grapheme,
            hat.token.text,
            hat.token.range.start.line,
            hat.token.range.start.character
        );
    }
}
