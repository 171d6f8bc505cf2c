//! Subcommand implementations.

use std::io::Read as _;
use std::path::Path;

use anyhow::{anyhow, Context};
use parsnip_engine::event::render_events;
use parsnip_engine::notation::parse_grammar_with;
use parsnip_engine::{CacheStats, Entry, Event, Grammar, Parsed, ProductionId, ProfileEntry};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{Command, Target};
use crate::config::Config;
use crate::style;

/// Runs `command`, returning `false` when the input did not survive it.
pub fn run(command: &Command) -> anyhow::Result<bool> {
    match command {
        Command::Parse(target) => parse(target),
        Command::Roundtrip(target) => roundtrip(target),
        Command::Check(target) => check(target),
    }
}

struct Loaded {
    grammar: Grammar,
    start: ProductionId,
    config: Config,
    input_name: String,
    text: String,
}

impl Loaded {
    fn entry(&self) -> Entry<'_> {
        self.grammar
            .entry_at(self.start)
            .with_options(self.config.parse)
            .complete()
    }

    fn parse(&self) -> anyhow::Result<Parsed> {
        let parsed = self
            .entry()
            .parse(&self.text)
            .map_err(|err| anyhow!("{}: {err}", self.input_name))?;
        let CacheStats { hits, misses, stores } = parsed.cache_stats();
        info!(events = parsed.events().len(), hits, misses, stores, "parsed {}", self.input_name);
        Ok(parsed)
    }
}

fn load(target: &Target) -> anyhow::Result<Loaded> {
    let config = Config::load(target.config.as_deref(), &target.grammar);
    debug!(?config, "configuration");

    let notation = std::fs::read_to_string(&target.grammar)
        .with_context(|| format!("failed to read grammar {}", target.grammar.display()))?;
    let grammar = parse_grammar_with(&notation, &config.lexical)
        .map_err(|err| anyhow!("{}:{err}", target.grammar.display()))?;
    let start = match &target.start {
        Some(name) => grammar
            .lookup(name)
            .ok_or_else(|| anyhow!("grammar has no production `{name}`"))?,
        None => grammar
            .productions()
            .next()
            .map(|production| production.id())
            .ok_or_else(|| anyhow!("grammar has no productions"))?,
    };

    let (input_name, text) = read_input(target.input.as_deref())?;
    Ok(Loaded {
        grammar,
        start,
        config,
        input_name,
        text,
    })
}

fn read_input(path: Option<&Path>) -> anyhow::Result<(String, String)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read input {}", path.display()))?;
            Ok((path.display().to_string(), text))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read standard input")?;
            Ok(("<stdin>".to_string(), text))
        }
    }
}

/// Events as printed by `--json`.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonEvent<'a> {
    Push { variant: String },
    Pop,
    Token { text: &'a str },
    Content { text: &'a str },
    /// Growth markers only exist while a parse is running.
    Marker,
}

impl<'a> JsonEvent<'a> {
    fn new(grammar: &Grammar, event: &'a Event) -> Self {
        match event {
            Event::Push(variant) => Self::Push {
                variant: grammar.variant_path(*variant),
            },
            Event::Pop => Self::Pop,
            Event::Token(text) => Self::Token { text: text.as_str() },
            Event::Content(text) => Self::Content { text: text.as_str() },
            Event::LrStart | Event::LrEnd(_) => Self::Marker,
        }
    }
}

#[derive(Debug, Serialize)]
struct ParseReport<'a> {
    end: usize,
    events: Vec<JsonEvent<'a>>,
    cache: CacheStats,
    profile: Vec<ProfileEntry>,
}

#[derive(Debug, Serialize)]
struct RoundtripReport<'a> {
    text: &'a str,
    stable: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    events: usize,
    matched: usize,
}

fn parse(target: &Target) -> anyhow::Result<bool> {
    let loaded = load(target)?;
    let parsed = loaded.parse()?;
    if target.json {
        let report = ParseReport {
            end: parsed.end(),
            events: parsed
                .events()
                .iter()
                .map(|event| JsonEvent::new(&loaded.grammar, event))
                .collect(),
            cache: parsed.cache_stats(),
            profile: parsed.profile().report(&loaded.grammar),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_events(&loaded.grammar, parsed.events()));
    }
    Ok(true)
}

fn roundtrip(target: &Target) -> anyhow::Result<bool> {
    let loaded = load(target)?;
    let parsed = loaded.parse()?;
    let entry = loaded.entry();
    let regenerated = entry
        .unparse(parsed.events())
        .map_err(|err| anyhow!("{}: {err}", loaded.input_name))?;
    let stable = match entry.parse(&regenerated) {
        Ok(reparsed) => reparsed.events() == parsed.events(),
        Err(err) => {
            debug!("regenerated text does not parse: {err}");
            false
        }
    };

    if target.json {
        let report = RoundtripReport {
            text: &regenerated,
            stable,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{regenerated}");
        if !stable {
            eprintln!(
                "{}",
                style::warning("regenerated text does not parse to the same events")
            );
        }
    }
    Ok(stable)
}

fn check(target: &Target) -> anyhow::Result<bool> {
    let loaded = load(target)?;
    let parsed = loaded.parse()?;
    let matched = loaded
        .entry()
        .match_events(parsed.events())
        .map_err(|err| anyhow!("{}: {err}", loaded.input_name))?;

    if target.json {
        let report = CheckReport {
            events: parsed.events().len(),
            matched,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}",
            style::success(format!("{}: {matched} events match", loaded.input_name))
        );
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsnip_engine::notation::parse_grammar;

    #[test]
    fn json_events_are_tagged() {
        let grammar = parse_grammar(r#"S := Pair: /[a-z]+/ "=" /[0-9]+/ ;"#).unwrap();
        let parsed = grammar.entry("S").unwrap().parse("x = 1").unwrap();
        let events: Vec<JsonEvent<'_>> = parsed
            .events()
            .iter()
            .map(|event| JsonEvent::new(&grammar, event))
            .collect();
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[{"kind":"push","variant":"S.Pair"},"#,
                r#"{"kind":"content","text":"x"},"#,
                r#"{"kind":"token","text":"="},"#,
                r#"{"kind":"content","text":"1"},"#,
                r#"{"kind":"pop"}]"#,
            )
        );
    }
}
