// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A small shell on top of `shell_core`.
//!
//! ```text
//! cargo run --example shell_demo
//! echo "hello world" (a (nested) group)   # prints the tokens, one per line
//! hexdump some text                       # canonical hex dump of the rest of the line
//! count 50                                # counts on a status line from a worker thread
//! exit
//! ```
//!
//! Logs go to `/tmp/shell_demo.log`. Run with stdin redirected from a file to see batch
//! mode, eg `cargo run --example shell_demo < script.txt`.

use std::{io::IsTerminal, sync::Arc, thread, time::Duration};

use crossterm::style::Color;
use shell_core::{ByteBuffer, CompletionSource, Console, ConsoleConfig, EncapsulationPair,
                 Hint, TokenizeOptions, TracingConfig, WriterConfig, init_tracing};
use tracing_core::LevelFilter;

const COMMANDS: [&str; 4] = ["count", "echo", "exit", "hexdump"];

struct Keywords;

impl CompletionSource for Keywords {
    fn complete(&self, line: &str) -> Vec<String> {
        COMMANDS
            .iter()
            .filter(|command| command.starts_with(line))
            .map(ToString::to_string)
            .collect()
    }

    fn hint(&self, line: &str) -> Option<Hint> {
        let hint = match line {
            "count" => " <n>",
            "hexdump" => " <text>",
            "echo" => " <args>",
            _ => return None,
        };
        Some(Hint::new(hint).with_color(Color::DarkGrey))
    }
}

fn tokenize_options() -> TokenizeOptions {
    TokenizeOptions::default()
        .with_pairs([
            EncapsulationPair::quote(b'"'),
            EncapsulationPair::quote(b'\''),
            EncapsulationPair::bracket(b'(', b')'),
        ])
        .with_ignore_prefix("#")
}

fn main() -> miette::Result<()> {
    init_tracing(TracingConfig {
        writer_config: WriterConfig::File("/tmp/shell_demo.log".into()),
        level_filter: LevelFilter::DEBUG,
    })?;

    let interactive = std::io::stdin().is_terminal();
    let console = Arc::new(Console::new_stdio(
        ConsoleConfig::default().with_history_path("/tmp/.shell_demo_history"),
    ));
    console.bind_completion_source(Arc::new(Keywords))?;

    let options = tokenize_options();
    while let Some(line) = console.get_line("shell> ", interactive) {
        let mut buf = ByteBuffer::try_from(line.as_str())?;
        buf.tokenize(&options)?;
        let args: Vec<String> = buf
            .token_iter()
            .map(|token| String::from_utf8_lossy(token).into_owned())
            .collect();

        match args.first().map(String::as_str) {
            None => {}
            Some("exit") => break,
            Some("echo") => {
                for arg in &args[1..] {
                    console.print(format_args!("{arg}"))?;
                }
            }
            Some("hexdump") => {
                let mut text = ByteBuffer::try_from(args[1..].join(" ").as_str())?;
                let dump = text.hexdump()?;
                console.print(format_args!("{}", dump.to_string_lossy().trim_end()))?;
            }
            Some("count") => match args.get(1).map(|it| it.parse::<u32>()) {
                Some(Ok(n)) => count(&console, n)?,
                _ => {
                    console.warning(format_args!("usage: count <n>"))?;
                }
            },
            Some(other) => {
                console.error(format_args!("unknown command '{other}'"))?;
            }
        }
    }

    console.print(format_args!("bye"))?;
    Ok(())
}

/// Counts to `n` on a status line, from a worker thread.
fn count(console: &Arc<Console>, n: u32) -> miette::Result<()> {
    let worker = {
        let console = console.clone();
        thread::spawn(move || -> miette::Result<()> {
            for i in 0..=n {
                console.reprint(Some(format_args!("{i}/{n}")))?;
                thread::sleep(Duration::from_millis(20));
            }
            console.reset()?;
            console.print(format_args!(""))?;
            Ok(())
        })
    };

    worker
        .join()
        .map_err(|_| miette::miette!("counter thread panicked"))?
}
