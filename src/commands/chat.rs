//! Diagnostic chat - one message or an interactive loop on stdin

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use medscope::{ChatTurn, Dashboard};

use super::{GlobalOptions, Invocation};

pub const DISCLAIMER: &str =
    "This tool is for educational purposes only and should not be used as professional medical advice.";

const QUIT: &str = "/quit";

/// What the REPL does with one line of input
#[derive(Debug, PartialEq, Eq)]
enum LineAction<'a> {
    Skip,
    Quit,
    /// Send and log the line exactly as typed
    Send(&'a str),
}

fn classify_line(line: &str) -> LineAction<'_> {
    match line.trim() {
        "" => LineAction::Skip,
        QUIT => LineAction::Quit,
        _ => LineAction::Send(line),
    }
}

pub fn execute(options: &GlobalOptions, message: Option<String>) -> Result<()> {
    let invocation = Invocation::load(options)?;
    let mut dashboard = invocation.open_dashboard()?;

    println!("{}", format!("⚠️  {}", DISCLAIMER).yellow());
    let settings = dashboard.settings();
    println!(
        "🩺 Model: {} (temperature {}, max tokens {})\n",
        settings.model, settings.temperature, settings.max_tokens
    );

    match message {
        Some(message) => send(&mut dashboard, &message),
        None => repl(&mut dashboard),
    }
}

fn repl(dashboard: &mut Dashboard) -> Result<()> {
    println!(
        "Describe your symptoms or medical query ({} or Ctrl-D to leave)",
        QUIT
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        match classify_line(&line) {
            LineAction::Skip => continue,
            LineAction::Quit => break,
            LineAction::Send(prompt) => send(dashboard, prompt)?,
        }
    }

    println!("💬 {} messages this session", dashboard.session().len());
    Ok(())
}

fn send(dashboard: &mut Dashboard, prompt: &str) -> Result<()> {
    let ChatTurn { reply, failed } = dashboard.send_message(prompt)?;
    if failed {
        println!("{}\n", reply.red());
    } else {
        println!("{}\n", reply);
    }
    Ok(())
}
