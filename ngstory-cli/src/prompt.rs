//! Line-based terminal prompts.

use anyhow::{Context, bail};
use ngstory_domain::ProjectPrompt;
use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Stdin, Stderr, Write};

/// Asks on `output` and reads one line per answer from `input`.
pub struct LinePrompt<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

pub type StdinPrompt = LinePrompt<BufReader<Stdin>, Stderr>;

impl StdinPrompt {
    pub fn stdin() -> Self {
        LinePrompt::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    fn ask(&self, question: &str) -> anyhow::Result<String> {
        {
            let mut out = self.output.borrow_mut();
            write!(out, "{question}").context("write prompt")?;
            out.flush().context("flush prompt")?;
        }

        let mut line = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut line)
            .context("read answer")?;
        if read == 0 {
            bail!("no answer: input closed");
        }
        Ok(line.trim().to_string())
    }

    /// Yes/no question. An empty answer takes `default`.
    pub fn confirm(&self, question: &str, default: bool) -> anyhow::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.ask(&format!("? {question} {hint} "))?;
        Ok(match answer.to_ascii_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R: BufRead, W: Write> ProjectPrompt for LinePrompt<R, W> {
    /// Accepts either the list number or the project name.
    fn choose_project(&self, candidates: &[String]) -> anyhow::Result<String> {
        let mut question = String::from("? Which project should get Storybook?\n");
        for (i, name) in candidates.iter().enumerate() {
            question.push_str(&format!("  {}) {}\n", i + 1, name));
        }
        question.push_str("> ");

        let answer = self.ask(&question)?;
        let chosen = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| candidates.get(i))
            .cloned()
            .unwrap_or(answer);
        Ok(chosen)
    }

    fn use_compodoc(&self, project: &str) -> anyhow::Result<bool> {
        self.confirm(
            &format!("Use compodoc to generate component docs for '{project}'?"),
            true,
        )
    }
}
