use super::{Console, MenuChoice};
use crate::interpreter::numbers::parse_number;
use std::io::{self, BufRead, Write};

/// Line-oriented console over standard input and output
///
/// End of input counts as a cancel.
#[derive(Debug, Default)]
pub struct StdioConsole;

impl StdioConsole {
    pub fn new() -> Self {
        StdioConsole
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Console for StdioConsole {
    fn print_text(&mut self, text: &str) -> bool {
        println!("{}", text);
        true
    }

    fn prompt_string(&mut self, max_len: usize) -> Option<String> {
        let line = self.read_line("? ")?;
        Some(line.chars().take(max_len).collect())
    }

    fn prompt_number(&mut self, max_len: usize) -> Option<f32> {
        let line = self.read_line("# ")?;
        let line: String = line.chars().take(max_len).collect();
        Some(parse_number(line.as_bytes()))
    }

    fn present_menu(&mut self, title: &str, options: &[String]) -> MenuChoice {
        if options.is_empty() {
            return MenuChoice::Failed;
        }
        println!("{}", title);
        for (index, option) in options.iter().enumerate() {
            println!("  {}) {}", index + 1, option);
        }
        loop {
            let Some(line) = self.read_line("> ") else {
                return MenuChoice::Cancelled;
            };
            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => {
                    return MenuChoice::Selected(choice - 1)
                }
                _ => println!("Pick 1-{}", options.len()),
            }
        }
    }
}
