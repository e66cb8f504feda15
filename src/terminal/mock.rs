use super::{Console, MenuChoice};
use std::collections::VecDeque;

/// One queued answer for a prompt or menu
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedInput {
    Text(String),
    Number(f32),
    Choice(usize),
    Cancel,
}

/// Console that records output and answers prompts from a script
#[derive(Debug, Clone)]
pub struct MockTerminal {
    pub lines: Vec<String>,
    /// Title and options of every menu presented
    pub menus: Vec<(String, Vec<String>)>,
    inputs: VecDeque<ScriptedInput>,
    /// Escape fires on this statement poll
    escape_at: Option<usize>,
    polls: usize,
    cancel_prints: bool,
}

impl MockTerminal {
    pub fn new() -> Self {
        MockTerminal {
            lines: Vec::new(),
            menus: Vec::new(),
            inputs: VecDeque::new(),
            escape_at: None,
            polls: 0,
            cancel_prints: false,
        }
    }

    pub fn with_inputs(inputs: impl IntoIterator<Item = ScriptedInput>) -> Self {
        let mut terminal = Self::new();
        terminal.inputs.extend(inputs);
        terminal
    }

    pub fn push_input(&mut self, input: ScriptedInput) {
        self.inputs.push_back(input);
    }

    /// Report escape on the `polls`-th statement boundary.
    pub fn press_escape_after(&mut self, polls: usize) {
        self.escape_at = Some(polls);
    }

    /// Make every print report a cancel after recording its text.
    pub fn cancel_prints(&mut self) {
        self.cancel_prints = true;
    }

    /// All printed text as lines
    pub fn get_output(&self) -> Vec<String> {
        self.lines
            .iter()
            .flat_map(|text| text.split('\n').map(str::to_string))
            .collect()
    }
}

impl Default for MockTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for MockTerminal {
    fn print_text(&mut self, text: &str) -> bool {
        self.lines.push(text.to_string());
        !self.cancel_prints
    }

    fn prompt_string(&mut self, max_len: usize) -> Option<String> {
        match self.inputs.pop_front()? {
            ScriptedInput::Text(text) => Some(text.chars().take(max_len).collect()),
            ScriptedInput::Number(number) => Some(number.to_string()),
            ScriptedInput::Choice(_) | ScriptedInput::Cancel => None,
        }
    }

    fn prompt_number(&mut self, max_len: usize) -> Option<f32> {
        match self.inputs.pop_front()? {
            ScriptedInput::Number(number) => Some(number),
            ScriptedInput::Text(text) => {
                let text: String = text.chars().take(max_len).collect();
                Some(crate::interpreter::numbers::parse_number(text.as_bytes()))
            }
            ScriptedInput::Choice(_) | ScriptedInput::Cancel => None,
        }
    }

    fn present_menu(&mut self, title: &str, options: &[String]) -> MenuChoice {
        self.menus.push((title.to_string(), options.to_vec()));
        match self.inputs.pop_front() {
            Some(ScriptedInput::Choice(index)) if index < options.len() => {
                MenuChoice::Selected(index)
            }
            Some(ScriptedInput::Cancel) | None => MenuChoice::Cancelled,
            Some(_) => MenuChoice::Failed,
        }
    }

    fn escape_pressed(&mut self) -> bool {
        self.polls += 1;
        self.escape_at.is_some_and(|at| self.polls >= at)
    }
}
