//! Utilities for printing and everything related to "UI".

use term_painter::{Color, Style, ToStyle};

macro_rules! print_msg {
    ($kind:ident: $icon:literal => $fmt:literal $($args:tt)*) => {{
        use crate::ui::MsgKind;
        use term_painter::ToStyle;

        let icon_style = MsgKind::$kind.icon_style();
        let body_style = MsgKind::$kind.body_style();
        let lines = crate::ui::wrap(&format!($fmt $($args)*), crate::ui::line_len());

        for (i, line) in lines.iter().enumerate() {
            let prefix = match i {
                0 => format!("[{}] ", $icon),
                _ if i == lines.len() - 1 => "    └ ".to_string(),
                _ => "    │ ".to_string(),
            };

            println!("{}{}", icon_style.paint(prefix), body_style.paint(line));
        }
    }};
}

macro_rules! progress {
    ([$fmt:literal $($args:tt)*] => $body:tt) => {{
        use std::{
            io::{stdout, Write},
            time::Instant,
        };
        use crate::ui::MsgKind;
        use term_painter::ToStyle;

        let msg = format!($fmt $($args)*);
        print!("{} {} ... ", MsgKind::Progress.icon_style().paint("[…]"), msg);
        let _ = stdout().flush();

        let before = Instant::now();
        let out = $body;
        let time = before.elapsed();

        println!(
            "\r{} {} ... {} (in {:.2?})",
            MsgKind::Progress.icon_style().paint("[✓]"),
            msg,
            MsgKind::Progress.icon_style().paint("done"),
            time,
        );

        out
    }};
}

macro_rules! info {
    () => { info!("") };
    ($($t:tt)*) => {
        print_msg!(Info: 'i' => $($t)*);
    };
}

macro_rules! warn {
    () => { warn!("") };
    ($($t:tt)*) => {
        print_msg!(Warning: 'w' => $($t)*);
    };
}

macro_rules! error {
    () => { error!("") };
    ($($t:tt)*) => {
        print_msg!(Error: '!' => $($t)*);
    };
}

pub enum MsgKind {
    Error,
    Warning,
    Info,
    Progress,
}

impl MsgKind {
    pub fn icon_style(&self) -> Style {
        match self {
            MsgKind::Error => Color::Red.bold(),
            MsgKind::Warning => Color::Yellow.bold(),
            MsgKind::Info => Color::Blue.bold(),
            MsgKind::Progress => Color::Green.bold(),
        }
    }

    pub fn body_style(&self) -> Style {
        match self {
            MsgKind::Error => Color::BrightRed.to_style(),
            MsgKind::Warning => Color::BrightYellow.to_style(),
            MsgKind::Info | MsgKind::Progress => Color::NotSet.to_style(),
        }
    }
}

/// Maximum length of message lines: the terminal width (at most 100) minus the
/// space for the icon prefix.
pub fn line_len() -> usize {
    let width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80);
    std::cmp::max(std::cmp::min(100, width), 20) - 7
}

/// Splits `body` at whitespace into lines of roughly `line_len` characters.
/// Words longer than a line are not split. Always returns at least one line.
pub fn wrap(body: &str, line_len: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in body.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() >= line_len {
            lines.push(current.trim_end().to_string());
            current.clear();
        }

        current.push_str(word);
        current.push(' ');
    }
    lines.push(current.trim_end().to_string());

    lines
}

/// Formats the given integer with `,` as thousand separator.
pub fn fmt_with_thousand_sep(mut v: u64) -> String {
    let mut out = String::new();
    while v >= 1000 {
        out = format!(",{:03}{}", v % 1000, out);
        v /= 1000;
    }

    format!("{}{}", v, out)
}
