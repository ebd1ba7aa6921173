//! Coloured usage text.
//!
//! `!` toggles white, `$` toggles green. Repeating the active token resets the colour.

use colored::Colorize;

const USAGE: &str = "
Usage: !adjust-display! $[params]$, where params are:

!ident!            : identify displays

!get!              : return connected displays information
!get! $disp=n$       : return info for all supported modes for the specific display, $n$ starts from 1
!get! $--json$       : same information as JSON

!set! [params]     : set parameters for specific display
    $disp=n$       : display number (starts from 1); if omitted, $disp=1$ will be used
    $mode=nn$      : set video mode (from range returned by $get disp=n$)
    $width=nnnn$   : desired screen width, i.e. $width=2048$
    $height=nnnn$  : desired screen height, i.e. $height=1080$
    $orient=nnn$   : desired screen orientation; available values are: $0, 90, 180, 270$
    $freq=nnn$     : desired screen frequency (refresh rate)
    $bpp=nn$       : desired bits per pixel; available values are: $8, 16, 24, 32$
    $scale=nnn$    : desired screen scale; available values are: $[100, 125, 150...450, 500]$

Note: any [param] value can be omitted
";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Highlight {
    White,
    Green,
}

impl Highlight {
    fn from_token(c: char) -> Option<Self> {
        match c {
            '!' => Some(Highlight::White),
            '$' => Some(Highlight::Green),
            _ => None,
        }
    }
}

fn segments(text: &str) -> Vec<(Option<Highlight>, String)> {
    let mut out = Vec::new();
    let mut active = None;
    let mut current = String::new();

    for c in text.chars() {
        match Highlight::from_token(c) {
            Some(token) => {
                if !current.is_empty() {
                    out.push((active, std::mem::take(&mut current)));
                }
                active = if active == Some(token) { None } else { Some(token) };
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push((active, current));
    }
    out
}

fn render(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|(highlight, part)| match highlight {
            Some(Highlight::White) => part.white().bold().to_string(),
            Some(Highlight::Green) => part.green().to_string(),
            None => part,
        })
        .collect()
}

pub fn print_usage() {
    println!("{}", render(USAGE));
}
