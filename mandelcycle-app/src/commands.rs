use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info};

use mandelcycle_render::Channel;

use crate::app::Explorer;
use crate::ascii;
use crate::display_color::ChannelSettings;
use crate::error::{AppError, Result};
use crate::navigation::PanDirection;
use crate::preferences::AppPreferences;

/// Cells per terminal row in `show` when no step is given: the grid is
/// sampled down to roughly this width.
const SHOW_WIDTH: u32 = 80;
const STRIP_PER_LINE: usize = 8;

pub(crate) const HELP: &str = "\
Commands:
  in                              zoom in around the center
  out                             zoom out around the center
  pan <dir>                       up, down, left, right, up-left, up-right, down-left, down-right
  click <x> <y>                   zoom in around a pixel
  back                            return to the previous view
  hue|sat|bri <min> <max> <delta> [start]
                                  change one color channel and recolor
  show [step]                     print the current view as text
  paint [step]                    print the current view in color (truecolor terminal)
  status                          print the current label and history depth
  strip                           print the color table
  save                            store the current colors in preferences
  help                            print this help
  quit                            exit";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    ZoomIn,
    ZoomOut,
    Pan(PanDirection),
    Click { x: u32, y: u32 },
    Back,
    Recolor {
        channel: Channel,
        settings: ChannelSettings,
    },
    Show { step: Option<u32> },
    Paint { step: Option<u32> },
    Status,
    Strip,
    Save,
    Help,
    Quit,
}

/// Whether the read loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

fn parse_arg<T: FromStr>(arg: Option<&str>, what: &str) -> Result<T> {
    let raw = arg.ok_or_else(|| AppError::Command(format!("missing {what}")))?;
    raw.parse()
        .map_err(|_| AppError::Command(format!("invalid {what} '{raw}'")))
}

fn parse_channel(name: &str) -> Option<Channel> {
    match name {
        "hue" | "h" => Some(Channel::Hue),
        "sat" | "saturation" | "s" => Some(Channel::Saturation),
        "bri" | "brightness" | "v" => Some(Channel::Brightness),
        _ => None,
    }
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let head = words
            .next()
            .ok_or_else(|| AppError::Command("empty input".into()))?
            .to_ascii_lowercase();

        let command = match head.as_str() {
            "in" | "+" => Command::ZoomIn,
            "out" | "-" => Command::ZoomOut,
            "pan" => Command::Pan(parse_arg(words.next(), "direction")?),
            "click" => Command::Click {
                x: parse_arg(words.next(), "x")?,
                y: parse_arg(words.next(), "y")?,
            },
            "back" | "b" => Command::Back,
            "show" => Command::Show {
                step: words.next().map(|w| parse_arg(Some(w), "step")).transpose()?,
            },
            "paint" => Command::Paint {
                step: words.next().map(|w| parse_arg(Some(w), "step")).transpose()?,
            },
            "status" => Command::Status,
            "strip" => Command::Strip,
            "save" => Command::Save,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => match parse_channel(other) {
                Some(channel) => {
                    let min = parse_arg(words.next(), "min")?;
                    let max = parse_arg(words.next(), "max")?;
                    let delta = parse_arg(words.next(), "delta")?;
                    let start = words.next().map(|w| parse_arg(Some(w), "start")).transpose()?;
                    Command::Recolor {
                        channel,
                        settings: ChannelSettings {
                            start,
                            min,
                            max,
                            delta,
                        },
                    }
                }
                None => return Err(AppError::Command(format!("unknown command '{other}'"))),
            },
        };

        if let Some(extra) = words.next() {
            return Err(AppError::Command(format!("unexpected argument '{extra}'")));
        }
        Ok(command)
    }
}

/// Sampling step that fits a `size`-wide grid into [`SHOW_WIDTH`] columns.
fn default_step(size: u32) -> u32 {
    size.div_ceil(SHOW_WIDTH).max(1)
}

/// Run one command against the session, writing any output to `out`.
///
/// Navigation blocks until the new frame is computed, so the prompt only
/// comes back once the view has changed (or failed to). `save` writes the
/// current colors into the preferences file at `prefs_path`.
pub(crate) fn execute<W: Write>(
    explorer: &mut Explorer,
    command: Command,
    prefs_path: &Path,
    out: &mut W,
) -> Result<Flow> {
    debug!(?command, "Executing");
    match command {
        Command::ZoomIn => {
            explorer.navigate_and_wait(Explorer::zoom_in)?;
            writeln!(out, "{}", explorer.status())?;
        }
        Command::ZoomOut => {
            explorer.navigate_and_wait(Explorer::zoom_out)?;
            writeln!(out, "{}", explorer.status())?;
        }
        Command::Pan(direction) => {
            explorer.navigate_and_wait(|e| e.pan(direction))?;
            writeln!(out, "{}", explorer.status())?;
        }
        Command::Click { x, y } => {
            explorer.navigate_and_wait(|e| e.click(x, y))?;
            writeln!(out, "{}", explorer.status())?;
        }
        Command::Back => {
            if explorer.back()? {
                writeln!(out, "{}", explorer.status())?;
            } else {
                writeln!(out, "Already at the first view")?;
            }
        }
        Command::Recolor { channel, settings } => {
            let mut colors = *explorer.colors();
            *colors.channel_mut(channel) = settings;
            explorer.recolor(colors);
            let applied = explorer.colors().channel(channel);
            writeln!(
                out,
                "{}: min {} max {} delta {}",
                channel.label(),
                applied.min,
                applied.max,
                applied.delta
            )?;
        }
        Command::Show { step } => {
            let grid = &explorer.current().grid;
            let step = step.unwrap_or_else(|| default_step(grid.size()));
            out.write_all(ascii::render(grid, step).as_bytes())?;
        }
        Command::Paint { step } => {
            let buffer = explorer.paint();
            let step = step.unwrap_or_else(|| default_step(buffer.width));
            out.write_all(ascii::truecolor(&buffer, step).as_bytes())?;
        }
        Command::Status => writeln!(out, "{}", explorer.status())?,
        Command::Strip => {
            out.write_all(ascii::strip(explorer.table(), STRIP_PER_LINE).as_bytes())?;
        }
        Command::Save => {
            AppPreferences::save_colors_to(prefs_path, *explorer.colors()).map_err(|source| {
                AppError::Preferences {
                    path: prefs_path.to_path_buf(),
                    source,
                }
            })?;
            info!(path = %prefs_path.display(), "Color settings saved");
            writeln!(out, "Saved")?;
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::small_prefs;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mandelcycle-cmd-{}-{name}", std::process::id()))
            .join("preferences.json")
    }

    fn run_with(explorer: &mut Explorer, line: &str, prefs_path: &Path) -> Result<(Flow, String)> {
        let mut out = Vec::new();
        let flow = execute(explorer, line.parse()?, prefs_path, &mut out)?;
        Ok((flow, String::from_utf8(out).unwrap()))
    }

    fn run(explorer: &mut Explorer, line: &str) -> (Flow, String) {
        run_with(explorer, line, &scratch_path("unused")).unwrap()
    }

    #[test]
    fn parses_navigation() {
        assert_eq!("in".parse::<Command>().unwrap(), Command::ZoomIn);
        assert_eq!(
            "pan Down-Left".parse::<Command>().unwrap(),
            Command::Pan(PanDirection::DownLeft)
        );
        assert_eq!(
            "click 3 7".parse::<Command>().unwrap(),
            Command::Click { x: 3, y: 7 }
        );
        assert_eq!(
            "show".parse::<Command>().unwrap(),
            Command::Show { step: None }
        );
    }

    #[test]
    fn parses_recolor() {
        let cmd: Command = "sat 10 90 2.5 40".parse().unwrap();
        assert_eq!(
            cmd,
            Command::Recolor {
                channel: Channel::Saturation,
                settings: ChannelSettings {
                    start: Some(40.0),
                    min: 10.0,
                    max: 90.0,
                    delta: 2.5,
                },
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        for line in ["", "fly", "click 3", "click a b", "hue 1 2", "in now", "pan north"] {
            assert!(
                matches!(line.parse::<Command>(), Err(AppError::Command(_))),
                "{line:?} should not parse"
            );
        }
    }

    #[test]
    fn zoom_and_back_report_status() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let (flow, text) = run(&mut explorer, "in");
        assert_eq!(flow, Flow::Continue);
        assert!(text.starts_with("Center: (0, 0) width/height: 1"));

        let (_, text) = run(&mut explorer, "back");
        assert!(text.contains("width/height: 4"));

        let (_, text) = run(&mut explorer, "back");
        assert_eq!(text, "Already at the first view\n");
    }

    #[test]
    fn recolor_reports_clamped_values() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let (_, text) = run(&mut explorer, "hue 0 9999 1");
        assert_eq!(text, "Hue: min 0 max 720 delta 1\n");
    }

    #[test]
    fn show_prints_grid() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let (_, text) = run(&mut explorer, "show 4");
        assert_eq!(text.lines().count(), 10);
    }

    #[test]
    fn paint_goes_through_color_table() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let (_, text) = run(&mut explorer, "paint 4");
        assert_eq!(text.lines().count(), 10);
        // Top-left cell has count 0 and paints white.
        assert!(text.starts_with("\x1b[48;2;255;255;255m"));

        run(&mut explorer, "bri 0 0 0");
        let (_, dark) = run(&mut explorer, "paint 4");
        assert_ne!(text, dark);
        assert!(dark.starts_with("\x1b[48;2;255;255;255m"));
    }

    #[test]
    fn save_writes_only_colors() {
        let path = scratch_path("save");
        let stored = AppPreferences {
            workers: 3,
            ..AppPreferences::default()
        };
        stored.save_to(&path).unwrap();

        // The session runs with an overridden worker count.
        let mut session = small_prefs();
        session.workers = 2;
        let mut explorer = Explorer::new(&session).unwrap();
        run_with(&mut explorer, "hue 10 200 2", &path).unwrap();
        let (_, text) = run_with(&mut explorer, "save", &path).unwrap();
        assert_eq!(text, "Saved\n");

        let reloaded = AppPreferences::load_from(&path);
        assert_eq!(reloaded.workers, 3);
        assert_eq!(reloaded.size_in_pixels, stored.size_in_pixels);
        assert_eq!(reloaded.color, *explorer.colors());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn failed_save_is_reported() {
        let blocker = scratch_path("blocked").parent().unwrap().to_path_buf();
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("preferences.json");

        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let err = run_with(&mut explorer, "save", &path).unwrap_err();
        assert!(matches!(err, AppError::Preferences { .. }));
        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn quit_stops_loop() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        assert_eq!(run(&mut explorer, "quit").0, Flow::Quit);
    }
}
