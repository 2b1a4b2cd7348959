//! Terminal rendition of the guided walk.

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use portal::Preferences;
use shared::domain::Language;
use tokio::io::{AsyncBufReadExt, BufReader};
use wayfinding::{
    sim::{LoggingHaptics, ScriptedSensor},
    spawn_walk, HapticSink, HeadingMode, HeadingSample, Itinerary, OrientationSensor,
    PermissionOutcome, WalkConfig, WalkInput, WalkView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorSetup {
    Granted,
    Denied,
    Absent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WalkCommand {
    Start,
    /// Feeds the simulated compass when live, otherwise sets the heading by hand.
    Heading(f64),
    Manual(f64),
    Step,
    Status,
    Dismiss,
    Language(Language),
    ToggleLanguage,
    Restart,
    Quit,
    Help,
}

pub const HELP: &str = "commands: start | heading <deg> | manual <deg> | step | status | dismiss \
     | lang [en|fr] | restart | quit";

pub fn parse_command(line: &str) -> Result<WalkCommand> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        bail!("empty command");
    };
    let arg = parts.next();
    if parts.next().is_some() {
        bail!("too many arguments");
    }

    let degrees = |arg: Option<&str>| -> Result<f64> {
        match arg.map(str::parse::<f64>) {
            Some(Ok(value)) => Ok(value),
            Some(Err(_)) => bail!("heading must be a number of degrees"),
            None => bail!("missing heading in degrees"),
        }
    };

    let verb = verb.to_ascii_lowercase();
    let bare = |command: WalkCommand| -> Result<WalkCommand> {
        match arg {
            Some(extra) => bail!("'{verb}' takes no argument (got '{extra}')"),
            None => Ok(command),
        }
    };

    let command = match verb.as_str() {
        "start" => bare(WalkCommand::Start)?,
        "heading" | "h" => WalkCommand::Heading(degrees(arg)?),
        "manual" | "m" => WalkCommand::Manual(degrees(arg)?),
        "step" | "s" => bare(WalkCommand::Step)?,
        "status" => bare(WalkCommand::Status)?,
        "dismiss" => bare(WalkCommand::Dismiss)?,
        "lang" => match arg.map(str::parse::<Language>) {
            Some(Ok(language)) => WalkCommand::Language(language),
            Some(Err(error)) => bail!(error),
            None => WalkCommand::ToggleLanguage,
        },
        "restart" => bare(WalkCommand::Restart)?,
        "quit" | "q" | "exit" => bare(WalkCommand::Quit)?,
        "help" | "?" => bare(WalkCommand::Help)?,
        other => bail!("unknown command '{other}'"),
    };
    Ok(command)
}

pub fn render(view: &WalkView) -> String {
    let mut line = format!(
        "[{}/{}] {} | {} m | heading {:.0}° target {}° offset {:+.0}°",
        view.waypoint_index + 1,
        view.waypoint_count,
        view.instruction,
        view.distance_remaining,
        view.heading,
        view.target_heading,
        view.bearing_offset,
    );
    if let Some(guidance) = &view.guidance {
        line.push_str(&format!(" | {guidance}"));
    }
    line.push_str(&format!(" | {:?}", view.mode));
    if let Some(notice) = &view.notice {
        line.push_str(&format!("\n  ! {notice}"));
    }
    line
}

pub async fn run(setup: SensorSetup, config: WalkConfig) -> Result<()> {
    let mut preferences = Preferences {
        language: config.language,
        ..Preferences::default()
    };
    let scripted = match setup {
        SensorSetup::Granted => Some(Arc::new(ScriptedSensor::new(PermissionOutcome::Granted))),
        SensorSetup::Denied => Some(Arc::new(ScriptedSensor::new(PermissionOutcome::Denied))),
        SensorSetup::Absent => None,
    };
    let sensor = scripted
        .clone()
        .map(|s| s as Arc<dyn OrientationSensor>);
    let haptics: Arc<dyn HapticSink> = Arc::new(LoggingHaptics);
    let handle = spawn_walk(
        Arc::new(Itinerary::radiology()),
        config,
        sensor,
        Some(haptics),
    );

    let mut views = handle.subscribe();
    let printer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            println!("{}", render(&view));
        }
    });

    println!("{}", render(&handle.view()));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };
        let input = match command {
            WalkCommand::Start => WalkInput::StartNavigation,
            WalkCommand::Heading(degrees) => {
                let live = handle.view().mode == HeadingMode::Live;
                match (&scripted, live) {
                    (Some(sensor), true) => {
                        sensor.push(HeadingSample::Compass(degrees));
                        continue;
                    }
                    _ => WalkInput::ManualHeading(degrees),
                }
            }
            WalkCommand::Manual(degrees) => WalkInput::ManualHeading(degrees),
            WalkCommand::Step => WalkInput::Step,
            WalkCommand::Status => {
                println!("{}", render(&handle.view()));
                continue;
            }
            WalkCommand::Dismiss => WalkInput::DismissNotice,
            WalkCommand::Language(language) => {
                preferences.language = language;
                WalkInput::SetLanguage(language)
            }
            WalkCommand::ToggleLanguage => {
                WalkInput::SetLanguage(preferences.toggle_language())
            }
            WalkCommand::Restart => WalkInput::Restart,
            WalkCommand::Help => {
                println!("{HELP}");
                continue;
            }
            WalkCommand::Quit => break,
        };
        handle.send(input).await?;
    }

    handle.shutdown().await;
    // let the last view print before exiting
    let _ = tokio::time::timeout(Duration::from_millis(50), printer).await;
    Ok(())
}
